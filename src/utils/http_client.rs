use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{header::CONTENT_TYPE, Client, Response};
use tracing::debug;

use crate::config::CatalogConfig;
use crate::errors::{AppError, AppResult, SourceError, SourceResult};
use crate::utils::url::UrlUtils;

/// Result of a GET request
///
/// The body is only read for 2xx responses; for any other status it is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

/// Result of a HEAD request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadResponse {
    pub status: u16,
    pub content_type: Option<String>,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl HeadResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Text-or-binary resource fetcher used by the prober and the coordinator
///
/// Transport failures and timeouts are errors; HTTP statuses are not, the
/// caller decides what a non-2xx status means.
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    /// GET the URL, optionally bounded by `timeout`
    async fn get(&self, url: &str, timeout: Option<Duration>) -> SourceResult<FetchResponse>;

    /// HEAD the URL, optionally bounded by `timeout`
    async fn head(&self, url: &str, timeout: Option<Duration>) -> SourceResult<HeadResponse>;
}

/// Default implementation of HttpFetcher using reqwest
pub struct StandardHttpClient {
    client: Client,
    max_body_bytes: usize,
}

impl StandardHttpClient {
    /// Create a client with a connection timeout only; total request budgets
    /// are supplied per call
    pub fn new(
        user_agent: &str,
        connect_timeout: Duration,
        max_body_bytes: usize,
    ) -> AppResult<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            max_body_bytes,
        })
    }

    /// Create a client from the catalog section of the configuration
    pub fn from_config(config: &CatalogConfig) -> AppResult<Self> {
        Self::new(
            &config.user_agent,
            config.connect_timeout,
            config.max_playlist_bytes,
        )
    }

    fn content_type(response: &Response) -> Option<String> {
        response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string())
    }

    fn map_error(url: &str, timeout: Option<Duration>, error: reqwest::Error) -> SourceError {
        if error.is_timeout() {
            SourceError::Timeout {
                url: url.to_string(),
                timeout: timeout.unwrap_or_default(),
            }
        } else {
            SourceError::transport(url, UrlUtils::obfuscate_credentials(&error.to_string()))
        }
    }

    /// Read the body, refusing anything larger than `max_body_bytes`
    async fn read_body(
        &self,
        response: Response,
        url: &str,
        timeout: Option<Duration>,
    ) -> SourceResult<String> {
        let too_large = || SourceError::BodyTooLarge {
            url: url.to_string(),
            limit: self.max_body_bytes,
        };

        if let Some(length) = response.content_length() {
            if length > self.max_body_bytes as u64 {
                return Err(too_large());
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Self::map_error(url, timeout, e))?;
            if body.len() + chunk.len() > self.max_body_bytes {
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }

        debug!("Fetched {} bytes from {}", body.len(), UrlUtils::obfuscate_credentials(url));
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

#[async_trait]
impl HttpFetcher for StandardHttpClient {
    async fn get(&self, url: &str, timeout: Option<Duration>) -> SourceResult<FetchResponse> {
        debug!("GET {} (timeout: {:?})", UrlUtils::obfuscate_credentials(url), timeout);

        let mut request = self.client.get(url);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Self::map_error(url, timeout, e))?;

        let status = response.status().as_u16();
        let content_type = Self::content_type(&response);
        let body = if response.status().is_success() {
            self.read_body(response, url, timeout).await?
        } else {
            String::new()
        };

        Ok(FetchResponse {
            status,
            content_type,
            body,
        })
    }

    async fn head(&self, url: &str, timeout: Option<Duration>) -> SourceResult<HeadResponse> {
        debug!("HEAD {} (timeout: {:?})", UrlUtils::obfuscate_credentials(url), timeout);

        let mut request = self.client.head(url);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Self::map_error(url, timeout, e))?;

        Ok(HeadResponse {
            status: response.status().as_u16(),
            content_type: Self::content_type(&response),
        })
    }
}
