//! Source classification
//!
//! A bare URL carries no declared intent, so the richer interpretation is
//! tried first: the URL is fetched and parsed as a playlist. Only when that
//! yields nothing usable is a HEAD request used to decide whether the URL is
//! itself a playable resource.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::errors::{SourceError, SourceResult};
use crate::models::{MediaEntry, SourceKind};
use crate::sources::m3u;
use crate::utils::http_client::HttpFetcher;
use crate::utils::url::UrlUtils;

/// Media types accepted by the direct-media probe besides `video/*`
const PLAYLIST_MEDIA_TYPES: &[&str] = &[
    "application/vnd.apple.mpegurl",
    "application/x-mpegurl",
    "application/mpegurl",
    "audio/mpegurl",
    "audio/x-mpegurl",
];

/// Does a declared content type denote something a player can open directly?
///
/// Parameters such as `; charset=utf-8` and letter case are ignored.
pub fn is_direct_media_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence.starts_with("video/") || PLAYLIST_MEDIA_TYPES.contains(&essence.as_str())
}

/// Outcome of classifying a source URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub kind: SourceKind,
    /// Entries the catalog should hold for this source
    pub entries: Vec<MediaEntry>,
    /// Operator-facing reason when classification failed
    pub diagnostic: Option<String>,
}

impl Classification {
    fn playlist(entries: Vec<MediaEntry>) -> Self {
        Self {
            kind: SourceKind::Playlist,
            entries,
            diagnostic: None,
        }
    }

    fn direct(url: &str) -> Self {
        Self {
            kind: SourceKind::DirectMedia,
            entries: vec![MediaEntry::direct(url)],
            diagnostic: None,
        }
    }

    fn unclassified(diagnostic: String) -> Self {
        Self {
            kind: SourceKind::Unclassified,
            entries: Vec::new(),
            diagnostic: Some(diagnostic),
        }
    }
}

/// Classifies source URLs and performs playlist fetches
pub struct SourceProber {
    fetcher: Arc<dyn HttpFetcher>,
    probe_timeout: Duration,
    cache_bust: bool,
}

impl SourceProber {
    pub fn new(fetcher: Arc<dyn HttpFetcher>, probe_timeout: Duration, cache_bust: bool) -> Self {
        Self {
            fetcher,
            probe_timeout,
            cache_bust,
        }
    }

    /// Classify `url`. Failures are folded into an `Unclassified` result
    /// carrying the diagnostic.
    pub async fn classify(&self, url: &str) -> Classification {
        match self.try_classify(url).await {
            Ok(classification) => classification,
            Err(e) => {
                warn!(
                    "Could not classify source {}: {}",
                    UrlUtils::obfuscate_credentials(url),
                    e
                );
                Classification::unclassified(e.to_string())
            }
        }
    }

    /// Classify `url`, reporting failure as [`SourceError::Unclassifiable`]
    pub async fn try_classify(&self, url: &str) -> SourceResult<Classification> {
        let safe_url = UrlUtils::obfuscate_credentials(url);

        // Playlist interpretation wins whenever it yields entries
        let playlist_error = match self.fetch_playlist(url, self.probe_timeout).await {
            Ok(entries) => {
                info!("Classified {} as playlist with {} entries", safe_url, entries.len());
                return Ok(Classification::playlist(entries));
            }
            Err(e) => {
                debug!("Playlist probe rejected {}: {}", safe_url, e);
                e
            }
        };

        match self.probe_direct(url).await {
            Ok(content_type) => {
                info!("Classified {} as direct media ({})", safe_url, content_type);
                Ok(Classification::direct(url))
            }
            Err(direct_error) => {
                debug!("Direct-media probe rejected {}: {}", safe_url, direct_error);
                Err(SourceError::unclassifiable(url, playlist_error, direct_error))
            }
        }
    }

    /// GET `url` within `timeout` and parse the body as a playlist
    ///
    /// Used with the probe timeout while classifying and with the fetch
    /// timeout for authoritative refreshes.
    pub async fn fetch_playlist(&self, url: &str, timeout: Duration) -> SourceResult<Vec<MediaEntry>> {
        let request_url = if self.cache_bust {
            UrlUtils::with_cache_buster(url, Utc::now().timestamp_millis())
        } else {
            url.to_string()
        };

        let response = self.fetcher.get(&request_url, Some(timeout)).await?;
        if !response.is_success() {
            return Err(SourceError::Http {
                url: url.to_string(),
                status: response.status,
            });
        }

        debug!(
            "Playlist fetch of {} returned {} ({})",
            UrlUtils::obfuscate_credentials(url),
            response.status,
            response.content_type.as_deref().unwrap_or("no content type")
        );

        let base = Url::parse(url).ok();
        let entries = m3u::parse_with_base(&response.body, base.as_ref());
        if entries.is_empty() {
            return Err(SourceError::EmptyParse {
                url: url.to_string(),
            });
        }

        Ok(entries)
    }

    /// HEAD `url` and accept it when it declares a video or playlist media type
    async fn probe_direct(&self, url: &str) -> SourceResult<String> {
        let response = self.fetcher.head(url, Some(self.probe_timeout)).await?;
        if !response.is_success() {
            return Err(SourceError::Http {
                url: url.to_string(),
                status: response.status,
            });
        }

        match response.content_type {
            Some(content_type) if is_direct_media_type(&content_type) => Ok(content_type),
            Some(content_type) => Err(SourceError::UnsupportedContentType {
                url: url.to_string(),
                content_type,
            }),
            None => Err(SourceError::UnsupportedContentType {
                url: url.to_string(),
                content_type: "none".to_string(),
            }),
        }
    }
}
