//! Utility functions for the VOD catalog service
//!
//! - `utils::http_client` for the upstream resource fetcher
//! - `utils::url` for URL validation, resolution and log-safe rendering

pub mod http_client;
pub mod url;

/// Sanitize a base URL by removing trailing slashes and ensuring proper format
pub fn sanitize_base_url(base_url: &str) -> String {
    let mut url = base_url.trim().to_string();

    while url.ends_with('/') {
        url.pop();
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        url = format!("http://{}", url);
    }

    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_base_url() {
        assert_eq!(
            sanitize_base_url("http://localhost:7000"),
            "http://localhost:7000"
        );
        assert_eq!(
            sanitize_base_url("http://localhost:7000/"),
            "http://localhost:7000"
        );
        assert_eq!(
            sanitize_base_url("http://localhost:7000//"),
            "http://localhost:7000"
        );
        assert_eq!(sanitize_base_url("localhost:7000"), "http://localhost:7000");
        assert_eq!(
            sanitize_base_url("https://example.com/"),
            "https://example.com"
        );
    }
}
