//! Error type definitions for the VOD catalog service

use std::time::Duration;
use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Source handling errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Source handling specific errors
///
/// Every variant renders as a short operator-facing reason; the prober joins
/// them into the diagnostic of a failed classification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Network unreachable, DNS failure, connection reset and the like
    #[error("transport error: {message}")]
    Transport { url: String, message: String },

    /// Request exceeded its time budget
    #[error("timed out after {}", format_timeout(.timeout))]
    Timeout { url: String, timeout: Duration },

    /// Upstream answered with a non-2xx status
    #[error("HTTP status {status}")]
    Http { url: String, status: u16 },

    /// Declared content type is neither video nor a playlist media type
    #[error("unsupported content type '{content_type}'")]
    UnsupportedContentType { url: String, content_type: String },

    /// Response body exceeded the configured playlist size limit
    #[error("response body exceeds {limit} bytes")]
    BodyTooLarge { url: String, limit: usize },

    /// Document was readable but yielded no usable entries
    #[error("no playable entries found")]
    EmptyParse { url: String },

    /// Neither the playlist probe nor the direct-media probe succeeded
    #[error("playlist probe: {playlist}; direct-media probe: {direct}")]
    Unclassifiable {
        url: String,
        playlist: Box<SourceError>,
        direct: Box<SourceError>,
    },
}

fn format_timeout(timeout: &Duration) -> humantime::FormattedDuration {
    humantime::format_duration(*timeout)
}

/// Convenience methods for creating common error types
impl AppError {
    /// Create a validation error with a custom message
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl SourceError {
    /// Create a transport error from any displayable cause
    pub fn transport<U: Into<String>, M: Into<String>>(url: U, message: M) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an unclassifiable error from the two probe failures
    pub fn unclassifiable<U: Into<String>>(url: U, playlist: SourceError, direct: SourceError) -> Self {
        Self::Unclassifiable {
            url: url.into(),
            playlist: Box::new(playlist),
            direct: Box::new(direct),
        }
    }
}
