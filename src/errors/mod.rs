//! Centralized error handling for the VOD catalog service
//!
//! Failures are carried as typed values internally so they can be logged and
//! reported to the operator. The catalog query surface never returns them:
//! lookups degrade to empty or absent results instead.
//!
//! # Error Categories
//!
//! - **Source Errors**: upstream connectivity, status, content type and parsing
//! - **Validation Errors**: operator input such as a malformed source URL
//! - **Configuration Errors**: invalid configuration file values
//!
//! # Usage
//!
//! ```rust
//! use vod_catalog::errors::{AppError, AppResult};
//!
//! fn example_function() -> AppResult<String> {
//!     Err(AppError::validation("source URL must use http or https"))
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for Source Results
pub type SourceResult<T> = Result<T, SourceError>;
