//! HTTP handlers organized by surface
//!
//! - `addon`: the manifest and the catalog/meta/stream resources players call
//! - `configure`: operator pages for setting the source
//! - `api`: JSON API over the same operations
//! - `health`: liveness and catalog summary

pub mod addon;
pub mod api;
pub mod configure;
pub mod health;

/// Add-on resource paths end in `.json`; the identifier is what precedes it
pub(crate) fn strip_json_suffix(segment: &str) -> &str {
    segment.strip_suffix(".json").unwrap_or(segment)
}
