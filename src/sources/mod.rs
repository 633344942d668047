//! Source handling
//!
//! - [`m3u`] parses playlist text into media entries
//! - [`prober`] decides whether a URL is a playlist or a direct media resource

pub mod m3u;
pub mod prober;

pub use prober::{is_direct_media_type, Classification, SourceProber};
