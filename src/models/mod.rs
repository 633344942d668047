use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Namespace shared by every identifier the catalog hands out
pub const ENTRY_ID_PREFIX: &str = "vod-";

/// Identifier of the single entry synthesized for a direct-media source.
/// Never collides with a numbered playlist identifier.
pub const DIRECT_ENTRY_ID: &str = "vod-direct";

pub const DIRECT_ENTRY_TITLE: &str = "Direct Video";

/// How the configured source URL was interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    Playlist,
    DirectMedia,
    Unclassified,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SourceKind::Playlist => write!(f, "playlist"),
            SourceKind::DirectMedia => write!(f, "direct-media"),
            SourceKind::Unclassified => write!(f, "unclassified"),
        }
    }
}

/// The single configured input. Replaced wholesale on every configuration event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub url: String,
    pub kind: SourceKind,
    pub configured_at: DateTime<Utc>,
    /// Why classification failed, when it did
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

impl Source {
    pub fn new(url: impl Into<String>, kind: SourceKind, diagnostic: Option<String>) -> Self {
        Self {
            url: url.into(),
            kind,
            configured_at: Utc::now(),
            diagnostic,
        }
    }
}

/// One playable item of the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaEntry {
    pub id: String,
    pub title: String,
    /// Address a player fetches; never empty
    pub url: String,
    /// Artwork declared by the playlist (`tvg-logo`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    /// Group declared by the playlist (`group-title`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl MediaEntry {
    /// Identifier of the `ordinal`-th (1-based) entry of a parse pass
    pub fn playlist_id(ordinal: usize) -> String {
        format!("{ENTRY_ID_PREFIX}{ordinal}")
    }

    /// Title used when the playlist supplies none
    pub fn placeholder_title(ordinal: usize) -> String {
        format!("Video {ordinal}")
    }

    /// The single entry representing a direct-media source
    pub fn direct(url: impl Into<String>) -> Self {
        Self {
            id: DIRECT_ENTRY_ID.to_string(),
            title: DIRECT_ENTRY_TITLE.to_string(),
            url: url.into(),
            logo: None,
            group: None,
        }
    }
}

/// Catalog listing row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub title: String,
}

impl From<&MediaEntry> for CatalogItem {
    fn from(entry: &MediaEntry) -> Self {
        Self {
            id: entry.id.clone(),
            title: entry.title.clone(),
        }
    }
}

/// Playback resolution of one entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamTarget {
    pub url: String,
    pub title: String,
}

impl From<&MediaEntry> for StreamTarget {
    fn from(entry: &MediaEntry) -> Self {
        Self {
            url: entry.url.clone(),
            title: entry.title.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers_share_namespace_without_colliding() {
        assert_eq!(MediaEntry::playlist_id(1), "vod-1");
        assert_eq!(MediaEntry::playlist_id(42), "vod-42");
        assert!(DIRECT_ENTRY_ID.starts_with(ENTRY_ID_PREFIX));
        assert!((1..1000).all(|n| MediaEntry::playlist_id(n) != DIRECT_ENTRY_ID));
    }

    #[test]
    fn test_direct_entry() {
        let entry = MediaEntry::direct("http://example.com/movie.mp4");
        assert_eq!(entry.id, DIRECT_ENTRY_ID);
        assert_eq!(entry.title, "Direct Video");
        assert_eq!(entry.url, "http://example.com/movie.mp4");
    }

    #[test]
    fn test_source_kind_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&SourceKind::DirectMedia).unwrap(),
            "\"direct-media\""
        );
        assert_eq!(SourceKind::Unclassified.to_string(), "unclassified");
    }
}
