//! Add-on protocol payloads
//!
//! The descriptor served at `/manifest.json` and the catalog, meta and
//! stream objects players request by identifier.

use serde::Serialize;

use crate::config::AddonConfig;
use crate::models::{CatalogItem, MediaEntry, StreamTarget, ENTRY_ID_PREFIX};

const RESOURCES: &[&str] = &["catalog", "meta", "stream"];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub id: String,
    pub version: String,
    pub name: String,
    pub description: String,
    pub resources: Vec<String>,
    pub types: Vec<String>,
    pub catalogs: Vec<ManifestCatalog>,
    pub id_prefixes: Vec<String>,
    pub logo: String,
    pub icon: String,
    pub background: String,
    pub behavior_hints: BehaviorHints,
}

#[derive(Debug, Clone, Serialize)]
pub struct ManifestCatalog {
    #[serde(rename = "type")]
    pub content_type: String,
    pub id: String,
    pub name: String,
    pub extra: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorHints {
    pub configurable: bool,
    pub configuration_required: bool,
}

impl Manifest {
    pub fn from_config(addon: &AddonConfig) -> Self {
        Self {
            id: addon.id.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            name: addon.name.clone(),
            description: addon.description.clone(),
            resources: RESOURCES.iter().map(|r| r.to_string()).collect(),
            types: vec![addon.content_type.clone()],
            catalogs: vec![ManifestCatalog {
                content_type: addon.content_type.clone(),
                id: addon.catalog_id.clone(),
                name: addon.catalog_name.clone(),
                extra: Vec::new(),
            }],
            id_prefixes: vec![ENTRY_ID_PREFIX.to_string()],
            logo: addon.logo.clone(),
            icon: addon.logo.clone(),
            background: addon.background.clone(),
            behavior_hints: BehaviorHints {
                configurable: true,
                configuration_required: false,
            },
        }
    }
}

/// Catalog listing row as players expect it
#[derive(Debug, Clone, Serialize)]
pub struct MetaPreview {
    pub id: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub name: String,
    pub poster: String,
}

impl MetaPreview {
    pub fn new(item: CatalogItem, addon: &AddonConfig) -> Self {
        Self {
            id: item.id,
            content_type: addon.content_type.clone(),
            name: item.title,
            poster: addon.logo.clone(),
        }
    }
}

/// Full metadata of one entry
#[derive(Debug, Clone, Serialize)]
pub struct MetaDetail {
    pub id: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub name: String,
    pub poster: String,
    pub background: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
}

impl MetaDetail {
    /// Playlist artwork wins over the add-on placeholder
    pub fn new(entry: MediaEntry, addon: &AddonConfig) -> Self {
        Self {
            poster: entry.logo.unwrap_or_else(|| addon.logo.clone()),
            description: entry.title.clone(),
            genres: entry.group.map(|group| vec![group]),
            id: entry.id,
            content_type: addon.content_type.clone(),
            name: entry.title,
            background: addon.background.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StreamObject {
    pub url: String,
    pub title: String,
}

impl From<StreamTarget> for StreamObject {
    fn from(target: StreamTarget) -> Self {
        Self {
            url: target.url,
            title: target.title,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_manifest_shape() {
        let manifest = serde_json::to_value(Manifest::from_config(&AddonConfig::default())).unwrap();

        assert_eq!(manifest["id"], "org.vodplaylist");
        assert_eq!(manifest["resources"], json!(["catalog", "meta", "stream"]));
        assert_eq!(manifest["types"], json!(["movie"]));
        assert_eq!(manifest["idPrefixes"], json!(["vod-"]));
        assert_eq!(manifest["catalogs"][0]["type"], "movie");
        assert_eq!(manifest["catalogs"][0]["id"], "vod-playlist");
        assert_eq!(manifest["catalogs"][0]["name"], "My VOD Playlist");
        assert_eq!(manifest["behaviorHints"]["configurable"], true);
        assert_eq!(manifest["behaviorHints"]["configurationRequired"], false);
        assert_eq!(manifest["version"], env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_meta_prefers_playlist_artwork() {
        let addon = AddonConfig::default();
        let mut entry = MediaEntry {
            id: "vod-1".to_string(),
            title: "Casablanca".to_string(),
            url: "http://x/a.mp4".to_string(),
            logo: Some("http://img/a.png".to_string()),
            group: Some("Drama".to_string()),
        };

        let meta = serde_json::to_value(MetaDetail::new(entry.clone(), &addon)).unwrap();
        assert_eq!(meta["poster"], "http://img/a.png");
        assert_eq!(meta["name"], "Casablanca");
        assert_eq!(meta["description"], "Casablanca");
        assert_eq!(meta["type"], "movie");
        assert_eq!(meta["genres"], json!(["Drama"]));

        entry.logo = None;
        entry.group = None;
        let meta = serde_json::to_value(MetaDetail::new(entry, &addon)).unwrap();
        assert_eq!(meta["poster"], addon.logo);
        assert!(meta.get("genres").is_none());
    }
}
