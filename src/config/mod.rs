use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

pub mod defaults;
pub mod duration_serde;

use defaults::*;

use crate::errors::{AppError, AppResult};
use crate::utils::url::UrlUtils;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub addon: AddonConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// When the catalog is rebuilt from the configured source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
    /// Every catalog listing re-fetches and re-parses the source
    #[default]
    OnList,
    /// Only configuration events and explicit refreshes rebuild the catalog
    OnConfigure,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Source resolved at startup, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default)]
    pub refresh_policy: RefreshPolicy,
    /// Budget for each classification probe (GET and HEAD)
    #[serde(default = "default_probe_timeout", with = "duration_serde::duration")]
    pub probe_timeout: Duration,
    /// Budget for the authoritative playlist fetch on refresh
    #[serde(default = "default_fetch_timeout", with = "duration_serde::duration")]
    pub fetch_timeout: Duration,
    #[serde(default = "default_connect_timeout", with = "duration_serde::duration")]
    pub connect_timeout: Duration,
    /// Append a `t=<millis>` query parameter to playlist fetches
    #[serde(default = "default_cache_bust")]
    pub cache_bust: bool,
    #[serde(default = "default_max_playlist_bytes")]
    pub max_playlist_bytes: usize,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddonConfig {
    #[serde(default = "default_addon_id")]
    pub id: String,
    #[serde(default = "default_addon_name")]
    pub name: String,
    #[serde(default = "default_addon_description")]
    pub description: String,
    #[serde(default = "default_catalog_id")]
    pub catalog_id: String,
    #[serde(default = "default_catalog_name")]
    pub catalog_name: String,
    #[serde(default = "default_content_type")]
    pub content_type: String,
    #[serde(default = "default_logo")]
    pub logo: String,
    #[serde(default = "default_background")]
    pub background: String,
}

// Web defaults
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

// Catalog defaults
fn default_probe_timeout() -> Duration {
    Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS)
}

fn default_fetch_timeout() -> Duration {
    Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS)
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS)
}

fn default_cache_bust() -> bool {
    DEFAULT_CACHE_BUST
}

fn default_max_playlist_bytes() -> usize {
    DEFAULT_MAX_PLAYLIST_BYTES
}

fn default_user_agent() -> String {
    format!("vod-catalog/{}", env!("CARGO_PKG_VERSION"))
}

// Add-on defaults
fn default_addon_id() -> String {
    DEFAULT_ADDON_ID.to_string()
}

fn default_addon_name() -> String {
    DEFAULT_ADDON_NAME.to_string()
}

fn default_addon_description() -> String {
    DEFAULT_ADDON_DESCRIPTION.to_string()
}

fn default_catalog_id() -> String {
    DEFAULT_CATALOG_ID.to_string()
}

fn default_catalog_name() -> String {
    DEFAULT_CATALOG_NAME.to_string()
}

fn default_content_type() -> String {
    DEFAULT_CONTENT_TYPE.to_string()
}

fn default_logo() -> String {
    DEFAULT_LOGO.to_string()
}

fn default_background() -> String {
    DEFAULT_BACKGROUND.to_string()
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_url: default_base_url(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source_url: None,
            refresh_policy: RefreshPolicy::default(),
            probe_timeout: default_probe_timeout(),
            fetch_timeout: default_fetch_timeout(),
            connect_timeout: default_connect_timeout(),
            cache_bust: default_cache_bust(),
            max_playlist_bytes: default_max_playlist_bytes(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for AddonConfig {
    fn default() -> Self {
        Self {
            id: default_addon_id(),
            name: default_addon_name(),
            description: default_addon_description(),
            catalog_id: default_catalog_id(),
            catalog_name: default_catalog_name(),
            content_type: default_content_type(),
            logo: default_logo(),
            background: default_background(),
        }
    }
}

impl Config {
    /// Load configuration, writing a default file when none exists yet
    pub fn load_from_file(config_file: &str) -> Result<Self> {
        let config = if std::path::Path::new(config_file).exists() {
            let contents = std::fs::read_to_string(config_file)?;
            toml::from_str::<Self>(&contents)?
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(config_file, contents)?;
            info!("Wrote default configuration to {}", config_file);
            default_config
        };

        config.validate()?;
        Ok(config)
    }

    /// Check values that serde alone cannot enforce
    pub fn validate(&self) -> AppResult<()> {
        if self.web.port == 0 {
            return Err(AppError::configuration("web.port must be non-zero"));
        }
        if self.catalog.probe_timeout.is_zero() || self.catalog.fetch_timeout.is_zero() {
            return Err(AppError::configuration(
                "catalog.probe_timeout and catalog.fetch_timeout must be non-zero",
            ));
        }
        if self.catalog.max_playlist_bytes == 0 {
            return Err(AppError::configuration(
                "catalog.max_playlist_bytes must be greater than zero",
            ));
        }
        if self.addon.id.trim().is_empty() || self.addon.catalog_id.trim().is_empty() {
            return Err(AppError::configuration(
                "addon.id and addon.catalog_id must not be empty",
            ));
        }
        if let Some(source_url) = &self.catalog.source_url {
            UrlUtils::parse_source_url(source_url).map_err(|e| {
                AppError::configuration(format!("catalog.source_url is invalid: {e}"))
            })?;
        }
        Ok(())
    }
}
