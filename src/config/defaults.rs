/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Web server defaults
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 7000;
pub const DEFAULT_BASE_URL: &str = "http://localhost:7000";

// Catalog defaults
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CACHE_BUST: bool = true;
pub const DEFAULT_MAX_PLAYLIST_BYTES: usize = 8 * 1024 * 1024; // 8MB

// Add-on descriptor defaults
pub const DEFAULT_ADDON_ID: &str = "org.vodplaylist";
pub const DEFAULT_ADDON_NAME: &str = "VOD Playlist";
pub const DEFAULT_ADDON_DESCRIPTION: &str = "Watch your personal video playlist";
pub const DEFAULT_CATALOG_ID: &str = "vod-playlist";
pub const DEFAULT_CATALOG_NAME: &str = "My VOD Playlist";
pub const DEFAULT_CONTENT_TYPE: &str = "movie";
pub const DEFAULT_LOGO: &str = "https://dl.strem.io/addon-logo.png";
pub const DEFAULT_BACKGROUND: &str = "https://dl.strem.io/addon-background.jpg";
