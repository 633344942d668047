//! Resolution coordinator
//!
//! Owns the current [`CatalogIndex`] and is its only writer. Readers take an
//! `Arc` snapshot and release the lock at once, so every query sees exactly
//! one generation. Writers (configuration events and refreshes) are
//! serialized by a separate mutex that is held across the upstream fetch,
//! so a slow fetch delays other writers but never readers.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::CatalogIndex;
use crate::config::{CatalogConfig, RefreshPolicy};
use crate::errors::{AppResult, SourceResult};
use crate::models::{CatalogItem, MediaEntry, Source, SourceKind, StreamTarget};
use crate::sources::SourceProber;
use crate::utils::http_client::HttpFetcher;
use crate::utils::url::UrlUtils;

/// Result of a configuration event
#[derive(Debug, Clone, Serialize)]
pub struct ConfigureOutcome {
    pub source: Source,
    pub entry_count: usize,
    pub generation: u64,
}

pub struct ResolutionCoordinator {
    prober: SourceProber,
    refresh_policy: RefreshPolicy,
    fetch_timeout: Duration,
    current: RwLock<Arc<CatalogIndex>>,
    writer: Mutex<()>,
}

impl ResolutionCoordinator {
    pub fn new(fetcher: Arc<dyn HttpFetcher>, config: &CatalogConfig) -> Self {
        Self {
            prober: SourceProber::new(fetcher, config.probe_timeout, config.cache_bust),
            refresh_policy: config.refresh_policy,
            fetch_timeout: config.fetch_timeout,
            current: RwLock::new(Arc::new(CatalogIndex::empty())),
            writer: Mutex::new(()),
        }
    }

    pub fn refresh_policy(&self) -> RefreshPolicy {
        self.refresh_policy
    }

    /// The current catalog generation
    pub async fn snapshot(&self) -> Arc<CatalogIndex> {
        self.current.read().await.clone()
    }

    /// The active source, if one has been configured
    pub async fn source(&self) -> Option<Source> {
        self.snapshot().await.source().cloned()
    }

    /// Configuration event: classify `url` and replace source and catalog
    ///
    /// Only a malformed URL is an error. A source that cannot be classified is
    /// still installed, as `Unclassified` with an empty catalog, and the
    /// outcome carries the diagnostic for the operator.
    pub async fn configure(&self, url: &str) -> AppResult<ConfigureOutcome> {
        UrlUtils::parse_source_url(url)?;
        let url = url.trim();

        let _writer = self.writer.lock().await;
        info!("Configuring source {}", UrlUtils::obfuscate_credentials(url));

        let classification = self.prober.classify(url).await;
        let source = Source::new(url, classification.kind, classification.diagnostic);
        let index = self.install(Some(source.clone()), classification.entries).await;

        info!(
            "Source configured as {} with {} entries (generation {})",
            source.kind,
            index.len(),
            index.generation()
        );

        Ok(ConfigureOutcome {
            source,
            entry_count: index.len(),
            generation: index.generation(),
        })
    }

    /// Rebuild the catalog from the configured source
    ///
    /// A failed rebuild installs an empty catalog; the previous generation is
    /// not kept.
    pub async fn refresh(&self) -> Arc<CatalogIndex> {
        let _writer = self.writer.lock().await;

        let Some(source) = self.snapshot().await.source().cloned() else {
            debug!("Refresh requested with no source configured");
            return self.snapshot().await;
        };

        let (source, entries) = match source.kind {
            SourceKind::Unclassified => {
                // Retry classification; the result replaces the source wholesale
                let classification = self.prober.classify(&source.url).await;
                let source = Source::new(&source.url, classification.kind, classification.diagnostic);
                (source, classification.entries)
            }
            _ => match self.rebuild_entries(&source).await {
                Ok(entries) => (source, entries),
                Err(e) => {
                    warn!(
                        "Refresh of {} failed, catalog is now empty: {}",
                        UrlUtils::obfuscate_credentials(&source.url),
                        e
                    );
                    (source, Vec::new())
                }
            },
        };

        let index = self.install(Some(source), entries).await;
        debug!(
            "Catalog refreshed: {} entries (generation {})",
            index.len(),
            index.generation()
        );
        index
    }

    /// Every entry's identifier and title, in parse order
    ///
    /// Under [`RefreshPolicy::OnList`] this re-fetches the source first.
    pub async fn list_catalog(&self) -> Vec<CatalogItem> {
        let index = match self.refresh_policy {
            RefreshPolicy::OnList => self.refresh().await,
            RefreshPolicy::OnConfigure => self.snapshot().await,
        };
        index.list()
    }

    /// Look up one entry in the current generation; never fetches
    pub async fn get_meta(&self, id: &str) -> Option<MediaEntry> {
        self.snapshot().await.get(id).cloned()
    }

    /// Resolve one entry's playable address; never fetches
    pub async fn get_stream(&self, id: &str) -> Option<StreamTarget> {
        self.snapshot().await.get(id).map(StreamTarget::from)
    }

    async fn rebuild_entries(&self, source: &Source) -> SourceResult<Vec<MediaEntry>> {
        match source.kind {
            SourceKind::Playlist => {
                self.prober
                    .fetch_playlist(&source.url, self.fetch_timeout)
                    .await
            }
            SourceKind::DirectMedia => Ok(vec![MediaEntry::direct(&source.url)]),
            SourceKind::Unclassified => Ok(Vec::new()),
        }
    }

    /// Swap in a new generation. Callers hold the writer lock.
    async fn install(&self, source: Option<Source>, entries: Vec<MediaEntry>) -> Arc<CatalogIndex> {
        let mut current = self.current.write().await;
        let index = Arc::new(CatalogIndex::build(current.generation() + 1, source, entries));
        *current = index.clone();
        index
    }
}
