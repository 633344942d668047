//! In-memory catalog
//!
//! A [`CatalogIndex`] is an immutable snapshot: the entries derived from one
//! source at one point in time. It is never edited, only replaced by the
//! [`ResolutionCoordinator`].

use std::collections::HashMap;

use crate::models::{CatalogItem, MediaEntry, Source};

pub mod coordinator;

pub use coordinator::{ConfigureOutcome, ResolutionCoordinator};

#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    generation: u64,
    source: Option<Source>,
    entries: Vec<MediaEntry>,
    by_id: HashMap<String, usize>,
}

impl CatalogIndex {
    /// The index in place before any source is configured
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build generation `generation` from `entries`, keeping their order.
    /// Should an identifier repeat, the first occurrence wins.
    pub fn build(generation: u64, source: Option<Source>, entries: Vec<MediaEntry>) -> Self {
        let mut by_id = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            by_id.entry(entry.id.clone()).or_insert(position);
        }

        Self {
            generation,
            source,
            entries,
            by_id,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn source(&self) -> Option<&Source> {
        self.source.as_ref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Identifier and title of every entry, in parse order
    pub fn list(&self) -> Vec<CatalogItem> {
        self.entries.iter().map(CatalogItem::from).collect()
    }

    pub fn get(&self, id: &str) -> Option<&MediaEntry> {
        self.by_id.get(id).map(|&position| &self.entries[position])
    }
}
