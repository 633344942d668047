//! JSON API handlers
//!
//! Thin wrappers over the coordinator using the standard response envelope.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::CatalogIndex;
use crate::config::RefreshPolicy;
use crate::models::Source;
use crate::utils::url::UrlUtils;
use crate::web::{
    responses::{handle_result, ok},
    AppState,
};

#[derive(Debug, Clone, Deserialize)]
pub struct SourceUpdateRequest {
    pub url: String,
}

/// Current source and catalog summary
#[derive(Debug, Clone, Serialize)]
pub struct SourceStatus {
    pub source: Option<Source>,
    pub entry_count: usize,
    pub generation: u64,
    pub refresh_policy: RefreshPolicy,
}

impl SourceStatus {
    fn from_index(index: &CatalogIndex, refresh_policy: RefreshPolicy) -> Self {
        Self {
            source: index.source().cloned(),
            entry_count: index.len(),
            generation: index.generation(),
            refresh_policy,
        }
    }
}

pub async fn get_source(State(state): State<AppState>) -> impl IntoResponse {
    let index = state.coordinator.snapshot().await;
    ok(SourceStatus::from_index(&index, state.coordinator.refresh_policy()))
}

/// Configuration event; an unclassifiable source is still a successful
/// update and carries its diagnostic in the returned source
pub async fn update_source(
    State(state): State<AppState>,
    Json(request): Json<SourceUpdateRequest>,
) -> impl IntoResponse {
    info!(
        "Source update requested via API: {}",
        UrlUtils::obfuscate_credentials(&request.url)
    );
    handle_result(state.coordinator.configure(&request.url).await)
}

pub async fn refresh_source(State(state): State<AppState>) -> impl IntoResponse {
    let index = state.coordinator.refresh().await;
    ok(SourceStatus::from_index(&index, state.coordinator.refresh_policy()))
}

pub async fn list_catalog(State(state): State<AppState>) -> impl IntoResponse {
    ok(state.coordinator.list_catalog().await)
}

pub async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    ok(state.coordinator.get_meta(&id).await)
}

pub async fn get_entry_stream(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    ok(state.coordinator.get_stream(&id).await)
}
