//! Add-on protocol handlers
//!
//! These never fail: unknown catalogs and identifiers produce empty payloads,
//! which is what players expect.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
};
use serde_json::json;
use tracing::debug;

use super::strip_json_suffix;
use crate::web::{
    protocol::{Manifest, MetaDetail, MetaPreview, StreamObject},
    AppState,
};

/// Serve the add-on descriptor
pub async fn manifest(State(state): State<AppState>) -> impl IntoResponse {
    Json(Manifest::from_config(&state.config.addon))
}

/// List the catalog
pub async fn catalog(
    State(state): State<AppState>,
    Path((content_type, catalog_id)): Path<(String, String)>,
) -> impl IntoResponse {
    let catalog_id = strip_json_suffix(&catalog_id);
    if catalog_id != state.config.addon.catalog_id {
        debug!("Catalog request for unknown catalog {}/{}", content_type, catalog_id);
        return Json(json!({ "metas": [] }));
    }

    let metas: Vec<MetaPreview> = state
        .coordinator
        .list_catalog()
        .await
        .into_iter()
        .map(|item| MetaPreview::new(item, &state.config.addon))
        .collect();

    Json(json!({ "metas": metas }))
}

/// Metadata for one entry
pub async fn meta(
    State(state): State<AppState>,
    Path((_content_type, id)): Path<(String, String)>,
) -> impl IntoResponse {
    let id = strip_json_suffix(&id);
    match state.coordinator.get_meta(id).await {
        Some(entry) => Json(json!({ "meta": MetaDetail::new(entry, &state.config.addon) })),
        None => {
            debug!("Meta request for unknown id {}", id);
            Json(json!({ "meta": {} }))
        }
    }
}

/// Playable address for one entry
pub async fn stream(
    State(state): State<AppState>,
    Path((_content_type, id)): Path<(String, String)>,
) -> impl IntoResponse {
    let id = strip_json_suffix(&id);
    let streams: Vec<StreamObject> = state
        .coordinator
        .get_stream(id)
        .await
        .map(StreamObject::from)
        .into_iter()
        .collect();

    if streams.is_empty() {
        debug!("Stream request for unknown id {}", id);
    }

    Json(json!({ "streams": streams }))
}
