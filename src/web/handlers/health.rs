//! Health check handler

use axum::{extract::State, response::IntoResponse};

use crate::web::{
    responses::{ok, HealthResponse},
    AppState,
};

/// Basic status plus a summary of the current catalog generation
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let index = state.coordinator.snapshot().await;
    ok(HealthResponse::healthy(
        index.source().map(|source| source.kind),
        index.len(),
        index.generation(),
    ))
}
