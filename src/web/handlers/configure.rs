//! Operator configuration pages
//!
//! A single form sets the source URL. Submitting it runs a configuration
//! event and renders the outcome, including the diagnostic when the URL could
//! not be classified.

use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::catalog::ConfigureOutcome;
use crate::errors::{AppError, AppResult};
use crate::models::SourceKind;
use crate::utils::{sanitize_base_url, url::UrlUtils};
use crate::web::{responses::handle_error, AppState};

#[derive(Debug, Deserialize)]
pub struct UpdatePlaylistForm {
    #[serde(default)]
    pub playlist: String,
}

/// Outcome banner shown above the form
struct Notice {
    class: &'static str,
    message: String,
}

impl Notice {
    fn success(message: String) -> Self {
        Self {
            class: "ok",
            message,
        }
    }

    fn failure(message: String) -> Self {
        Self {
            class: "error",
            message,
        }
    }
}

struct SourceSummary {
    display_url: String,
    kind: SourceKind,
    entry_count: usize,
    updated: String,
}

#[derive(Template)]
#[template(path = "configure.html")]
struct ConfigurePage {
    name: String,
    version: &'static str,
    description: String,
    notice: Option<Notice>,
    source: Option<SourceSummary>,
    current_url: String,
    manifest_url: String,
}

pub async fn index() -> Redirect {
    Redirect::to("/configure")
}

pub async fn configure_page(State(state): State<AppState>) -> Response {
    match render_page(&state, None).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => handle_error(e).into_response(),
    }
}

pub async fn update_playlist(
    State(state): State<AppState>,
    Form(form): Form<UpdatePlaylistForm>,
) -> Response {
    info!(
        "Source update submitted: {}",
        UrlUtils::obfuscate_credentials(&form.playlist)
    );

    let (status, notice) = match state.coordinator.configure(&form.playlist).await {
        Ok(outcome) if outcome.source.kind == SourceKind::Unclassified => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Notice::failure(failure_message(&outcome)),
        ),
        Ok(outcome) => (StatusCode::OK, Notice::success(success_message(&outcome))),
        Err(e) => {
            warn!("Rejected source update: {}", e);
            (StatusCode::BAD_REQUEST, Notice::failure(e.to_string()))
        }
    };

    match render_page(&state, Some(notice)).await {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => handle_error(e).into_response(),
    }
}

fn success_message(outcome: &ConfigureOutcome) -> String {
    match outcome.source.kind {
        SourceKind::DirectMedia => "Source saved as a single direct video.".to_string(),
        _ => format!(
            "Source saved as a playlist with {} entries.",
            outcome.entry_count
        ),
    }
}

fn failure_message(outcome: &ConfigureOutcome) -> String {
    let reason = outcome
        .source
        .diagnostic
        .as_deref()
        .unwrap_or("unknown reason");
    format!(
        "The URL is neither a playlist nor a playable video ({}). The catalog is empty until a working URL is saved.",
        reason
    )
}

async fn render_page(state: &AppState, notice: Option<Notice>) -> AppResult<String> {
    let addon = &state.config.addon;
    let index = state.coordinator.snapshot().await;

    let source = index.source().map(|source| SourceSummary {
        display_url: UrlUtils::obfuscate_credentials(&source.url),
        kind: source.kind,
        entry_count: index.len(),
        updated: source
            .configured_at
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string(),
    });

    let page = ConfigurePage {
        name: addon.name.clone(),
        version: env!("CARGO_PKG_VERSION"),
        description: addon.description.clone(),
        notice,
        source,
        current_url: index
            .source()
            .map(|source| source.url.clone())
            .unwrap_or_default(),
        manifest_url: format!(
            "{}/manifest.json",
            sanitize_base_url(&state.config.web.base_url)
        ),
    };

    page.render()
        .map_err(|e| AppError::internal(format!("Failed to render configuration page: {e}")))
}
