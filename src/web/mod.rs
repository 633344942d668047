//! Web layer module
//!
//! HTTP interface for the catalog. Handlers stay thin and delegate to the
//! [`ResolutionCoordinator`], which owns all catalog state.
//!
//! # Surfaces
//!
//! - **Add-on protocol**: manifest plus catalog, meta and stream resources
//! - **Operator pages**: the configuration form
//! - **API v1**: JSON access to the source and catalog
//! - **Health**: status and catalog summary

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{catalog::ResolutionCoordinator, config::Config};

pub mod handlers;
pub mod protocol;
pub mod responses;

// Re-export commonly used types
pub use responses::{handle_error, handle_result, ApiResponse};

/// Web server configuration and setup
pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(config: Config, coordinator: Arc<ResolutionCoordinator>) -> Result<Self> {
        let addr: SocketAddr = format!("{}:{}", config.web.host, config.web.port).parse()?;
        let app = router(AppState {
            config,
            coordinator,
        });

        Ok(Self { app, addr })
    }

    /// Start the web server
    pub async fn serve(self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(listener, self.app).await?;
        Ok(())
    }

    /// Get the host address
    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    /// Get the port number
    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

/// Build the router with all routes and middleware
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        // Add-on protocol; identifiers arrive with a `.json` suffix
        .route("/manifest.json", get(handlers::addon::manifest))
        .route("/catalog/{type}/{id}", get(handlers::addon::catalog))
        .route("/meta/{type}/{id}", get(handlers::addon::meta))
        .route("/stream/{type}/{id}", get(handlers::addon::stream))
        // Operator pages
        .route("/", get(handlers::configure::index))
        .route("/configure", get(handlers::configure::configure_page))
        .route("/update-playlist", post(handlers::configure::update_playlist))
        .nest("/api/v1", api_v1_routes())
        // Middleware (applied in reverse order)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/source",
            get(handlers::api::get_source).put(handlers::api::update_source),
        )
        .route("/source/refresh", post(handlers::api::refresh_source))
        .route("/catalog", get(handlers::api::list_catalog))
        .route("/catalog/{id}", get(handlers::api::get_entry))
        .route("/catalog/{id}/stream", get(handlers::api::get_entry_stream))
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub coordinator: Arc<ResolutionCoordinator>,
}
