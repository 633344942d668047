use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vod_catalog::{
    catalog::ResolutionCoordinator,
    config::Config,
    models::SourceKind,
    utils::{http_client::StandardHttpClient, url::UrlUtils},
    web::WebServer,
};

#[derive(Parser)]
#[command(name = "vod-catalog")]
#[command(version)]
#[command(about = "Serves a playlist or a single video URL as a VOD add-on catalog")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Listening IP address
    #[arg(short = 'H', long, value_name = "IP")]
    host: Option<String>,

    /// Listening port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Source URL to configure at startup (overrides config file)
    #[arg(long, value_name = "URL")]
    playlist: Option<String>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging with specified level
    let log_filter = if cli.log_level == "trace" {
        format!("vod_catalog={},tower_http=trace", cli.log_level)
    } else {
        format!("vod_catalog={}", cli.log_level)
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting VOD Catalog v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load_from_file(&cli.config)?;
    info!("Configuration loaded from: {}", cli.config);

    // Override config with CLI arguments
    if let Some(host) = cli.host {
        config.web.host = host;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }
    if let Some(playlist) = cli.playlist {
        config.catalog.source_url = Some(playlist);
    }

    info!("Catalog refresh policy: {:?}", config.catalog.refresh_policy);

    let fetcher = Arc::new(StandardHttpClient::from_config(&config.catalog)?);
    let coordinator = Arc::new(ResolutionCoordinator::new(fetcher, &config.catalog));

    // A bad startup source is reported but never stops the server
    if let Some(source_url) = config.catalog.source_url.as_deref() {
        match coordinator.configure(source_url).await {
            Ok(outcome) if outcome.source.kind == SourceKind::Unclassified => warn!(
                "Startup source {} could not be classified: {}",
                UrlUtils::obfuscate_credentials(source_url),
                outcome.source.diagnostic.as_deref().unwrap_or("unknown reason")
            ),
            Ok(outcome) => info!(
                "Startup source ready: {} with {} entries",
                outcome.source.kind, outcome.entry_count
            ),
            Err(e) => warn!("Startup source rejected: {}", e),
        }
    } else {
        info!("No source configured; set one at /configure");
    }

    let web_server = WebServer::new(config, coordinator)?;

    info!(
        "Starting web server on {}:{}",
        web_server.host(),
        web_server.port()
    );
    web_server.serve().await?;

    Ok(())
}
