mod config;
mod enhance;
mod errors;
mod pipeline;
mod routes;
mod state;
mod storage;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::enhance::Enhancer;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("refit_api={}", &config.rust_log))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Refit API v{}", env!("CARGO_PKG_VERSION"));

    // Create the upload and output directories
    storage::ensure_dirs(&config).await?;
    info!(
        upload_dir = %config.upload_dir.display(),
        output_dir = %config.output_dir.display(),
        "storage directories ready"
    );

    // Initialize the enhancement dispatcher; credentials are checked per
    // request, so a missing key only disables its backend.
    let enhancer = Enhancer::new(&config);
    info!(
        ollama_endpoint = %config.ollama_endpoint,
        gemini_configured = config.gemini_api_key.is_some(),
        openai_configured = config.openai_api_key.is_some(),
        "enhancement dispatcher initialized"
    );

    let port = config.port;
    let state = AppState { config, enhancer };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
