mod config;
mod decoder;
mod errors;
mod evaluation;
mod extraction;
mod llm_client;
mod models;
mod render;
mod routes;
mod state;
mod tailoring;
mod workspace;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extraction::document::LocalDocumentParser;
use crate::llm_client::azure::AzureOpenAiBackend;
use crate::llm_client::LlmClient;
use crate::render::LatexRenderer;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Fails fast when a required variable is missing
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume-flow v{}", env!("CARGO_PKG_VERSION"));

    let backend = AzureOpenAiBackend::new(&config)?;
    info!(
        primary = %config.primary.deployment,
        economy = %config.economy.deployment,
        embedding = %config.embedding.deployment,
        "Azure OpenAI backend initialized"
    );

    let renderer = LatexRenderer::new(config.latex_bin.clone());
    info!(latex_bin = %config.latex_bin, temp_dir = %config.temp_dir.display(), "renderer ready");

    let state = AppState {
        llm: LlmClient::new(Arc::new(backend)),
        config: Arc::new(config.clone()),
        documents: Arc::new(LocalDocumentParser),
        renderer: Arc::new(renderer),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
