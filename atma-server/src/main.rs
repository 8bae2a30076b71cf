//! Atma relay server.
//!
//! Wires the request pipeline to its HTTP surface: `POST /api/process`
//! runs one pipeline run, `GET /ws` streams status events to viewers,
//! and `GET /api/status` reports where the pipeline currently stands.

mod routes;
mod state;
mod ws;

use atma::clients::{EmailJsClient, GeminiClient};
use atma::config::AtmaConfig;
use atma::events::{EventSink, StatusChannel};
use atma::pipeline::RequestPipeline;
use state::AppState;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AtmaConfig::from_env()?;

    let channel = Arc::new(StatusChannel::default());
    let sink: Arc<dyn EventSink> = channel.clone();

    let generation = Arc::new(GeminiClient::new(config.generation.clone())?);
    let delivery = Arc::new(EmailJsClient::new(config.delivery.clone())?);
    let pipeline = Arc::new(RequestPipeline::new(
        generation,
        delivery,
        sink,
        config.timing,
    ));

    let state = AppState {
        pipeline: pipeline.clone(),
        channel,
    };
    let app = routes::router(state, &config.allowed_origins)?;

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, model = %config.generation.model, "server online");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // A reset timer from a run that just finished must not outlive us.
    pipeline.abort_idle_reset();
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    info!("shutdown signal received");
}
