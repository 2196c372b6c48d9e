// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::analysis_service::CycleAnalysisService;
use crate::application::streaming_service::StreamingCycleService;
use crate::infrastructure::config::load_analyzer_config;
use crate::infrastructure::csv_repository::CsvMeasurementRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    analyze_upload, health_check, list_logs, log_charts, log_cycles, stream_log,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_analyzer_config()?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(CsvMeasurementRepository::new(config.data.log_dir.clone()));

    // Create services (application layer)
    let analysis_service = CycleAnalysisService::new(repository, config.analysis.parallel);
    let streaming_service = StreamingCycleService::new(
        analysis_service.clone(),
        config.analysis.stream_channel_capacity,
    );

    let state = Arc::new(AppState {
        analysis_service,
        streaming_service,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/logs", get(list_logs))
        .route("/logs/:id/cycles", get(log_cycles))
        .route("/logs/:id/charts", get(log_charts))
        .route("/logs/:id/stream", get(stream_log))
        .route("/cycles", post(analyze_upload))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = config.server.bind_addr.parse()?;
    tracing::info!(
        "Starting cycler-analytics on {} (logs in {})",
        addr,
        config.data.log_dir.display()
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
