// HTTP request handlers
use crate::application::error::AnalysisError;
use crate::infrastructure::chunked_json::stream_from_receiver;
use crate::infrastructure::csv_repository::parse_measurements;
use crate::infrastructure::json_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

fn status_for(error: &AnalysisError) -> StatusCode {
    match error {
        AnalysisError::InputSchema { .. } | AnalysisError::Csv(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        AnalysisError::LogNotFound(_) => StatusCode::NOT_FOUND,
        AnalysisError::Io(_) | AnalysisError::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn respond<T: Serialize>(result: Result<T, AnalysisError>, compress: bool) -> Response {
    let rendered = match result {
        Ok(data) => json_response(StatusCode::OK, &data, compress).await,
        Err(e) => {
            let status = status_for(&e);
            if status.is_server_error() {
                tracing::error!("Analysis failed: {}", e);
            } else {
                tracing::warn!("Analysis rejected: {}", e);
            }
            let body = ErrorBody {
                error: e.to_string(),
            };
            json_response(status, &body, compress).await
        }
    };

    match rendered {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List all analysable logs
pub async fn list_logs(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let result = state.analysis_service.list_logs().await;
    respond(result, accepts_brotli(&headers)).await
}

/// Per-cycle summaries of a stored log
pub async fn log_cycles(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let result = state.analysis_service.analyze_log(&id).await;
    respond(result, accepts_brotli(&headers)).await
}

/// Chart series of a stored log
pub async fn log_charts(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let result = state.analysis_service.chart_log(&id).await;
    respond(result, accepts_brotli(&headers)).await
}

/// Stream the summaries of a stored log, one chunk per cycle
pub async fn stream_log(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let rx = state.streaming_service.stream_log(&id);
    stream_from_receiver(rx, accepts_brotli(&headers)).await
}

/// Summarise a CSV log posted as the request body
pub async fn analyze_upload(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Response {
    let result = match parse_measurements(&body) {
        Ok(measurements) => state.analysis_service.analyze(measurements).await,
        Err(e) => Err(e),
    };
    respond(result, accepts_brotli(&headers)).await
}
