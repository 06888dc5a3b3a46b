use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::error;

use crate::error::ScanError;
use crate::models::ScanMode;

use super::{validate, AppState};

#[derive(Debug, Deserialize)]
pub struct ScanQuery {
    #[serde(default)]
    pub target: String,
}

pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "scanbridge is running" }))
}

/// Full scan: port discovery plus vulnerability scripts.
pub async fn scan(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ScanQuery>,
) -> Response {
    run_scan(state, params, ScanMode::Full).await
}

/// Quick scan: port discovery only.
pub async fn quick_scan(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ScanQuery>,
) -> Response {
    run_scan(state, params, ScanMode::Quick).await
}

async fn run_scan(state: Arc<AppState>, params: ScanQuery, mode: ScanMode) -> Response {
    let target = params.target.trim();
    if target.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "target parameter is required");
    }

    if !validate::is_valid_target(target).await {
        return error_response(
            StatusCode::BAD_REQUEST,
            "invalid target; must be a valid IP address or domain name",
        );
    }

    match state.runner.run(target, mode).await {
        Ok(report) => Json(report).into_response(),
        Err(err) => scan_error_response(err),
    }
}

fn scan_error_response(err: ScanError) -> Response {
    match err {
        ScanError::Timeout { .. } => {
            error_response(StatusCode::REQUEST_TIMEOUT, &err.to_string())
        }
        ScanError::DependencyMissing(_) | ScanError::ExecutionFailed(_) => {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
        }
        // Internal detail stays in the server log.
        ScanError::Unexpected(detail) => {
            error!("Unexpected scan failure: {}", detail);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "an unexpected error occurred during the scan",
            )
        }
    }
}

fn error_response(status: StatusCode, detail: &str) -> Response {
    (status, Json(serde_json::json!({ "detail": detail }))).into_response()
}
