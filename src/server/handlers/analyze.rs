//! Analysis handler.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::warn;

use super::super::types::{AnalyzeBody, ErrorResponse, ServerState};
use crate::error_handling::AnalysisError;
use crate::models::Mode;

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}

/// `POST /analyze`: runs one analysis and returns the per-provider verdict map.
///
/// 400 for unusable input, 500 when no requested provider has a key.
pub async fn analyze_handler(
    State(state): State<ServerState>,
    body: Result<Json<AnalyzeBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("Invalid request body: {}", rejection.body_text()),
            )
        }
    };

    let mode = match body.mode.as_deref().map(str::parse::<Mode>).transpose() {
        Ok(mode) => mode.unwrap_or(Mode::Both),
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };
    let url = body.url.unwrap_or_default();

    match state.orchestrator.analyze(&url, mode).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e @ AnalysisError::Validation(_)) => {
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
        Err(e @ AnalysisError::Configuration(_)) => {
            warn!("Rejecting analysis of {url}: {e}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
