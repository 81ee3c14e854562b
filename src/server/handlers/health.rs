//! Health handler.

use axum::{extract::State, Json};
use strum::IntoEnumIterator;

use super::super::types::{HealthResponse, ServerState};
use crate::models::Provider;

/// Liveness plus which providers have a key.
pub async fn health_handler(State(state): State<ServerState>) -> Json<HealthResponse> {
    let secrets = state.orchestrator.secrets();
    let providers = Provider::iter()
        .map(|p| (p.as_key(), secrets.has_key(p)))
        .collect();
    Json(HealthResponse {
        status: "ok",
        providers,
    })
}
