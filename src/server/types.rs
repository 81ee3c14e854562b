//! Server state and wire types.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::orchestrator::Orchestrator;

/// Shared state for the HTTP front door
#[derive(Clone)]
pub struct ServerState {
    pub orchestrator: Arc<Orchestrator>,
}

impl ServerState {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self { orchestrator }
    }
}

/// Body of `POST /analyze`. Both fields are optional on the wire so missing
/// values produce a validation message instead of a deserialization error.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeBody {
    pub url: Option<String>,
    #[serde(alias = "ai_choice")]
    pub mode: Option<String>,
}

/// `{"error": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// JSON response for `/health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub providers: BTreeMap<&'static str, bool>,
}
