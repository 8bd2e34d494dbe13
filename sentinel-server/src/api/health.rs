//! Health Check API Handler

use axum::{Json, extract::State};
use sentinel_core::domain::session::DetectionStatus;

use crate::service::session_service;
use crate::state::AppState;

/// GET /health
/// Liveness plus the current session status
pub async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let status: DetectionStatus = session_service::summary(&state.store).await.status;
    Json(serde_json::json!({ "status": "ok", "session": status }))
}
