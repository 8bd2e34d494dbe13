//! Session API Handlers

use axum::{Json, extract::State, http::StatusCode};
use sentinel_core::domain::log::LogEntry;
use sentinel_core::domain::stats::SystemStats;
use sentinel_core::dto::session::SessionSummary;

use crate::service::session_service;
use crate::state::AppState;

/// GET /api/session
pub async fn get_session(State(state): State<AppState>) -> Json<SessionSummary> {
    Json(session_service::summary(&state.store).await)
}

/// DELETE /api/session
/// Reset the session to idle
pub async fn clear_session(State(state): State<AppState>) -> StatusCode {
    session_service::clear(&state.store).await;
    StatusCode::NO_CONTENT
}

/// GET /api/stats
pub async fn get_stats(State(state): State<AppState>) -> Json<SystemStats> {
    Json(session_service::stats(&state.store).await)
}

/// GET /api/logs
/// Pipeline output, newest first
pub async fn get_logs(State(state): State<AppState>) -> Json<Vec<LogEntry>> {
    Json(session_service::logs(&state.store).await)
}
