//! API Module
//!
//! HTTP layer: the dashboard page with its form actions, and the JSON API.

pub mod analysis;
pub mod dashboard;
pub mod error;
pub mod health;
pub mod session;
pub mod snapshot;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Create the main router with all endpoints
pub fn create_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Dashboard
        .route("/", get(dashboard::index))
        .route("/dashboard/upload/{checkpoint}", post(dashboard::upload))
        .route("/dashboard/analyze", post(dashboard::analyze))
        .route("/dashboard/clear", post(dashboard::clear))
        // Snapshot endpoints
        .route(
            "/api/snapshots/{checkpoint}",
            post(snapshot::upload_snapshots).get(snapshot::list_snapshots),
        )
        // Analysis endpoints
        .route("/api/analysis", post(analysis::run_analysis))
        .route("/api/results", get(analysis::list_results))
        // Session endpoints
        .route("/api/stats", get(session::get_stats))
        .route("/api/logs", get(session::get_logs))
        .route(
            "/api/session",
            get(session::get_session).delete(session::clear_session),
        )
        // Add state and middleware
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
