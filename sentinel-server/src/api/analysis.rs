//! Analysis API Handlers

use axum::{Json, extract::State};
use sentinel_core::domain::matching::MatchResult;
use sentinel_core::dto::session::AnalysisReport;

use crate::api::error::ApiResult;
use crate::service::session_service;
use crate::state::AppState;

/// POST /api/analysis
/// Run the analysis on the staged batches and wait for the report
pub async fn run_analysis(State(state): State<AppState>) -> ApiResult<Json<AnalysisReport>> {
    tracing::info!("Analysis requested");

    let report = session_service::launch_analysis(&state.store, state.analyzer.clone()).await?;
    Ok(Json(report))
}

/// GET /api/results
/// Match results of the last successful analysis
pub async fn list_results(State(state): State<AppState>) -> Json<Vec<MatchResult>> {
    Json(session_service::results(&state.store).await)
}
