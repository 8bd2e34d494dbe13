//! Dashboard Handlers
//!
//! HTML page and the form actions behind its buttons. Form actions always
//! redirect back to `/`; failures travel as a `notice` query code.

use axum::{
    extract::{Multipart, Path, Query, State},
    response::{Html, Redirect},
};
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::snapshot::{parse_checkpoint, stage_upload};
use crate::service::session::{MISSING_SNAPSHOTS_MESSAGE, SessionError};
use crate::service::session_service;
use crate::state::AppState;
use crate::view::{DashboardPage, render_dashboard};

/// Messages shown after a rejected form action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    MissingSnapshots,
    AnalysisInProgress,
    InvalidUpload,
}

impl Notice {
    pub fn code(&self) -> &'static str {
        match self {
            Notice::MissingSnapshots => "missing-snapshots",
            Notice::AnalysisInProgress => "busy",
            Notice::InvalidUpload => "invalid-upload",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "missing-snapshots" => Some(Notice::MissingSnapshots),
            "busy" => Some(Notice::AnalysisInProgress),
            "invalid-upload" => Some(Notice::InvalidUpload),
            _ => None,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Notice::MissingSnapshots => MISSING_SNAPSHOTS_MESSAGE,
            Notice::AnalysisInProgress => "An analysis is already in progress.",
            Notice::InvalidUpload => "Upload rejected. Only image files can be staged.",
        }
    }

    fn redirect(&self) -> Redirect {
        Redirect::to(&format!("/?notice={}", self.code()))
    }
}

#[derive(Debug, Deserialize)]
pub struct IndexQuery {
    pub notice: Option<String>,
}

/// GET /
pub async fn index(State(state): State<AppState>, Query(query): Query<IndexQuery>) -> Html<String> {
    let session = state.store.read().await;
    let notice = query
        .notice
        .as_deref()
        .and_then(Notice::from_code)
        .map(|n| n.message());

    Html(render_dashboard(&DashboardPage {
        session: &*session,
        notice,
    }))
}

/// POST /dashboard/upload/{checkpoint}
pub async fn upload(
    State(state): State<AppState>,
    Path(checkpoint): Path<String>,
    multipart: Multipart,
) -> Result<Redirect, ApiError> {
    let checkpoint = parse_checkpoint(&checkpoint)?;

    match stage_upload(&state, checkpoint, multipart).await {
        Ok(_) => Ok(Redirect::to("/")),
        Err(ApiError::BadRequest(msg)) => {
            tracing::warn!("Dashboard upload rejected: {}", msg);
            Ok(Notice::InvalidUpload.redirect())
        }
        Err(err) => Err(err),
    }
}

/// POST /dashboard/analyze
///
/// Starts the analysis in the background; the page polls until it finishes.
pub async fn analyze(State(state): State<AppState>) -> Result<Redirect, ApiError> {
    match session_service::start_analysis(&state.store, state.analyzer.clone()).await {
        Ok(_) => Ok(Redirect::to("/")),
        Err(SessionError::MissingSnapshots) => Ok(Notice::MissingSnapshots.redirect()),
        Err(SessionError::AnalysisInProgress) => Ok(Notice::AnalysisInProgress.redirect()),
        Err(err) => Err(err.into()),
    }
}

/// POST /dashboard/clear
pub async fn clear(State(state): State<AppState>) -> Redirect {
    session_service::clear(&state.store).await;
    Redirect::to("/")
}
