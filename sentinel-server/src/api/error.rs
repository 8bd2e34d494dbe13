//! API Error Handling
//!
//! Unified error types and conversion for API responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sentinel_client::ClientError;

use crate::service::session::{MISSING_SNAPSHOTS_MESSAGE, SessionError};

/// API error type
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    UpstreamError(ClientError),
    InternalError(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::UpstreamError(_) => StatusCode::BAD_GATEWAY,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            ApiError::NotFound(msg) | ApiError::BadRequest(msg) | ApiError::Conflict(msg) => msg,
            // Already logged where the analysis failed
            ApiError::UpstreamError(err) => format!("Analysis failed: {}", err),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                msg
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::MissingSnapshots => ApiError::BadRequest(MISSING_SNAPSHOTS_MESSAGE.to_string()),
            SessionError::AnalysisInProgress => {
                ApiError::Conflict("An analysis is already in progress".to_string())
            }
            SessionError::Superseded => {
                ApiError::Conflict("Session was cleared before the analysis finished".to_string())
            }
            SessionError::ValidationError(msg) => ApiError::BadRequest(msg),
            SessionError::AnalysisFailed(err) => ApiError::UpstreamError(err),
            SessionError::InternalError(msg) => ApiError::InternalError(msg),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
