use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

use crate::services::RecommendError;

#[derive(Debug)]
pub enum ApiError {
    /// Missing or malformed request field. 400, message names the field.
    Validation(String),

    NotFound(String),

    /// Upstream provider failed in a way that cannot degrade to an empty
    /// payload. 502.
    UpstreamUnavailable(String),

    /// Recommendation provider key absent. 503.
    CredentialMissing(String),

    /// Unexpected store failure. 500 with a generic body; the real error
    /// goes to the log.
    Database(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::UpstreamUnavailable(msg) => write!(f, "Upstream unavailable: {msg}"),
            Self::CredentialMissing(msg) => write!(f, "Credential missing: {msg}"),
            Self::Database(msg) => write!(f, "Database error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::UpstreamUnavailable(msg) => {
                tracing::warn!("Upstream failure: {}", msg);
                (StatusCode::BAD_GATEWAY, "Upstream provider is unavailable".to_string())
            }
            Self::CredentialMissing(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            Self::Database(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error })).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<RecommendError> for ApiError {
    fn from(err: RecommendError) -> Self {
        match err {
            RecommendError::CredentialMissing(_) => Self::CredentialMissing(err.to_string()),
            RecommendError::Upstream(msg) => Self::UpstreamUnavailable(msg),
            RecommendError::Storage(msg) => Self::Database(msg),
        }
    }
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        Self::NotFound(format!("{resource} {id} not found"))
    }
}
