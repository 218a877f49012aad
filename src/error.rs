//! Error types for GymOps server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::lifecycle::{filters::FilterError, workflow::InvalidTransition};

/// Application error codes returned in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NoSuchRecord = 2,
    BadValue = 3,
    InvalidTransition = 4,
    FilterMisconfigured = 5,
    FilterFailed = 6,
    RemoteFailure = 7,
}

/// Failure reported by the remote gym API.
///
/// HTTP status codes are kept for logging only; callers treat every
/// variant as "the collaborator failed".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("remote API answered {status} for {url}")]
    Status { status: u16, url: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("could not decode remote response: {0}")]
    Decode(String),

    #[error("request cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RemoteError::Cancelled
        } else if e.is_decode() {
            RemoteError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            RemoteError::Status {
                status: status.as_u16(),
                url: e.url().map(|u| u.to_string()).unwrap_or_default(),
            }
        } else {
            RemoteError::Transport(e.to_string())
        }
    }
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("Remote API error: {0}")]
    Remote(#[from] RemoteError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchRecord, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone()),
            AppError::InvalidTransition(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorCode::InvalidTransition,
                e.to_string(),
            ),
            AppError::Filter(e @ FilterError::MissingFetcher(_)) => {
                tracing::error!("Filter pipeline misconfigured: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::FilterMisconfigured,
                    e.to_string(),
                )
            }
            AppError::Filter(e) => {
                tracing::warn!("Filter failed: {}", e);
                (StatusCode::BAD_GATEWAY, ErrorCode::FilterFailed, e.to_string())
            }
            AppError::Remote(e) => {
                tracing::error!("Remote API error: {:?}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorCode::RemoteFailure,
                    "Remote API request failed".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_maps_to_unprocessable() {
        let err = AppError::from(InvalidTransition::Terminal {
            kind: crate::lifecycle::workflow::EntityKind::Ticket,
            current: "CLOSED".to_string(),
        });
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_filter_failures_map_to_bad_gateway() {
        let err = AppError::from(FilterError::RemoteFilterFailed {
            dimension: "status".to_string(),
            cause: RemoteError::Cancelled,
        });
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);

        let err = AppError::from(FilterError::MissingFetcher("type".to_string()));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
