//! Unified error handling with Sentry integration.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::services::BlogServiceError;

/// Application-level error type for the website.
#[derive(Debug, Error)]
pub enum AppError {
    /// Content API call failed.
    #[error("Blog service error: {0}")]
    Blog(#[from] BlogServiceError),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),
}

impl AppError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Blog(BlogServiceError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
            Self::Blog(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // A missing post is not a server fault
        let this = match self {
            Self::Blog(err) if err.is_not_found() => Self::NotFound(err.to_string()),
            other => other,
        };

        let status = this.status();
        if status.is_server_error() {
            let event_id = sentry::capture_error(&this);
            tracing::error!(
                error = %this,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let message = match &this {
            Self::Blog(BlogServiceError::Timeout) => "Request timed out".to_string(),
            Self::Blog(_) => "Failed to load blog content".to_string(),
            Self::NotFound(message) => message.clone(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
