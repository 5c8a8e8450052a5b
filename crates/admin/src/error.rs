//! Unified error handling for admin.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::api::{ApiError, ApiErrorKind};
use crate::storage::StorageError;

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// A content API call failed.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Credential storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// HTTP status this error is answered with.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Api(err) => api_status(err),
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// Map a content API failure onto the status the panel answers with.
fn api_status(err: &ApiError) -> StatusCode {
    if err.is_unauthorized() {
        return StatusCode::UNAUTHORIZED;
    }
    match err.kind() {
        ApiErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
        ApiErrorKind::InvalidRequest => StatusCode::BAD_REQUEST,
        ApiErrorKind::Network | ApiErrorKind::InvalidResponse | ApiErrorKind::EmptyResponse => {
            StatusCode::BAD_GATEWAY
        }
        ApiErrorKind::Status | ApiErrorKind::Rejected => match err.status() {
            Some(404) => StatusCode::NOT_FOUND,
            Some(200..=299) => StatusCode::UNPROCESSABLE_ENTITY,
            Some(code @ 400..=499) => {
                StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST)
            }
            _ => StatusCode::BAD_GATEWAY,
        },
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Log server errors with Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        // Content API messages are written for operators; internal detail is not
        let message = match &self {
            Self::Api(err) => err.message().to_string(),
            Self::Storage(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        (status, Json(json!({ "ok": false, "error": message }))).into_response()
    }
}

/// Set the Sentry user context from the signed-in operator.
pub fn set_sentry_user(user_id: i64, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
