//! Error type for every content API failure.

use thiserror::Error;

/// Which way a call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// The timeout elapsed and the request was aborted.
    Timeout,
    /// The API answered with a non-2xx status.
    Status,
    /// The body was not JSON, or did not have the expected shape.
    InvalidResponse,
    /// A 2xx answer with nothing in the body.
    EmptyResponse,
    /// An envelope with `success: false`.
    Rejected,
    /// Connection refused, reset, DNS, TLS and the like.
    Network,
    /// The request could not be built (unencodable body or upload part).
    InvalidRequest,
}

/// A failed content API call.
///
/// `Display` is the human-readable message alone, ready to show in the panel.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ApiError {
    kind: ApiErrorKind,
    message: String,
    status: Option<u16>,
    endpoint: String,
}

impl ApiError {
    #[must_use]
    pub fn new(kind: ApiErrorKind, message: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            endpoint: endpoint.into(),
        }
    }

    /// Attach the HTTP status the API answered with.
    #[must_use]
    pub const fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub const fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        self.status
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.kind == ApiErrorKind::Timeout
    }

    /// `true` when the API refused the credential.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status, Some(401 | 403))
    }

    /// The message, or `fallback` when the message is blank.
    #[must_use]
    pub fn message_or(&self, fallback: &str) -> String {
        if self.message.trim().is_empty() {
            fallback.to_owned()
        } else {
            self.message.clone()
        }
    }
}
