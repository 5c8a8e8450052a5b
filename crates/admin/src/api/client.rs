//! Shared request wrapper for the content API.
//!
//! Every call from the admin goes through [`ApiClient`]. A call is bounded by
//! a single timeout covering both sending and reading the body, the bearer
//! token is attached when the endpoint needs it and one is stored, and the
//! response is classified into a payload or an [`ApiError`]. Nothing is retried.

use std::sync::Arc;
use std::time::Duration;

use aigenthix_core::{Envelope, string_field};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, instrument};

use super::error::{ApiError, ApiErrorKind};
use crate::storage::CredentialStore;

/// Default bound on one request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(15_000);

/// Which family of messages a failure is reported with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flavor {
    Json,
    Upload,
}

impl Flavor {
    const fn timeout(self) -> &'static str {
        match self {
            Self::Json => "Request timed out. Please try again.",
            Self::Upload => "Upload timed out. Please try again.",
        }
    }

    const fn network(self) -> &'static str {
        match self {
            Self::Json => "Network error. Please check your connection.",
            Self::Upload => "Network error during upload.",
        }
    }

    const fn rejected(self) -> &'static str {
        match self {
            Self::Json => "API error",
            Self::Upload => "Upload failed",
        }
    }
}

/// A file to send as the `file` part of a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    #[must_use]
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }
}

/// What came back from one exchange, before classification.
#[derive(Debug)]
pub(crate) struct RawResponse {
    pub status: StatusCode,
    pub text: String,
}

/// Content API client.
///
/// Cheap to clone. The credential store decides whether a bearer token is sent.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    credentials: Arc<dyn CredentialStore>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("timeout", &self.inner.timeout)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for the API at `base_url`.
    ///
    /// Trailing slashes on `base_url` are dropped; endpoints start with `/`.
    #[must_use]
    pub fn new(
        base_url: &str,
        timeout: Duration,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            inner: Arc::new(ApiClientInner {
                http: reqwest::Client::new(),
                base_url: base_url.trim().trim_end_matches('/').to_string(),
                timeout,
                credentials,
            }),
        }
    }

    /// The same API and connection pool, reading tokens from another store.
    #[must_use]
    pub fn with_credentials(&self, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            inner: Arc::new(ApiClientInner {
                http: self.inner.http.clone(),
                base_url: self.inner.base_url.clone(),
                timeout: self.inner.timeout,
                credentials,
            }),
        }
    }

    #[must_use]
    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.inner.credentials
    }

    pub(crate) fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.inner.base_url)
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }

    fn authorize(&self, builder: RequestBuilder, requires_auth: bool) -> RequestBuilder {
        if !requires_auth {
            return builder;
        }
        match self.inner.credentials.token() {
            Some(token) => match HeaderValue::from_str(&token.bearer()) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    builder.header(AUTHORIZATION, value)
                }
                Err(_) => builder,
            },
            None => builder,
        }
    }

    /// Send a request and classify the answer.
    ///
    /// `body` is sent as-is under `Content-Type: application/json`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] for timeouts, transport failures, non-2xx
    /// statuses, empty or non-JSON bodies, rejected envelopes, and payloads
    /// that do not decode into `T`.
    #[instrument(skip(self, method, body), fields(method = %method))]
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Vec<u8>>,
        requires_auth: bool,
    ) -> Result<T, ApiError> {
        let mut builder = self
            .inner
            .http
            .request(method, self.url(endpoint))
            .header(CONTENT_TYPE, "application/json");
        builder = self.authorize(builder, requires_auth);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let raw = self.exchange(endpoint, builder, Flavor::Json).await?;
        let status = raw.status;
        let payload = interpret_response(endpoint, &raw, Flavor::Json)?;
        decode(endpoint, status, payload)
    }

    /// `GET endpoint`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        requires_auth: bool,
    ) -> Result<T, ApiError> {
        self.request(Method::GET, endpoint, None, requires_auth).await
    }

    /// `POST endpoint` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
        requires_auth: bool,
    ) -> Result<T, ApiError> {
        let body = json_body(endpoint, body)?;
        self.request(Method::POST, endpoint, Some(body), requires_auth)
            .await
    }

    /// `PUT endpoint` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
        requires_auth: bool,
    ) -> Result<T, ApiError> {
        let body = json_body(endpoint, body)?;
        self.request(Method::PUT, endpoint, Some(body), requires_auth)
            .await
    }

    /// `PATCH endpoint`, with or without a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: Option<&B>,
        requires_auth: bool,
    ) -> Result<T, ApiError> {
        let body = body.map(|b| json_body(endpoint, b)).transpose()?;
        self.request(Method::PATCH, endpoint, body, requires_auth)
            .await
    }

    /// `DELETE endpoint`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn delete<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        requires_auth: bool,
    ) -> Result<T, ApiError> {
        self.request(Method::DELETE, endpoint, None, requires_auth)
            .await
    }

    /// `POST endpoint` as `multipart/form-data` with a single `file` part.
    ///
    /// # Errors
    ///
    /// As [`ApiClient::request`], with upload-specific messages.
    #[instrument(skip(self, file), fields(file_name = %file.file_name, size = file.bytes.len()))]
    pub async fn upload<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        file: UploadFile,
        requires_auth: bool,
    ) -> Result<T, ApiError> {
        let part = reqwest::multipart::Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.mime)
            .map_err(|e| {
                ApiError::new(
                    ApiErrorKind::InvalidRequest,
                    format!("Invalid file type: {e}"),
                    endpoint,
                )
            })?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let builder = self
            .inner
            .http
            .post(self.url(endpoint))
            .multipart(form);
        let builder = self.authorize(builder, requires_auth);

        let raw = self.exchange(endpoint, builder, Flavor::Upload).await?;
        let status = raw.status;
        let payload = interpret_response(endpoint, &raw, Flavor::Upload)?;
        decode(endpoint, status, payload)
    }

    /// Send `builder` and read the whole body, both under the timeout.
    ///
    /// Dropping the future on expiry aborts the in-flight request.
    pub(crate) async fn exchange(
        &self,
        endpoint: &str,
        builder: RequestBuilder,
        flavor: Flavor,
    ) -> Result<RawResponse, ApiError> {
        debug!(endpoint, "Sending content API request");

        let exchange = async {
            let response = builder.send().await?;
            let status = response.status();
            let text = response.text().await?;
            Ok::<_, reqwest::Error>(RawResponse { status, text })
        };

        match tokio::time::timeout(self.inner.timeout, exchange).await {
            Ok(Ok(raw)) => Ok(raw),
            Ok(Err(e)) if e.is_timeout() => {
                error!(endpoint, "Content API request timed out");
                Err(ApiError::new(ApiErrorKind::Timeout, flavor.timeout(), endpoint))
            }
            Ok(Err(e)) => {
                error!(endpoint, error = %e, "Content API network error");
                Err(ApiError::new(ApiErrorKind::Network, flavor.network(), endpoint))
            }
            Err(_) => {
                error!(endpoint, timeout_ms = self.inner.timeout.as_millis(), "Content API request timed out");
                Err(ApiError::new(ApiErrorKind::Timeout, flavor.timeout(), endpoint))
            }
        }
    }
}

/// Serialize a request body.
fn json_body<B: Serialize + ?Sized>(endpoint: &str, body: &B) -> Result<Vec<u8>, ApiError> {
    serde_json::to_vec(body).map_err(|e| {
        ApiError::new(
            ApiErrorKind::InvalidRequest,
            format!("Could not encode request: {e}"),
            endpoint,
        )
    })
}

/// Decode the payload into the caller's type.
fn decode<T: DeserializeOwned>(
    endpoint: &str,
    status: StatusCode,
    payload: Value,
) -> Result<T, ApiError> {
    serde_json::from_value(payload).map_err(|e| {
        error!(endpoint, error = %e, "Content API payload has unexpected shape");
        ApiError::new(ApiErrorKind::InvalidResponse, "Invalid server response", endpoint)
            .with_status(status.as_u16())
    })
}

/// Parse a non-empty body. `Ok(None)` means the body was empty.
pub(crate) fn parse_body(
    endpoint: &str,
    raw: &RawResponse,
    invalid_message: &str,
) -> Result<Option<Value>, ApiError> {
    if raw.text.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(&raw.text).map(Some).map_err(|_| {
        error!(endpoint, status = raw.status.as_u16(), "Content API returned non-JSON body");
        ApiError::new(ApiErrorKind::InvalidResponse, invalid_message, endpoint)
            .with_status(raw.status.as_u16())
    })
}

/// Classify a completed exchange into its payload or an error.
pub(crate) fn interpret_response(
    endpoint: &str,
    raw: &RawResponse,
    flavor: Flavor,
) -> Result<Value, ApiError> {
    let status = raw.status.as_u16();
    let body = parse_body(endpoint, raw, "Invalid server response")?;

    if !raw.status.is_success() {
        let message = body
            .as_ref()
            .and_then(|b| string_field(b, "error"))
            .unwrap_or_else(|| match flavor {
                Flavor::Json => format!("Request failed with status {status}"),
                Flavor::Upload => "Upload failed".to_string(),
            });
        error!(endpoint, status, %message, "Content API returned error status");
        return Err(ApiError::new(ApiErrorKind::Status, message, endpoint).with_status(status));
    }

    let Some(body) = body else {
        let message = match flavor {
            Flavor::Json => "Empty response from server",
            Flavor::Upload => "Upload failed",
        };
        return Err(ApiError::new(ApiErrorKind::EmptyResponse, message, endpoint).with_status(status));
    };

    match Envelope::interpret(body) {
        Envelope::Payload(payload) => Ok(payload),
        Envelope::Rejected(rejection) => {
            let message = rejection
                .message
                .unwrap_or_else(|| flavor.rejected().to_string());
            error!(endpoint, status, %message, "Content API rejected request");
            Err(ApiError::new(ApiErrorKind::Rejected, message, endpoint).with_status(status))
        }
    }
}
