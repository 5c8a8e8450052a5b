//! Authentication namespace: login and the stored credential.

use aigenthix_core::{AuthToken, LoginRequest, LoginResponse, User, string_field};
use reqwest::header::CONTENT_TYPE;
use tracing::{info, instrument, warn};

use super::client::{ApiClient, Flavor, RawResponse, parse_body};
use super::error::{ApiError, ApiErrorKind};
use crate::storage::{CredentialStore, StorageError, TOKEN_KEY, USER_KEY};

const LOGIN_ENDPOINT: &str = "/api/auth/login";

/// Login and credential storage.
#[derive(Debug, Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Exchange an email and password for a token.
    ///
    /// The login endpoint is not enveloped, so the body is inspected directly.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the credentials are refused, the body is
    /// malformed, or the API cannot be reached in time.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let body = serde_json::to_vec(request).map_err(|e| {
            ApiError::new(
                ApiErrorKind::InvalidRequest,
                format!("Could not encode request: {e}"),
                LOGIN_ENDPOINT,
            )
        })?;
        let builder = self
            .client
            .http()
            .post(self.client.url(LOGIN_ENDPOINT))
            .header(CONTENT_TYPE, "application/json")
            .body(body);

        let raw = self
            .client
            .exchange(LOGIN_ENDPOINT, builder, Flavor::Json)
            .await?;
        let response = interpret_login(&raw)?;
        info!(user_id = %response.user.id, "Login succeeded");
        Ok(response)
    }

    /// Persist a successful login.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn save_auth(&self, token: &AuthToken, user: &User) -> Result<(), StorageError> {
        let store = self.client.credentials();
        store.set(TOKEN_KEY, token.expose())?;
        store.set(USER_KEY, &serde_json::to_string(user)?)?;
        Ok(())
    }

    /// Forget the stored credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn clear_auth(&self) -> Result<(), StorageError> {
        let store = self.client.credentials();
        store.remove(TOKEN_KEY)?;
        store.remove(USER_KEY)?;
        Ok(())
    }

    /// The stored user. A missing or unreadable entry yields `None`.
    #[must_use]
    pub fn stored_user(&self) -> Option<User> {
        let raw = self.client.credentials().get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "Stored user entry is corrupt");
                None
            }
        }
    }

    /// The stored token.
    #[must_use]
    pub fn token(&self) -> Option<AuthToken> {
        self.client.credentials().token()
    }
}

/// Classify the login endpoint's answer.
fn interpret_login(raw: &RawResponse) -> Result<LoginResponse, ApiError> {
    let status = raw.status.as_u16();
    let body = parse_body(LOGIN_ENDPOINT, raw, "Invalid login response from server")?;

    if !raw.status.is_success() {
        let message = body
            .as_ref()
            .and_then(|b| string_field(b, "detail").or_else(|| string_field(b, "error")))
            .unwrap_or_else(|| "Login failed".to_string());
        warn!(status, %message, "Login refused");
        return Err(ApiError::new(ApiErrorKind::Status, message, LOGIN_ENDPOINT).with_status(status));
    }

    let unexpected = || {
        ApiError::new(
            ApiErrorKind::InvalidResponse,
            "Unexpected login response from server",
            LOGIN_ENDPOINT,
        )
        .with_status(status)
    };

    let body = body.ok_or_else(unexpected)?;
    let token = string_field(&body, "token").ok_or_else(unexpected)?;
    let user = body
        .get("user")
        .filter(|u| !u.is_null())
        .cloned()
        .and_then(|u| serde_json::from_value::<User>(u).ok())
        .ok_or_else(unexpected)?;

    Ok(LoginResponse {
        token: AuthToken::new(token),
        user,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use aigenthix_core::UserId;
    use reqwest::StatusCode;

    use super::*;
    use crate::api::client::DEFAULT_TIMEOUT;
    use crate::storage::MemoryStore;

    fn raw(status: u16, text: &str) -> RawResponse {
        RawResponse {
            status: StatusCode::from_u16(status).unwrap(),
            text: text.to_string(),
        }
    }

    fn auth_api() -> AuthApi {
        AuthApi::new(ApiClient::new(
            "http://localhost:8000",
            DEFAULT_TIMEOUT,
            Arc::new(MemoryStore::new()),
        ))
    }

    #[test]
    fn test_login_success() {
        let response = interpret_login(&raw(
            200,
            r#"{"success":true,"token":"jwt","user":{"id":1,"email":"a@aigenthix.com","name":"Admin"}}"#,
        ))
        .unwrap();
        assert_eq!(response.token.expose(), "jwt");
        assert_eq!(response.user.id, UserId::new(1));
    }

    #[test]
    fn test_login_non_json_body() {
        let err = interpret_login(&raw(200, "<html>oops</html>")).unwrap_err();
        assert_eq!(err.message(), "Invalid login response from server");
        assert_eq!(err.endpoint(), "/api/auth/login");
    }

    #[test]
    fn test_login_missing_token() {
        let err = interpret_login(&raw(
            200,
            r#"{"success":true,"user":{"id":1,"email":"a@aigenthix.com","name":"Admin"}}"#,
        ))
        .unwrap_err();
        assert_eq!(err.message(), "Unexpected login response from server");
    }

    #[test]
    fn test_login_missing_user() {
        let err = interpret_login(&raw(200, r#"{"token":"jwt"}"#)).unwrap_err();
        assert_eq!(err.message(), "Unexpected login response from server");
        let err = interpret_login(&raw(200, "")).unwrap_err();
        assert_eq!(err.message(), "Unexpected login response from server");
    }

    #[test]
    fn test_login_refused_prefers_detail() {
        let err = interpret_login(&raw(
            401,
            r#"{"detail":"Invalid credentials","error":"other"}"#,
        ))
        .unwrap_err();
        assert_eq!(err.message(), "Invalid credentials");
        assert_eq!(err.status(), Some(401));

        let err = interpret_login(&raw(401, r#"{"error":"Locked"}"#)).unwrap_err();
        assert_eq!(err.message(), "Locked");

        let err = interpret_login(&raw(500, "")).unwrap_err();
        assert_eq!(err.message(), "Login failed");
    }

    #[test]
    fn test_save_and_clear_auth() {
        let api = auth_api();
        let user = User {
            id: UserId::new(7),
            email: "e@aigenthix.com".to_string(),
            name: "Editor".to_string(),
        };
        api.save_auth(&AuthToken::new("tok"), &user).unwrap();
        assert_eq!(api.token().unwrap().expose(), "tok");
        assert_eq!(api.stored_user().unwrap(), user);

        api.clear_auth().unwrap();
        assert!(api.token().is_none());
        assert!(api.stored_user().is_none());
    }

    #[test]
    fn test_corrupt_user_entry_is_none() {
        let api = auth_api();
        api.client.credentials().set(USER_KEY, "{broken").unwrap();
        assert!(api.stored_user().is_none());
    }
}
