//! Authentication records exchanged with the content API.

use core::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};

use super::email::Email;
use super::id::UserId;

/// The signed-in user as returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
}

/// Login form payload.
///
/// The password never appears in `Debug` output.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: Email,
    #[serde(serialize_with = "serialize_secret")]
    pub password: SecretString,
}

impl LoginRequest {
    #[must_use]
    pub fn new(email: Email, password: impl Into<String>) -> Self {
        Self {
            email,
            password: SecretString::from(password.into()),
        }
    }
}

fn serialize_secret<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

/// Opaque bearer credential issued at login.
#[derive(Clone)]
pub struct AuthToken(SecretString);

impl AuthToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// The raw token, for the `Authorization` header and storage only.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Value of the `Authorization` header carrying this token.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.expose())
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken([REDACTED])")
    }
}

impl From<String> for AuthToken {
    fn from(token: String) -> Self {
        Self::new(token)
    }
}

/// Successful login.
///
/// The login endpoint answers with a flat `{success, token, user}` body
/// rather than the generic envelope.
#[derive(Debug, Clone)]
pub struct LoginResponse {
    pub token: AuthToken,
    pub user: User,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_serializes_password() {
        let request = LoginRequest::new(Email::parse("admin@aigenthix.com").unwrap(), "hunter22");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["email"], "admin@aigenthix.com");
        assert_eq!(json["password"], "hunter22");
    }

    #[test]
    fn test_login_request_debug_hides_password() {
        let request = LoginRequest::new(Email::parse("admin@aigenthix.com").unwrap(), "hunter22");
        assert!(!format!("{request:?}").contains("hunter22"));
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = AuthToken::new("abc.def.ghi");
        assert_eq!(format!("{token:?}"), "AuthToken([REDACTED])");
        assert_eq!(token.bearer(), "Bearer abc.def.ghi");
    }

    #[test]
    fn test_user_roundtrip() {
        let user: User =
            serde_json::from_str(r#"{"id":3,"email":"e@aigenthix.com","name":"Editor"}"#).unwrap();
        assert_eq!(user.id, UserId::new(3));
        assert_eq!(user.name, "Editor");
    }
}
