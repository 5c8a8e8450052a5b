//! Signed-in operator state.

use aigenthix_core::{LoginRequest, LoginResponse, User};

use crate::api::AuthApi;
use crate::error::AppError;

/// The operator loaded from credential storage.
#[derive(Debug, Clone)]
pub struct AuthSession {
    api: AuthApi,
    user: Option<User>,
}

impl AuthSession {
    /// Load whatever user is stored.
    #[must_use]
    pub fn load(api: AuthApi) -> Self {
        let user = api.stored_user();
        Self { api, user }
    }

    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Log in and persist the credential.
    ///
    /// # Errors
    ///
    /// Returns the API failure, or a storage failure when saving.
    pub async fn login(&mut self, request: &LoginRequest) -> Result<LoginResponse, AppError> {
        let response = self.api.login(request).await?;
        self.api.save_auth(&response.token, &response.user)?;
        self.user = Some(response.user.clone());
        Ok(response)
    }

    /// Forget the credential.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    pub fn logout(&mut self) -> Result<(), AppError> {
        self.api.clear_auth()?;
        self.user = None;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use aigenthix_core::{AuthToken, UserId};

    use super::*;
    use crate::api::{ApiClient, DEFAULT_TIMEOUT};
    use crate::storage::MemoryStore;

    fn api() -> AuthApi {
        AuthApi::new(ApiClient::new(
            "http://localhost:8000",
            DEFAULT_TIMEOUT,
            Arc::new(MemoryStore::new()),
        ))
    }

    #[test]
    fn test_empty_storage_is_signed_out() {
        assert!(!AuthSession::load(api()).is_authenticated());
    }

    #[test]
    fn test_stored_user_is_loaded_and_logout_clears() {
        let api = api();
        let user = User {
            id: UserId::new(1),
            email: "admin@aigenthix.com".to_string(),
            name: "Admin".to_string(),
        };
        api.save_auth(&AuthToken::new("tok"), &user).unwrap();

        let mut session = AuthSession::load(api.clone());
        assert!(session.is_authenticated());
        assert_eq!(session.user().unwrap().name, "Admin");

        session.logout().unwrap();
        assert!(!session.is_authenticated());
        assert!(api.token().is_none());
    }
}
