//! Application state shared across handlers.

use std::sync::Arc;

use aigenthix_core::AuthToken;

use crate::api::{ApiClient, AuthApi, BlogsApi};
use crate::config::AdminConfig;
use crate::storage::MemoryStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    api: ApiClient,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("api", &self.inner.api)
            .finish_non_exhaustive()
    }
}

impl AppState {
    #[must_use]
    pub fn new(config: AdminConfig) -> Self {
        let api = ApiClient::new(
            &config.api.base_url,
            config.api.timeout,
            Arc::new(MemoryStore::new()),
        );
        Self {
            inner: Arc::new(AppStateInner { config, api }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// A client carrying the caller's token, sharing the connection pool.
    #[must_use]
    pub fn api_for(&self, token: Option<&AuthToken>) -> ApiClient {
        let store = token.map_or_else(MemoryStore::new, MemoryStore::with_token);
        self.inner.api.with_credentials(Arc::new(store))
    }

    #[must_use]
    pub fn blogs(&self, token: &AuthToken) -> BlogsApi {
        BlogsApi::new(self.api_for(Some(token)))
    }

    #[must_use]
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.api_for(None))
    }
}
