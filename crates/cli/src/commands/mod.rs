//! Command implementations.

pub mod auth;
pub mod blogs;

use std::path::Path;
use std::sync::Arc;

use aigenthix_admin::api::{ApiClient, ApiError, AuthApi, BlogsApi};
use aigenthix_admin::config::{ApiConfig, ConfigError};
use aigenthix_admin::storage::{FileStore, StorageError};
use aigenthix_core::{BlogFormError, EmailError};
use serde::Serialize;
use thiserror::Error;

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("Credential storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Email(#[from] EmailError),

    #[error("{0}")]
    Form(#[from] BlogFormError),

    #[error("Not logged in. Run `cms login` first.")]
    NotLoggedIn,
}

/// API namespaces bound to the file credential store.
pub struct Context {
    client: ApiClient,
}

impl Context {
    /// Read `CMS_API_URL`/`CMS_API_TIMEOUT_MS` and open the store in `state_dir`.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Config` for malformed variables.
    pub fn load(state_dir: &Path) -> Result<Self, CliError> {
        let _ = dotenvy::dotenv();
        let api = ApiConfig::from_env()?;
        let store = FileStore::in_dir(state_dir);
        tracing::debug!(api = %api.base_url, store = %store.path().display(), "Loaded context");
        Ok(Self {
            client: ApiClient::new(&api.base_url, api.timeout, Arc::new(store)),
        })
    }

    #[must_use]
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.client.clone())
    }

    /// The blogs namespace, once a token is stored.
    ///
    /// # Errors
    ///
    /// Returns `CliError::NotLoggedIn` without a stored token.
    pub fn blogs(&self) -> Result<BlogsApi, CliError> {
        if self.auth().token().is_none() {
            return Err(CliError::NotLoggedIn);
        }
        Ok(BlogsApi::new(self.client.clone()))
    }
}

/// Write a value to stdout as pretty JSON.
#[allow(clippy::print_stdout)]
pub fn emit<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
