//! Client-side credential storage.
//!
//! The signed-in state is two entries: [`TOKEN_KEY`] holds the bearer token
//! and [`USER_KEY`] the user record as JSON. Browsers reach the admin server
//! with the token mirrored into the [`AUTH_COOKIE`] cookie instead, which the
//! route guard inspects on every navigation.
//!
//! Writes are plain read-modify-write without transactions; one operator per
//! store is assumed.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError, RwLock};

use aigenthix_core::AuthToken;
use thiserror::Error;
use tower_sessions::cookie::time::{Duration, OffsetDateTime};
use tower_sessions::cookie::{Cookie, SameSite};

/// Storage entry holding the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Storage entry holding the user record as JSON.
pub const USER_KEY: &str = "user";

/// Cookie mirroring the token for server-side route checks.
pub const AUTH_COOKIE: &str = "auth_token";

/// Lifetime of the mirrored cookie.
const AUTH_COOKIE_DAYS: i64 = 7;

/// Errors from reading or writing a credential store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("credential file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("credential file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key/value storage for the signed-in state.
pub trait CredentialStore: Send + Sync {
    /// Read an entry.
    fn get(&self, key: &str) -> Option<String>;

    /// Write an entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete an entry. Deleting a missing entry is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// The stored bearer token, if any. An empty entry counts as none.
    fn token(&self) -> Option<AuthToken> {
        self.get(TOKEN_KEY)
            .filter(|token| !token.is_empty())
            .map(AuthToken::new)
    }
}

/// Process-local store.
///
/// The admin server builds one per request from the `auth_token` cookie.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store already holding `token`.
    #[must_use]
    pub fn with_token(token: &AuthToken) -> Self {
        let mut entries = HashMap::new();
        entries.insert(TOKEN_KEY.to_owned(), token.expose().to_owned());
        Self {
            entries: RwLock::new(entries),
        }
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

/// Store persisted as a JSON object in a single file.
///
/// Used by the `cms` command-line tool so a login survives between runs.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// File name used inside a state directory.
    pub const FILE_NAME: &'static str = "credentials.json";

    /// A store at `dir/credentials.json`. Nothing is created until the first write.
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(Self::FILE_NAME),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(HashMap::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_vec_pretty(entries)?)?;
        Ok(())
    }

    fn update(
        &self,
        change: impl FnOnce(&mut HashMap<String, String>),
    ) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.load()?;
        change(&mut entries);
        self.save(&entries)
    }
}

impl CredentialStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.load() {
            Ok(mut entries) => entries.remove(key),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Unreadable credential file");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.insert(key.to_owned(), value.to_owned());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

/// The `auth_token` cookie carrying `token`.
#[must_use]
pub fn auth_cookie(token: &AuthToken, secure: bool) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, token.expose().to_owned()))
        .path("/")
        .max_age(Duration::days(AUTH_COOKIE_DAYS))
        .same_site(SameSite::Lax)
        .http_only(true)
        .secure(secure)
        .build()
}

/// An already-expired `auth_token` cookie, for logout.
#[must_use]
pub fn expired_auth_cookie() -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .expires(OffsetDateTime::UNIX_EPOCH)
        .build()
}

/// The `auth_token` value from a `Cookie` request header. Empty values count as absent.
#[must_use]
pub fn token_from_cookie_header(header: &str) -> Option<AuthToken> {
    Cookie::split_parse(header)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == AUTH_COOKIE)
        .map(|cookie| cookie.value().to_owned())
        .filter(|value| !value.is_empty())
        .map(AuthToken::new)
}
