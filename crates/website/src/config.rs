//! Website configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `WEBSITE_API_URL` - Content API base URL (blank or unset: `http://localhost:8000`)
//! - `WEBSITE_API_TIMEOUT_MS` - Per-request timeout (default: 10000)
//! - `WEBSITE_HOST` - Bind address (default: 127.0.0.1)
//! - `WEBSITE_PORT` - Listen port (default: 3000)
//! - `WEBSITE_BASE_URL` - Public URL for canonical links (default: `https://aigenthix.com`)
//! - `WEBSITE_CACHE_TTL_SECS` - How long blog responses are cached (default: 60, 0 disables)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Content API used when `WEBSITE_API_URL` is blank.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Website application configuration.
#[derive(Debug, Clone)]
pub struct WebsiteConfig {
    /// Content API base URL, without a trailing slash
    pub api_url: String,
    /// Per-request timeout for the content API
    pub api_timeout: Duration,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the website
    pub base_url: String,
    /// Lifetime of cached blog responses
    pub cache_ttl: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl WebsiteConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = resolve_api_url(&lookup("WEBSITE_API_URL").unwrap_or_default())?;
        let api_timeout = match parse_u64(&lookup, "WEBSITE_API_TIMEOUT_MS", 10_000)? {
            0 => {
                return Err(invalid(
                    "WEBSITE_API_TIMEOUT_MS",
                    "must be greater than zero",
                ));
            }
            ms => Duration::from_millis(ms),
        };
        let host = lookup("WEBSITE_HOST")
            .unwrap_or_else(|| "127.0.0.1".to_string())
            .parse::<IpAddr>()
            .map_err(|e| invalid("WEBSITE_HOST", e))?;
        let port = lookup("WEBSITE_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| invalid("WEBSITE_PORT", e))?;
        let base_url = lookup("WEBSITE_BASE_URL")
            .unwrap_or_else(|| "https://aigenthix.com".to_string());
        Url::parse(&base_url).map_err(|e| invalid("WEBSITE_BASE_URL", e))?;
        let cache_ttl = Duration::from_secs(parse_u64(&lookup, "WEBSITE_CACHE_TTL_SECS", 60)?);
        let sentry_dsn = lookup("SENTRY_DSN").filter(|s| !s.is_empty());

        Ok(Self {
            api_url,
            api_timeout,
            host,
            port,
            base_url: base_url.trim_end_matches('/').to_string(),
            cache_ttl,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn resolve_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let url = if trimmed.is_empty() {
        DEFAULT_API_URL
    } else {
        trimmed
    };
    Url::parse(url).map_err(|e| invalid("WEBSITE_API_URL", e))?;
    Ok(url.trim_end_matches('/').to_string())
}

fn parse_u64(
    lookup: impl Fn(&str) -> Option<String>,
    var: &str,
    default: u64,
) -> Result<u64, ConfigError> {
    lookup(var).map_or(Ok(default), |raw| {
        raw.trim().parse::<u64>().map_err(|e| invalid(var, e))
    })
}

fn invalid(var: &str, reason: impl ToString) -> ConfigError {
    ConfigError::InvalidEnvVar(var.to_string(), reason.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = WebsiteConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.api_timeout, Duration::from_secs(10));
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.base_url, "https://aigenthix.com");
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn test_blank_api_url_uses_default() {
        let config = WebsiteConfig::from_lookup(lookup(&[("WEBSITE_API_URL", "")])).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err =
            WebsiteConfig::from_lookup(lookup(&[("WEBSITE_API_TIMEOUT_MS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(var, _) if var == "WEBSITE_API_TIMEOUT_MS"));
    }

    #[test]
    fn test_cache_can_be_disabled() {
        let config =
            WebsiteConfig::from_lookup(lookup(&[("WEBSITE_CACHE_TTL_SECS", "0")])).unwrap();
        assert_eq!(config.cache_ttl, Duration::ZERO);
    }
}
