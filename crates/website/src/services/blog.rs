//! Read-only client for the public blog endpoints.
//!
//! Every call is bounded by the configured timeout and unwrapped from the
//! `{success, data|error}` envelope. Unlike the admin wrapper, a body without
//! `success: true` is always a failure here. Successful responses are cached
//! with `moka` for the configured TTL.

use std::sync::Arc;
use std::time::Duration;

use aigenthix_core::{Blog, BlogPageData, string_field};
use moka::future::Cache;
use reqwest::{StatusCode, header::ACCEPT};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Message for a slug the API does not know.
pub const BLOG_NOT_FOUND: &str = "Blog not found";

const PAGE_DATA_FAILED: &str = "Failed to fetch page data";
const PAGE_DATA_KEY: &str = "page-data";

/// Errors from the blog endpoints.
#[derive(Debug, Error)]
pub enum BlogServiceError {
    #[error("Request timed out")]
    Timeout,
    /// Non-2xx status. `message` is the body's `error`, the reason phrase,
    /// or "Request failed".
    #[error("{message}")]
    Status { status: u16, message: String },
    /// The envelope did not report success.
    #[error("{0}")]
    Rejected(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Network error: {0}")]
    Network(String),
}

impl BlogServiceError {
    /// Whether the requested post does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status == StatusCode::NOT_FOUND.as_u16(),
            Self::Rejected(message) => message == BLOG_NOT_FOUND,
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
enum CacheValue {
    PageData(Box<BlogPageData>),
    Blog(Box<Blog>),
}

/// Client for `/api/blogs/page-data` and `/api/blogs/{slug}`.
#[derive(Clone)]
pub struct BlogService {
    inner: Arc<BlogServiceInner>,
}

struct BlogServiceInner {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    cache: Option<Cache<String, CacheValue>>,
}

impl std::fmt::Debug for BlogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlogService")
            .field("base_url", &self.inner.base_url)
            .field("timeout", &self.inner.timeout)
            .field("cached", &self.inner.cache.is_some())
            .finish()
    }
}

impl BlogService {
    /// Create a service for `base_url`. A zero `cache_ttl` disables caching.
    #[must_use]
    pub fn new(base_url: &str, timeout: Duration, cache_ttl: Duration) -> Self {
        let cache = (!cache_ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(500)
                .time_to_live(cache_ttl)
                .build()
        });

        Self {
            inner: Arc::new(BlogServiceInner {
                http: reqwest::Client::new(),
                base_url: base_url.trim().trim_end_matches('/').to_string(),
                timeout,
                cache,
            }),
        }
    }

    /// Featured, latest and popular posts plus categories, in one call.
    ///
    /// # Errors
    ///
    /// Returns `BlogServiceError` on timeout, transport failure, a non-2xx
    /// status, or an envelope without `success: true`.
    #[instrument(skip(self))]
    pub async fn get_page_data(&self) -> Result<BlogPageData, BlogServiceError> {
        if let Some(CacheValue::PageData(data)) = self.cached(PAGE_DATA_KEY).await {
            debug!("Cache hit for page data");
            return Ok(*data);
        }

        let data: BlogPageData = self
            .fetch_envelope("/api/blogs/page-data", PAGE_DATA_FAILED)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch blog page data"))?;

        self.store(PAGE_DATA_KEY, CacheValue::PageData(Box::new(data.clone())))
            .await;
        Ok(data)
    }

    /// One post by slug.
    ///
    /// # Errors
    ///
    /// As [`BlogService::get_page_data`]; an unknown slug yields
    /// "Blog not found" (see [`BlogServiceError::is_not_found`]).
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn get_blog_by_slug(&self, slug: &str) -> Result<Blog, BlogServiceError> {
        let cache_key = format!("blog:{slug}");
        if let Some(CacheValue::Blog(blog)) = self.cached(&cache_key).await {
            debug!("Cache hit for blog");
            return Ok(*blog);
        }

        let path = format!("/api/blogs/{}", urlencoding::encode(slug));
        let blog: Blog = self
            .fetch_envelope(&path, BLOG_NOT_FOUND)
            .await
            .inspect_err(|e| tracing::error!(slug, error = %e, "Failed to fetch blog"))?;

        self.store(&cache_key, CacheValue::Blog(Box::new(blog.clone())))
            .await;
        Ok(blog)
    }

    async fn cached(&self, key: &str) -> Option<CacheValue> {
        match &self.inner.cache {
            Some(cache) => cache.get(key).await,
            None => None,
        }
    }

    async fn store(&self, key: &str, value: CacheValue) {
        if let Some(cache) = &self.inner.cache {
            cache.insert(key.to_string(), value).await;
        }
    }

    async fn fetch_envelope<T: DeserializeOwned>(
        &self,
        path: &str,
        fallback: &str,
    ) -> Result<T, BlogServiceError> {
        let url = format!("{}{path}", self.inner.base_url);
        let body = self.fetch_json(&url).await?;
        unwrap_envelope(body, fallback)
    }

    /// GET `url` and decode the body leniently: a body that is not JSON is `None`.
    async fn fetch_json(&self, url: &str) -> Result<Option<Value>, BlogServiceError> {
        debug!(url, "Fetching");
        let request = self.inner.http.get(url).header(ACCEPT, "application/json");
        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let text = response.text().await?;
            Ok::<_, reqwest::Error>((status, text))
        };

        let (status, text) = match tokio::time::timeout(self.inner.timeout, exchange).await {
            Err(_) => return Err(BlogServiceError::Timeout),
            Ok(Err(e)) if e.is_timeout() => return Err(BlogServiceError::Timeout),
            Ok(Err(e)) => return Err(BlogServiceError::Network(e.to_string())),
            Ok(Ok(pair)) => pair,
        };

        let body = serde_json::from_str::<Value>(&text).ok();
        if status.is_success() {
            Ok(body)
        } else {
            Err(status_error(status, body.as_ref()))
        }
    }
}

fn status_error(status: StatusCode, body: Option<&Value>) -> BlogServiceError {
    let message = body
        .and_then(|b| string_field(b, "error"))
        .or_else(|| status.canonical_reason().map(str::to_owned))
        .unwrap_or_else(|| "Request failed".to_string());
    BlogServiceError::Status {
        status: status.as_u16(),
        message,
    }
}

fn unwrap_envelope<T: DeserializeOwned>(
    body: Option<Value>,
    fallback: &str,
) -> Result<T, BlogServiceError> {
    let Some(mut body) = body else {
        return Err(BlogServiceError::Rejected(fallback.to_string()));
    };
    if body.get("success").and_then(Value::as_bool) != Some(true) {
        let message = string_field(&body, "error").unwrap_or_else(|| fallback.to_string());
        return Err(BlogServiceError::Rejected(message));
    }
    let data = body.get_mut("data").map(Value::take).unwrap_or(Value::Null);
    serde_json::from_value(data).map_err(|e| BlogServiceError::InvalidResponse(e.to_string()))
}
