//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::WebsiteConfig;
use crate::services::BlogService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WebsiteConfig,
    blogs: BlogService,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("blogs", &self.inner.blogs)
            .finish_non_exhaustive()
    }
}

impl AppState {
    #[must_use]
    pub fn new(config: WebsiteConfig) -> Self {
        let blogs = BlogService::new(&config.api_url, config.api_timeout, config.cache_ttl);
        Self {
            inner: Arc::new(AppStateInner { config, blogs }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &WebsiteConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn blogs(&self) -> &BlogService {
        &self.inner.blogs
    }
}
