//! Blog list, blog detail and blog mutation state.

use std::str::FromStr;

use aigenthix_core::{Blog, BlogFormData, BlogId, BlogListItem};
use serde::{Deserialize, Serialize};

use crate::api::{ApiError, BlogsApi, BulkAction};

/// Dashboard list of every post.
#[derive(Debug, Clone, Serialize)]
pub struct BlogListState {
    pub blogs: Vec<BlogListItem>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for BlogListState {
    fn default() -> Self {
        Self {
            blogs: Vec::new(),
            loading: true,
            error: None,
        }
    }
}

/// Counters shown above the dashboard table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total: usize,
    pub published: usize,
    pub draft: usize,
    pub featured: usize,
}

/// Dashboard filter tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlogFilter {
    #[default]
    All,
    Published,
    Draft,
    Featured,
}

impl BlogFilter {
    #[must_use]
    pub fn matches(self, blog: &BlogListItem) -> bool {
        match self {
            Self::All => true,
            Self::Published => blog.published,
            Self::Draft => !blog.published,
            Self::Featured => blog.is_featured,
        }
    }
}

impl FromStr for BlogFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "published" => Ok(Self::Published),
            "draft" => Ok(Self::Draft),
            "featured" => Ok(Self::Featured),
            other => Err(format!("unknown filter: {other}")),
        }
    }
}

fn contains_ci(field: Option<&str>, query: &str) -> bool {
    field.is_some_and(|value| value.to_lowercase().contains(query))
}

impl BlogListState {
    /// Fetch the list.
    pub async fn load(api: &BlogsApi) -> Self {
        let mut state = Self::default();
        state.refetch(api).await;
        state
    }

    /// Fetch the list again. On failure the previous rows are kept.
    pub async fn refetch(&mut self, api: &BlogsApi) {
        self.loading = true;
        self.error = None;
        match api.get_all().await {
            Ok(blogs) => self.blogs = blogs,
            Err(e) => self.error = Some(e.message_or("Failed to load blogs")),
        }
        self.loading = false;
    }

    #[must_use]
    pub fn stats(&self) -> DashboardStats {
        DashboardStats {
            total: self.blogs.len(),
            published: self.blogs.iter().filter(|b| b.published).count(),
            draft: self.blogs.iter().filter(|b| !b.published).count(),
            featured: self.blogs.iter().filter(|b| b.is_featured).count(),
        }
    }

    /// Rows passing `filter` whose title, category or author contains `query`.
    ///
    /// Matching is case-insensitive; a blank query matches every row.
    #[must_use]
    pub fn filtered(&self, filter: BlogFilter, query: &str) -> Vec<&BlogListItem> {
        let search = (!query.trim().is_empty()).then(|| query.trim().to_lowercase());
        self.blogs
            .iter()
            .filter(|blog| filter.matches(blog))
            .filter(|blog| match &search {
                None => true,
                Some(q) => {
                    blog.title.to_lowercase().contains(q.as_str())
                        || contains_ci(blog.category.as_deref(), q)
                        || contains_ci(blog.author_name.as_deref(), q)
                }
            })
            .collect()
    }
}

/// Edit page state for one post.
#[derive(Debug, Clone, Serialize)]
pub struct BlogDetailState {
    pub blog: Option<Blog>,
    pub loading: bool,
    pub error: Option<String>,
}

impl BlogDetailState {
    /// Fetch one post.
    pub async fn load(api: &BlogsApi, id: BlogId) -> Self {
        match api.get_by_id(id).await {
            Ok(blog) => Self {
                blog: Some(blog),
                loading: false,
                error: None,
            },
            Err(e) => Self {
                blog: None,
                loading: false,
                error: Some(e.message_or("Failed to load blog")),
            },
        }
    }
}

/// Create, update, delete, toggle and bulk actions with their progress flags.
///
/// Each action clears `error` first, reports success as a `bool`, and leaves
/// the failure message in `error`. Flags drop back to `false` whatever the outcome.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BlogMutations {
    pub submitting: bool,
    pub deleting: bool,
    pub toggling: bool,
    pub error: Option<String>,
    #[serde(skip)]
    last_created: Option<BlogId>,
}

#[derive(Clone, Copy)]
enum Flag {
    Submitting,
    Deleting,
    Toggling,
}

impl BlogMutations {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn flag(&mut self, flag: Flag) -> &mut bool {
        match flag {
            Flag::Submitting => &mut self.submitting,
            Flag::Deleting => &mut self.deleting,
            Flag::Toggling => &mut self.toggling,
        }
    }

    fn begin(&mut self, flag: Flag) {
        *self.flag(flag) = true;
        self.error = None;
    }

    fn finish<T>(&mut self, flag: Flag, result: Result<T, ApiError>, fallback: &str) -> Option<T> {
        *self.flag(flag) = false;
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.error = Some(e.message_or(fallback));
                None
            }
        }
    }

    /// Id of the post most recently created through [`BlogMutations::create`].
    #[must_use]
    pub const fn last_created(&self) -> Option<BlogId> {
        self.last_created
    }

    pub async fn create(&mut self, api: &BlogsApi, data: &BlogFormData) -> bool {
        self.begin(Flag::Submitting);
        let result = api.create(data).await;
        match self.finish(Flag::Submitting, result, "Failed to create blog") {
            Some(created) => {
                self.last_created = Some(created.id);
                true
            }
            None => false,
        }
    }

    pub async fn update(&mut self, api: &BlogsApi, id: BlogId, data: &BlogFormData) -> bool {
        self.begin(Flag::Submitting);
        let result = api.update(id, data).await;
        self.finish(Flag::Submitting, result, "Failed to update blog")
            .is_some()
    }

    pub async fn delete(&mut self, api: &BlogsApi, id: BlogId) -> bool {
        self.begin(Flag::Deleting);
        let result = api.delete(id).await;
        self.finish(Flag::Deleting, result, "Failed to delete blog")
            .is_some()
    }

    pub async fn toggle_publish(&mut self, api: &BlogsApi, id: BlogId) -> bool {
        self.begin(Flag::Toggling);
        let result = api.toggle_publish(id).await;
        self.finish(Flag::Toggling, result, "Failed to toggle publish")
            .is_some()
    }

    pub async fn toggle_featured(&mut self, api: &BlogsApi, id: BlogId) -> bool {
        self.begin(Flag::Toggling);
        let result = api.toggle_featured(id).await;
        self.finish(Flag::Toggling, result, "Failed to toggle featured")
            .is_some()
    }

    /// Run a bulk action. An empty selection sends nothing and reports `false`.
    pub async fn bulk(&mut self, api: &BlogsApi, action: BulkAction, ids: &[BlogId]) -> bool {
        if ids.is_empty() {
            return false;
        }
        let (flag, fallback) = match action {
            BulkAction::Publish => (Flag::Submitting, "Bulk publish failed"),
            BulkAction::Unpublish => (Flag::Submitting, "Bulk unpublish failed"),
            BulkAction::Delete => (Flag::Deleting, "Bulk delete failed"),
        };
        self.begin(flag);
        let result = api.bulk(action, ids).await;
        self.finish(flag, result, fallback).is_some()
    }

    pub async fn bulk_publish(&mut self, api: &BlogsApi, ids: &[BlogId]) -> bool {
        self.bulk(api, BulkAction::Publish, ids).await
    }

    pub async fn bulk_unpublish(&mut self, api: &BlogsApi, ids: &[BlogId]) -> bool {
        self.bulk(api, BulkAction::Unpublish, ids).await
    }

    pub async fn bulk_delete(&mut self, api: &BlogsApi, ids: &[BlogId]) -> bool {
        self.bulk(api, BulkAction::Delete, ids).await
    }
}
