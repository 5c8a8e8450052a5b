//! Blog namespace of the admin API. Every call is authenticated.

use aigenthix_core::{
    Blog, BlogCreated, BlogFormData, BlogId, BlogListItem, BlogUpdated, BulkAffected, BulkIds,
    FeaturedToggled, PublishToggled, UploadedImage,
};
use serde::de::IgnoredAny;
use serde_json::Value;

use super::client::{ApiClient, UploadFile};
use super::error::ApiError;

const BLOGS: &str = "/api/admin/blogs";
const UPLOAD_IMAGE: &str = "/api/admin/upload/image";

/// Typed calls against `/api/admin/blogs`.
#[derive(Debug, Clone)]
pub struct BlogsApi {
    client: ApiClient,
}

/// Which bulk endpoint to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    Publish,
    Unpublish,
    Delete,
}

impl BulkAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Publish => "publish",
            Self::Unpublish => "unpublish",
            Self::Delete => "delete",
        }
    }

    fn endpoint(self) -> String {
        format!("{BLOGS}/bulk/{}", self.as_str())
    }
}

impl std::str::FromStr for BulkAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "publish" => Ok(Self::Publish),
            "unpublish" => Ok(Self::Unpublish),
            "delete" => Ok(Self::Delete),
            other => Err(format!("unknown bulk action: {other}")),
        }
    }
}

fn blog_endpoint(id: BlogId) -> String {
    format!("{BLOGS}/{id}")
}

impl BlogsApi {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Every post, drafts included.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn get_all(&self) -> Result<Vec<BlogListItem>, ApiError> {
        self.client.get(BLOGS, true).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn get_by_id(&self, id: BlogId) -> Result<Blog, ApiError> {
        self.client.get(&blog_endpoint(id), true).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn create(&self, data: &BlogFormData) -> Result<BlogCreated, ApiError> {
        self.client.post(BLOGS, data, true).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn update(&self, id: BlogId, data: &BlogFormData) -> Result<BlogUpdated, ApiError> {
        self.client.put(&blog_endpoint(id), data, true).await
    }

    /// Delete a post. Whatever the API sends back is discarded.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn delete(&self, id: BlogId) -> Result<(), ApiError> {
        self.client
            .delete::<IgnoredAny>(&blog_endpoint(id), true)
            .await
            .map(|_| ())
    }

    /// Flip the published flag; returns the new value.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn toggle_publish(&self, id: BlogId) -> Result<PublishToggled, ApiError> {
        self.client
            .patch::<_, Value>(&format!("{BLOGS}/{id}/publish"), None, true)
            .await
    }

    /// Flip the featured flag; returns the new value.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn toggle_featured(&self, id: BlogId) -> Result<FeaturedToggled, ApiError> {
        self.client
            .patch::<_, Value>(&format!("{BLOGS}/{id}/featured"), None, true)
            .await
    }

    /// Run a bulk action over `ids`; returns how many posts changed.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn bulk(&self, action: BulkAction, ids: &[BlogId]) -> Result<BulkAffected, ApiError> {
        let body = BulkIds { ids: ids.to_vec() };
        self.client.post(&action.endpoint(), &body, true).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn bulk_publish(&self, ids: &[BlogId]) -> Result<BulkAffected, ApiError> {
        self.bulk(BulkAction::Publish, ids).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn bulk_unpublish(&self, ids: &[BlogId]) -> Result<BulkAffected, ApiError> {
        self.bulk(BulkAction::Unpublish, ids).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn bulk_delete(&self, ids: &[BlogId]) -> Result<BulkAffected, ApiError> {
        self.bulk(BulkAction::Delete, ids).await
    }

    /// Upload an image for a post; returns its public URL.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::upload`].
    pub async fn upload_image(&self, file: UploadFile) -> Result<UploadedImage, ApiError> {
        self.client.upload(UPLOAD_IMAGE, file, true).await
    }
}
