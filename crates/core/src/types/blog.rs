//! Blog records as the content API serves and accepts them.
//!
//! Timestamps are kept as the API's ISO-8601 strings; the website formats
//! them for display and nothing else interprets them.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::id::{BlogId, CategoryId};

/// Visual weight of a post's call-to-action button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CtaStyle {
    #[default]
    Primary,
    Secondary,
    Outline,
}

/// Where the call-to-action is placed in the post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CtaPosition {
    Top,
    #[default]
    Bottom,
    Both,
}

/// The API stores CTA settings as free text; values outside the known set
/// read as unset.
fn known_or_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| serde_json::from_value(value).ok()))
}

/// A full blog post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blog {
    pub id: BlogId,
    pub title: String,
    pub slug: String,
    pub content: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub featured_image_url: Option<String>,

    // Author
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub author_bio: Option<String>,
    #[serde(default)]
    pub author_avatar_url: Option<String>,
    #[serde(default)]
    pub author_twitter: Option<String>,
    #[serde(default)]
    pub author_linkedin: Option<String>,
    #[serde(default)]
    pub author_facebook: Option<String>,
    #[serde(default)]
    pub author_instagram: Option<String>,
    #[serde(default)]
    pub author_github: Option<String>,
    #[serde(default)]
    pub author_website: Option<String>,

    // Call to action
    #[serde(default)]
    pub cta_text: Option<String>,
    #[serde(default)]
    pub cta_url: Option<String>,
    #[serde(default, deserialize_with = "known_or_none")]
    pub cta_style: Option<CtaStyle>,
    #[serde(default, deserialize_with = "known_or_none")]
    pub cta_position: Option<CtaPosition>,

    pub published: bool,
    pub is_featured: bool,
    #[serde(default)]
    pub read_time: u32,
    pub created_at: String,
    pub updated_at: String,
}

impl Blog {
    /// The editable part of this post, for pre-filling the edit form.
    #[must_use]
    pub fn to_form(&self) -> BlogFormData {
        BlogFormData {
            title: self.title.clone(),
            slug: self.slug.clone(),
            content: self.content.clone(),
            excerpt: self.excerpt.clone(),
            category: self.category.clone(),
            tags: self.tags.clone(),
            featured_image_url: self.featured_image_url.clone(),
            author_name: self.author_name.clone(),
            author_bio: self.author_bio.clone(),
            author_avatar_url: self.author_avatar_url.clone(),
            author_twitter: self.author_twitter.clone(),
            author_linkedin: self.author_linkedin.clone(),
            author_facebook: self.author_facebook.clone(),
            author_instagram: self.author_instagram.clone(),
            author_github: self.author_github.clone(),
            author_website: self.author_website.clone(),
            cta_text: self.cta_text.clone(),
            cta_url: self.cta_url.clone(),
            cta_style: self.cta_style,
            cta_position: self.cta_position,
            published: self.published,
            is_featured: self.is_featured,
        }
    }
}

/// Row in the dashboard and on the public blog index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogListItem {
    pub id: BlogId,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub featured_image_url: Option<String>,
    #[serde(default)]
    pub author_name: Option<String>,
    pub published: bool,
    pub is_featured: bool,
    #[serde(default)]
    pub read_time: Option<u32>,
    pub created_at: String,
}

/// Body of create and update calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogFormData {
    pub title: String,
    /// Left empty to let the API derive one from the title.
    #[serde(default)]
    pub slug: String,
    pub content: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub featured_image_url: Option<String>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub author_bio: Option<String>,
    #[serde(default)]
    pub author_avatar_url: Option<String>,
    #[serde(default)]
    pub author_twitter: Option<String>,
    #[serde(default)]
    pub author_linkedin: Option<String>,
    #[serde(default)]
    pub author_facebook: Option<String>,
    #[serde(default)]
    pub author_instagram: Option<String>,
    #[serde(default)]
    pub author_github: Option<String>,
    #[serde(default)]
    pub author_website: Option<String>,
    #[serde(default)]
    pub cta_text: Option<String>,
    #[serde(default)]
    pub cta_url: Option<String>,
    #[serde(default, deserialize_with = "known_or_none")]
    pub cta_style: Option<CtaStyle>,
    #[serde(default, deserialize_with = "known_or_none")]
    pub cta_position: Option<CtaPosition>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub is_featured: bool,
}

impl Default for BlogFormData {
    fn default() -> Self {
        Self {
            title: String::new(),
            slug: String::new(),
            content: String::new(),
            excerpt: None,
            category: None,
            tags: Vec::new(),
            featured_image_url: None,
            author_name: None,
            author_bio: None,
            author_avatar_url: None,
            author_twitter: None,
            author_linkedin: None,
            author_facebook: None,
            author_instagram: None,
            author_github: None,
            author_website: None,
            cta_text: None,
            cta_url: None,
            cta_style: Some(CtaStyle::Primary),
            cta_position: Some(CtaPosition::Bottom),
            published: false,
            is_featured: false,
        }
    }
}

/// A required form field was left blank.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0} is required")]
pub struct BlogFormError(pub &'static str);

impl BlogFormData {
    /// Check the fields the form marks as required.
    ///
    /// # Errors
    ///
    /// Returns the first blank required field.
    pub fn validate(&self) -> Result<(), BlogFormError> {
        if self.title.trim().is_empty() {
            return Err(BlogFormError("title"));
        }
        if self.content.trim().is_empty() {
            return Err(BlogFormError("content"));
        }
        Ok(())
    }
}

/// Category summary on the public blog page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Everything the public blog index needs, in one call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPageData {
    #[serde(default)]
    pub featured: Option<BlogListItem>,
    #[serde(default)]
    pub latest: Vec<BlogListItem>,
    #[serde(default)]
    pub popular: Vec<BlogListItem>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogCreated {
    pub id: BlogId,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogUpdated {
    pub slug: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishToggled {
    pub published: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturedToggled {
    pub is_featured: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkAffected {
    pub affected: u64,
}

/// Body of the bulk endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkIds {
    pub ids: Vec<BlogId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedImage {
    pub url: String,
}
