//! Blog route handlers.

use aigenthix_core::{Blog, BlogId, BlogListItem, BlogPageData, Category, CtaPosition, CtaStyle};
use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::instrument;

use crate::content::{
    DEFAULT_IMAGE_WIDTH, format_date, is_valid_url, optimize_image, render_content,
    sanitize_text, truncate_text,
};
use crate::error::Result;
use crate::state::AppState;

/// Number of related posts shown under a post.
const RELATED_POSTS_COUNT: usize = 3;

/// A post as it appears in a list.
#[derive(Debug, Clone, Serialize)]
pub struct BlogCard {
    pub id: BlogId,
    pub title: String,
    pub slug: String,
    pub href: String,
    pub excerpt: String,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub image_url: String,
    pub author_name: Option<String>,
    pub date: String,
    pub read_time: Option<u32>,
    pub is_featured: bool,
}

impl BlogCard {
    #[must_use]
    pub fn new(item: &BlogListItem, image_width: u32, excerpt_len: usize) -> Self {
        let excerpt = item
            .excerpt
            .as_deref()
            .map(|e| truncate_text(&sanitize_text(e), excerpt_len))
            .unwrap_or_default();
        Self {
            id: item.id,
            title: item.title.clone(),
            slug: item.slug.clone(),
            href: format!("/blog/{}", item.slug),
            excerpt,
            category: item.category.clone(),
            tags: item.tags.clone(),
            image_url: optimize_image(item.featured_image_url.as_deref(), image_width),
            author_name: item.author_name.clone(),
            date: format_date(Some(&item.created_at)),
            read_time: item.read_time,
            is_featured: item.is_featured,
        }
    }
}

/// The blog index.
#[derive(Debug, Serialize)]
pub struct BlogIndexView {
    pub featured: Option<BlogCard>,
    pub latest: Vec<BlogCard>,
    pub popular: Vec<BlogCard>,
    pub categories: Vec<Category>,
}

impl From<&BlogPageData> for BlogIndexView {
    fn from(data: &BlogPageData) -> Self {
        let card = |item: &BlogListItem| BlogCard::new(item, 600, 120);
        Self {
            featured: data
                .featured
                .as_ref()
                .map(|item| BlogCard::new(item, DEFAULT_IMAGE_WIDTH, 200)),
            latest: data.latest.iter().map(card).collect(),
            popular: data.popular.iter().map(card).collect(),
            categories: data.categories.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SocialLink {
    pub platform: &'static str,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct AuthorView {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub links: Vec<SocialLink>,
}

impl AuthorView {
    fn new(blog: &Blog) -> Self {
        let links = [
            ("twitter", &blog.author_twitter),
            ("linkedin", &blog.author_linkedin),
            ("facebook", &blog.author_facebook),
            ("instagram", &blog.author_instagram),
            ("github", &blog.author_github),
            ("website", &blog.author_website),
        ]
        .into_iter()
        .filter_map(|(platform, url)| {
            url.as_deref()
                .filter(|u| is_valid_url(u))
                .map(|u| SocialLink {
                    platform,
                    url: u.to_string(),
                })
        })
        .collect();

        Self {
            name: blog.author_name.clone(),
            bio: blog.author_bio.as_deref().map(sanitize_text),
            avatar_url: blog
                .author_avatar_url
                .as_deref()
                .filter(|u| is_valid_url(u))
                .map(str::to_owned),
            links,
        }
    }
}

/// Call to action, present only with text and a safe URL.
#[derive(Debug, Serialize)]
pub struct CtaView {
    pub text: String,
    pub url: String,
    pub style: CtaStyle,
    pub position: CtaPosition,
}

impl CtaView {
    fn new(blog: &Blog) -> Option<Self> {
        let text = blog.cta_text.as_deref().filter(|t| !t.trim().is_empty())?;
        let url = blog.cta_url.as_deref().filter(|u| is_valid_url(u))?;
        Some(Self {
            text: sanitize_text(text),
            url: url.to_string(),
            style: blog.cta_style.unwrap_or_default(),
            position: blog.cta_position.unwrap_or_default(),
        })
    }
}

/// A single post, ready to render.
#[derive(Debug, Serialize)]
pub struct BlogDetailView {
    pub id: BlogId,
    pub title: String,
    pub slug: String,
    pub canonical_url: String,
    pub excerpt: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub date: String,
    pub read_time: u32,
    pub image_url: String,
    pub content_html: String,
    pub author: AuthorView,
    pub cta: Option<CtaView>,
    pub related: Vec<BlogCard>,
}

impl BlogDetailView {
    #[must_use]
    pub fn new(blog: &Blog, base_url: &str, related: Vec<BlogCard>) -> Self {
        Self {
            id: blog.id,
            title: blog.title.clone(),
            slug: blog.slug.clone(),
            canonical_url: format!("{base_url}/blog/{}", blog.slug),
            excerpt: blog.excerpt.as_deref().map(sanitize_text),
            category: blog.category.clone(),
            tags: blog.tags.clone(),
            date: format_date(Some(&blog.created_at)),
            read_time: blog.read_time,
            image_url: optimize_image(blog.featured_image_url.as_deref(), 1200),
            content_html: render_content(&blog.content),
            author: AuthorView::new(blog),
            cta: CtaView::new(blog),
            related,
        }
    }
}

/// Latest posts sharing `blog`'s category, excluding `blog` itself.
#[must_use]
pub fn related_posts(blog: &Blog, data: &BlogPageData) -> Vec<BlogCard> {
    let Some(category) = blog.category.as_deref() else {
        return Vec::new();
    };
    data.latest
        .iter()
        .filter(|item| item.category.as_deref() == Some(category) && item.id != blog.id)
        .take(RELATED_POSTS_COUNT)
        .map(|item| BlogCard::new(item, 400, 120))
        .collect()
}

/// GET /blog
///
/// # Errors
///
/// Returns 502 or 504 when the content API fails.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<BlogIndexView>> {
    let data = state.blogs().get_page_data().await?;
    Ok(Json(BlogIndexView::from(&data)))
}

/// GET /blog/{slug}
///
/// # Errors
///
/// Returns 404 for an unknown slug; 502 or 504 when the content API fails.
/// Related posts are best-effort.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<BlogDetailView>> {
    let blog = state.blogs().get_blog_by_slug(&slug).await?;

    let related = if blog.category.is_some() {
        match state.blogs().get_page_data().await {
            Ok(data) => related_posts(&blog, &data),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load related posts");
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };

    Ok(Json(BlogDetailView::new(
        &blog,
        &state.config().base_url,
        related,
    )))
}
