//! Presentation helpers for blog content.
//!
//! Dates, excerpts, image URLs and HTML sanitization. Post bodies arrive
//! either as HTML or as markdown; [`render_content`] turns both into
//! sanitized HTML.

use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use comrak::{Options, markdown_to_html};
use url::Url;

/// Shown when a post has no usable date.
pub const UNKNOWN_DATE: &str = "Recent";

/// Default excerpt length in characters.
pub const DEFAULT_TRUNCATE: usize = 150;

/// Default image width in pixels.
pub const DEFAULT_IMAGE_WIDTH: u32 = 800;

const FALLBACK_IMAGE: &str = "https://images.unsplash.com/photo-1504384308090-c894fdcc538d";

const BLOG_TAGS: &[&str] = &[
    "p", "br", "strong", "em", "u", "s", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "li",
    "blockquote", "pre", "code", "a", "img", "iframe", "div", "span", "table", "thead", "tbody",
    "tr", "td", "th",
];

// `rel` is left out: ammonia sets it on every link itself.
const BLOG_ATTRIBUTES: &[&str] = &[
    "href",
    "src",
    "alt",
    "title",
    "class",
    "id",
    "target",
    "width",
    "height",
    "frameborder",
    "allowfullscreen",
    "allow",
    "scrolling",
    "style",
];

const BLOG_URL_SCHEMES: &[&str] = &[
    "http", "https", "mailto", "tel", "callto", "sms", "cid", "xmpp",
];

static BLOG_SANITIZER: LazyLock<ammonia::Builder<'static>> = LazyLock::new(|| {
    let mut builder = ammonia::Builder::default();
    builder
        .tags(BLOG_TAGS.iter().copied().collect::<HashSet<_>>())
        .generic_attributes(BLOG_ATTRIBUTES.iter().copied().collect::<HashSet<_>>())
        .generic_attribute_prefixes(HashSet::from(["data-"]))
        .url_schemes(BLOG_URL_SCHEMES.iter().copied().collect::<HashSet<_>>());
    builder
});

static TEXT_SANITIZER: LazyLock<ammonia::Builder<'static>> =
    LazyLock::new(ammonia::Builder::empty);

/// Format an ISO-8601 timestamp as `"December 10, 2024"`.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.f]` or a bare date.
/// Anything else, or nothing, gives [`UNKNOWN_DATE`].
#[must_use]
pub fn format_date(iso: Option<&str>) -> String {
    let Some(raw) = iso.map(str::trim).filter(|s| !s.is_empty()) else {
        return UNKNOWN_DATE.to_string();
    };

    let date = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"));

    match date {
        Ok(date) => date.format("%B %-d, %Y").to_string(),
        Err(_) => {
            tracing::debug!(date = raw, "Unparseable date");
            UNKNOWN_DATE.to_string()
        }
    }
}

/// Cut `text` to `max` characters, trim, and append `"..."`.
///
/// Text within the limit is returned unchanged.
#[must_use]
pub fn truncate_text(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let prefix: String = text.chars().take(max).collect();
    format!("{}...", prefix.trim())
}

/// Size an image through its CDN.
///
/// Cloudinary URLs get a transformation segment after `/upload/`; Unsplash
/// URLs get sizing query parameters. Other URLs pass through. A missing URL
/// gives a stock Unsplash image.
#[must_use]
pub fn optimize_image(url: Option<&str>, width: u32) -> String {
    let Some(url) = url.filter(|u| !u.is_empty()) else {
        return format!("{FALLBACK_IMAGE}?auto=format&fit=crop&w={width}&q=80");
    };

    if url.contains("cloudinary.com") && url.contains("/upload/") {
        return url.replacen("/upload/", &format!("/upload/w_{width},f_auto,q_auto,c_fill/"), 1);
    }

    if url.contains("unsplash.com") {
        let separator = if url.contains('?') { '&' } else { '?' };
        return format!("{url}{separator}w={width}&q=80&auto=format&fit=crop");
    }

    url.to_string()
}

/// Clean post HTML down to the blog allowlist.
///
/// Embeds (`iframe`) and `data-*` attributes survive; scripts, event handlers
/// and `javascript:` URLs do not.
#[must_use]
pub fn sanitize_html(dirty: &str) -> String {
    if dirty.is_empty() {
        return String::new();
    }
    BLOG_SANITIZER.clean(dirty).to_string()
}

/// Strip every tag, keeping escaped text.
#[must_use]
pub fn sanitize_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    TEXT_SANITIZER.clean(text).to_string()
}

/// Whether `url` is safe to link: `http`, `https` or relative.
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    if url.trim().is_empty() {
        return false;
    }
    let Ok(base) = Url::parse("https://aigenthix.com/") else {
        return false;
    };
    base.join(url)
        .is_ok_and(|parsed| matches!(parsed.scheme(), "http" | "https"))
}

/// Escape `&`, `<` and `>` for display as text.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Turn a post body into sanitized HTML.
///
/// Bodies containing `<p>`, `<h2>` or an `<iframe` are already HTML. Anything
/// else is rendered as GitHub-flavored markdown first.
#[must_use]
pub fn render_content(content: &str) -> String {
    if content.is_empty() {
        return String::new();
    }
    if content.contains("<p>") || content.contains("<h2>") || content.contains("<iframe") {
        return sanitize_html(content);
    }
    let mut options = Options::default();
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.footnotes = true;
    // Raw HTML is passed through; sanitize_html runs afterwards.
    options.render.r#unsafe = true;

    sanitize_html(&markdown_to_html(content, &options))
}
