//! Cookie-presence route guard.
//!
//! Runs before every page. It only checks whether an `auth_token` cookie is
//! present; the content API validates the token itself on each call.

use axum::{
    extract::{FromRequestParts, Request},
    http::{StatusCode, header::COOKIE, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use aigenthix_core::AuthToken;
use serde_json::json;

use crate::storage::token_from_cookie_header;

/// Pages that need a signed-in operator.
pub const PROTECTED_PREFIXES: &[&str] = &["/dashboard", "/blogs/new", "/blogs/edit"];

/// Pages only a signed-out visitor should see.
pub const AUTH_ONLY_PREFIXES: &[&str] = &["/login"];

/// Paths the guard never looks at.
pub const UNGUARDED_PREFIXES: &[&str] = &[
    "/api/",
    "/_next/static/",
    "/_next/image/",
    "/static/",
    "/favicon.ico",
];

/// Where signed-in visitors land.
pub const LANDING_PATH: &str = "/dashboard";

/// Outcome of checking one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// Signed-out visitor on a protected page.
    RedirectToLogin { return_to: String },
    /// Signed-in visitor on the login page.
    RedirectToLanding,
}

impl GuardDecision {
    /// Redirect target, if any.
    #[must_use]
    pub fn location(&self) -> Option<String> {
        match self {
            Self::Allow => None,
            Self::RedirectToLogin { return_to } => Some(login_url(return_to)),
            Self::RedirectToLanding => Some(LANDING_PATH.to_string()),
        }
    }
}

fn has_prefix(path: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|prefix| path.starts_with(prefix))
}

/// `true` for paths the guard skips entirely.
#[must_use]
pub fn is_unguarded(path: &str) -> bool {
    path == "/api" || has_prefix(path, UNGUARDED_PREFIXES)
}

/// Decide what to do with a navigation to `path`.
#[must_use]
pub fn evaluate(path: &str, authenticated: bool) -> GuardDecision {
    if is_unguarded(path) {
        return GuardDecision::Allow;
    }
    if !authenticated && has_prefix(path, PROTECTED_PREFIXES) {
        return GuardDecision::RedirectToLogin {
            return_to: path.to_string(),
        };
    }
    if authenticated && has_prefix(path, AUTH_ONLY_PREFIXES) {
        return GuardDecision::RedirectToLanding;
    }
    GuardDecision::Allow
}

/// `/login?redirect=<path>`.
#[must_use]
pub fn login_url(return_to: &str) -> String {
    format!("/login?redirect={}", urlencoding::encode(return_to))
}

/// Where to send the operator after a successful login.
///
/// Only local absolute paths that can go into a `Location` header are honoured.
#[must_use]
pub fn safe_return_target(redirect: Option<&str>) -> String {
    match redirect.map(str::trim) {
        Some(target)
            if target.starts_with('/')
                && !target.starts_with("//")
                && !target.contains('\\')
                && !target.chars().any(char::is_control) =>
        {
            target.to_string()
        }
        _ => LANDING_PATH.to_string(),
    }
}

/// The `auth_token` cookie of a request, if set and non-empty.
#[must_use]
pub fn token_from_headers(headers: &axum::http::HeaderMap) -> Option<AuthToken> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(token_from_cookie_header)
}

/// Middleware applying [`evaluate`] to every request.
pub async fn route_guard(request: Request, next: Next) -> Response {
    let authenticated = token_from_headers(request.headers()).is_some();
    let decision = evaluate(request.uri().path(), authenticated);

    match decision.location() {
        Some(location) => {
            tracing::debug!(path = %request.uri().path(), %location, "Route guard redirect");
            Redirect::to(&location).into_response()
        }
        None => next.run(request).await,
    }
}

/// Extractor for the optional `auth_token` cookie.
#[derive(Debug, Clone)]
pub struct AuthCookie(pub Option<AuthToken>);

impl<S> FromRequestParts<S> for AuthCookie
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(token_from_headers(&parts.headers)))
    }
}

/// Extractor that requires the `auth_token` cookie.
///
/// Pages are already redirected by [`route_guard`]; this covers the JSON
/// action endpoints under `/api/`, which answer 401 instead.
#[derive(Debug, Clone)]
pub struct RequireToken(pub AuthToken);

/// Rejection when [`RequireToken`] finds no cookie.
#[derive(Debug)]
pub struct MissingToken;

impl IntoResponse for MissingToken {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            axum::Json(json!({"ok": false, "error": "Not authenticated"})),
        )
            .into_response()
    }
}

impl<S> FromRequestParts<S> for RequireToken
where
    S: Send + Sync,
{
    type Rejection = MissingToken;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        token_from_headers(&parts.headers).map(Self).ok_or(MissingToken)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{Router, body::Body, http::header::LOCATION, routing::get};
    use rstest::rstest;
    use tower::ServiceExt;

    use super::*;

    #[rstest]
    #[case("/dashboard")]
    #[case("/dashboard/stats")]
    #[case("/blogs/new")]
    #[case("/blogs/edit/4")]
    fn test_protected_without_cookie_redirects_to_login(#[case] path: &str) {
        assert_eq!(
            evaluate(path, false),
            GuardDecision::RedirectToLogin {
                return_to: path.to_string()
            }
        );
        assert_eq!(evaluate(path, true), GuardDecision::Allow);
    }

    #[test]
    fn test_login_with_cookie_redirects_to_dashboard() {
        assert_eq!(evaluate("/login", true), GuardDecision::RedirectToLanding);
        assert_eq!(evaluate("/login", false), GuardDecision::Allow);
    }

    #[rstest]
    #[case("/api/blogs/1/delete")]
    #[case("/_next/static/chunk.js")]
    #[case("/_next/image/x.png")]
    #[case("/favicon.ico")]
    #[case("/static/app.css")]
    fn test_unguarded_paths_pass(#[case] path: &str) {
        assert_eq!(evaluate(path, false), GuardDecision::Allow);
        assert_eq!(evaluate(path, true), GuardDecision::Allow);
    }

    #[test]
    fn test_other_paths_pass() {
        assert_eq!(evaluate("/blogs", false), GuardDecision::Allow);
        assert_eq!(evaluate("/health", true), GuardDecision::Allow);
    }

    #[test]
    fn test_login_url_encodes_path() {
        assert_eq!(login_url("/blogs/edit/4"), "/login?redirect=%2Fblogs%2Fedit%2F4");
    }

    #[rstest]
    #[case(Some("/blogs/edit/4"), "/blogs/edit/4")]
    #[case(Some("//evil.example"), "/dashboard")]
    #[case(Some("https://evil.example"), "/dashboard")]
    #[case(Some("/\\evil.example"), "/dashboard")]
    #[case(Some("/a\nb"), "/dashboard")]
    #[case(Some("/a\u{7f}b"), "/dashboard")]
    #[case(Some(""), "/dashboard")]
    #[case(None, "/dashboard")]
    fn test_safe_return_target(#[case] redirect: Option<&str>, #[case] expected: &str) {
        assert_eq!(safe_return_target(redirect), expected);
    }

    fn guarded_app() -> Router {
        Router::new()
            .route("/dashboard", get(|| async { "dashboard" }))
            .route("/login", get(|| async { "login" }))
            .layer(axum::middleware::from_fn(route_guard))
    }

    #[tokio::test]
    async fn test_middleware_redirects_without_cookie() {
        let response = guarded_app()
            .oneshot(Request::builder().uri("/dashboard").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(LOCATION).unwrap(),
            "/login?redirect=%2Fdashboard"
        );
    }

    #[tokio::test]
    async fn test_middleware_empty_cookie_counts_as_absent() {
        let response = guarded_app()
            .oneshot(
                Request::builder()
                    .uri("/dashboard")
                    .header(COOKIE, "auth_token=")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn test_middleware_login_with_cookie() {
        let response = guarded_app()
            .oneshot(
                Request::builder()
                    .uri("/login")
                    .header(COOKIE, "auth_token=abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(LOCATION).unwrap(), "/dashboard");
    }
}
