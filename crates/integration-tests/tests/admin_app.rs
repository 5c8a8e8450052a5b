//! The admin router end to end: guard, login cookie, pages and actions.

#![allow(clippy::unwrap_used)]

use aigenthix_admin::config::AdminConfig;
use aigenthix_admin::state::AppState;
use aigenthix_integration_tests::{MOCK_TOKEN, MockApi};
use axum::{
    Router,
    body::Body,
    http::{
        Request, StatusCode,
        header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
    },
    response::Response,
};
use serde_json::{Value, json};
use tower::ServiceExt;

fn admin(api: &MockApi) -> Router {
    let url = api.url();
    let config = AdminConfig::from_lookup(move |key| match key {
        "CMS_API_URL" => Some(url.clone()),
        _ => None,
    })
    .unwrap();
    aigenthix_admin::app(AppState::new(config))
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = cookie {
        builder = builder.header(COOKIE, format!("auth_token={token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(uri: &str, cookie: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = cookie {
        builder = builder.header(COOKIE, format!("auth_token={token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn post_form(uri: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

fn location(response: &Response) -> &str {
    response.headers().get(LOCATION).unwrap().to_str().unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =============================================================================
// Route guard
// =============================================================================

#[tokio::test]
async fn test_signed_out_visitor_is_sent_to_login() {
    let api = MockApi::start().await;
    let response = admin(&api).oneshot(get("/dashboard", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login?redirect=%2Fdashboard");

    let response = admin(&api)
        .oneshot(get("/blogs/edit/3", None))
        .await
        .unwrap();
    assert_eq!(location(&response), "/login?redirect=%2Fblogs%2Fedit%2F3");
}

#[tokio::test]
async fn test_signed_in_visitor_skips_login() {
    let api = MockApi::start().await;
    let response = admin(&api)
        .oneshot(get("/login", Some(MOCK_TOKEN)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");
}

#[tokio::test]
async fn test_health_is_unguarded() {
    let api = MockApi::start().await;
    let response = admin(&api).oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Login and logout
// =============================================================================

#[tokio::test]
async fn test_login_sets_cookie_and_returns_to_target() {
    let api = MockApi::start().await;
    let response = admin(&api)
        .oneshot(post_form(
            "/login",
            "email=editor%40aigenthix.com&password=hunter22&redirect=%2Fblogs%2Fnew",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/blogs/new");

    let cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.contains(&format!("auth_token={MOCK_TOKEN}")));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Path=/"));
}

#[tokio::test]
async fn test_login_ignores_offsite_redirect() {
    let api = MockApi::start().await;
    let response = admin(&api)
        .oneshot(post_form(
            "/login",
            "email=editor%40aigenthix.com&password=hunter22&redirect=%2F%2Fevil.example",
        ))
        .await
        .unwrap();
    assert_eq!(location(&response), "/dashboard");
}

#[tokio::test]
async fn test_login_with_control_characters_in_redirect_lands_on_dashboard() {
    let api = MockApi::start().await;
    let response = admin(&api)
        .oneshot(post_form(
            "/login",
            "email=editor%40aigenthix.com&password=hunter22&redirect=%2Fa%0Ab",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");
    assert!(response.headers().get(SET_COOKIE).is_some());
}

#[tokio::test]
async fn test_refused_login_is_unauthorized() {
    let api = MockApi::start().await;
    let response = admin(&api)
        .oneshot(post_form(
            "/login",
            "email=intruder%40aigenthix.com&password=guess",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body, json!({"ok": false, "error": "Invalid credentials"}));
}

#[tokio::test]
async fn test_logout_expires_cookie() {
    let api = MockApi::start().await;
    let request = Request::builder()
        .method("POST")
        .uri("/logout")
        .header(COOKIE, format!("auth_token={MOCK_TOKEN}"))
        .body(Body::empty())
        .unwrap();
    let response = admin(&api).oneshot(request).await.unwrap();
    assert_eq!(location(&response), "/login");
    let cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.contains("Max-Age=0"));
}

// =============================================================================
// Pages
// =============================================================================

#[tokio::test]
async fn test_dashboard_counts_and_filters() {
    let api = MockApi::start().await;
    let response = admin(&api)
        .oneshot(get("/dashboard", Some(MOCK_TOKEN)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["stats"], json!({"total": 3, "published": 2, "draft": 1, "featured": 1}));

    let response = admin(&api)
        .oneshot(get("/dashboard?filter=draft", Some(MOCK_TOKEN)))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["blogs"].as_array().unwrap().len(), 1);
    assert_eq!(body["blogs"][0]["id"], 2);

    // The panel forwarded the cookie as a bearer token
    assert!(
        api.authorizations()
            .iter()
            .all(|h| h.as_deref() == Some("Bearer mock-token-123"))
    );
}

#[tokio::test]
async fn test_edit_page_carries_api_error() {
    let api = MockApi::start().await;
    let response = admin(&api)
        .oneshot(get("/blogs/edit/409", Some(MOCK_TOKEN)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Slug taken");
    assert!(body["blog"].is_null());
}

#[tokio::test]
async fn test_create_requires_title() {
    let api = MockApi::start().await;
    let response = admin(&api)
        .oneshot(post_json(
            "/blogs/new",
            Some(MOCK_TOKEN),
            &json!({"title": "", "content": "Body"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(api.authorizations().is_empty());
}

#[tokio::test]
async fn test_create_returns_new_id() {
    let api = MockApi::start().await;
    let response = admin(&api)
        .oneshot(post_json(
            "/blogs/new",
            Some(MOCK_TOKEN),
            &json!({"title": "Launch", "content": "Body"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({"ok": true, "id": 42}));
}

// =============================================================================
// Actions
// =============================================================================

#[tokio::test]
async fn test_actions_require_cookie() {
    let api = MockApi::start().await;
    let response = admin(&api)
        .oneshot(post_json("/api/blogs/1/delete", None, &json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_failed_delete_reports_message() {
    let api = MockApi::start().await;
    let response = admin(&api)
        .oneshot(post_json("/api/blogs/404/delete", Some(MOCK_TOKEN), &json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        json_body(response).await,
        json!({"ok": false, "error": "Blog not found"})
    );
}

#[tokio::test]
async fn test_bulk_actions() {
    let api = MockApi::start().await;

    let response = admin(&api)
        .oneshot(post_json(
            "/api/blogs/bulk/publish",
            Some(MOCK_TOKEN),
            &json!({"ids": [1, 2]}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({"ok": true}));

    let response = admin(&api)
        .oneshot(post_json(
            "/api/blogs/bulk/archive",
            Some(MOCK_TOKEN),
            &json!({"ids": [1]}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = admin(&api)
        .oneshot(post_json(
            "/api/blogs/bulk/delete",
            Some(MOCK_TOKEN),
            &json!({"ids": []}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Only the valid, non-empty bulk call reached the API
    assert_eq!(api.authorizations().len(), 1);
}

// =============================================================================
// Image upload proxy
// =============================================================================

const BOUNDARY: &str = "aigenthix-boundary";

fn post_upload(cookie: Option<&str>, field: &str, file_name: &str) -> Request<Body> {
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
         Content-Type: image/png\r\n\r\n\
         PNG\r\n\
         --{BOUNDARY}--\r\n"
    );
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/upload/image")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(token) = cookie {
        builder = builder.header(COOKIE, format!("auth_token={token}"));
    }
    builder.body(Body::from(body)).unwrap()
}

#[tokio::test]
async fn test_upload_proxy_returns_url() {
    let api = MockApi::start().await;
    let response = admin(&api)
        .oneshot(post_upload(Some(MOCK_TOKEN), "file", "cover.png"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({"ok": true, "url": "https://cdn.aigenthix.com/uploads/cover.png"})
    );
    assert_eq!(
        api.authorizations(),
        vec![Some(format!("Bearer {MOCK_TOKEN}"))]
    );
}

#[tokio::test]
async fn test_upload_proxy_without_file_field_is_bad_request() {
    let api = MockApi::start().await;
    let response = admin(&api)
        .oneshot(post_upload(Some(MOCK_TOKEN), "attachment", "cover.png"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["error"],
        "Bad request: missing file field"
    );
    assert!(api.authorizations().is_empty());
}

#[tokio::test]
async fn test_upload_proxy_requires_cookie() {
    let api = MockApi::start().await;
    let response = admin(&api)
        .oneshot(post_upload(None, "file", "cover.png"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(api.authorizations().is_empty());
}

#[tokio::test]
async fn test_upload_proxy_passes_on_rejection() {
    let api = MockApi::start().await;
    let response = admin(&api)
        .oneshot(post_upload(Some(MOCK_TOKEN), "file", "reject.png"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json_body(response).await["error"], "Unsupported image");
}
