//! The website router against the mock content API.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use aigenthix_integration_tests::MockApi;
use aigenthix_website::config::WebsiteConfig;
use aigenthix_website::services::BlogService;
use aigenthix_website::state::AppState;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    response::Response,
};
use serde_json::Value;
use tower::ServiceExt;

fn website(api: &MockApi, cache_ttl: Duration) -> Router {
    let url = api.url();
    let mut config = WebsiteConfig::from_lookup(move |key| match key {
        "WEBSITE_API_URL" => Some(url.clone()),
        _ => None,
    })
    .unwrap();
    config.cache_ttl = cache_ttl;
    aigenthix_website::app(AppState::new(config))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_blog_index_is_presentation_ready() {
    let api = MockApi::start().await;
    let response = website(&api, Duration::ZERO)
        .oneshot(get("/blog"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["featured"]["href"], "/blog/post-1");
    assert_eq!(body["featured"]["date"], "December 10, 2024");
    assert_eq!(body["latest"].as_array().unwrap().len(), 3);
    assert_eq!(body["categories"][1]["name"], "Data");
}

#[tokio::test]
async fn test_blog_post_with_related() {
    let api = MockApi::start().await;
    let response = website(&api, Duration::ZERO)
        .oneshot(get("/blog/hello-world"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["slug"], "hello-world");
    assert_eq!(body["canonical_url"], "https://aigenthix.com/blog/hello-world");
    assert!(
        body["content_html"]
            .as_str()
            .unwrap()
            .contains("<h2>Intro</h2>")
    );
    // Same category, excluding the post itself (id 1)
    let related: Vec<i64> = body["related"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect();
    assert_eq!(related, vec![2]);
}

#[tokio::test]
async fn test_unknown_slug_is_not_found() {
    let api = MockApi::start().await;
    let response = website(&api, Duration::ZERO)
        .oneshot(get("/blog/missing"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"], "Blog not found");
}

#[tokio::test]
async fn test_page_data_is_cached() {
    let api = MockApi::start().await;
    let service = BlogService::new(&api.url(), Duration::from_secs(10), Duration::from_secs(60));

    service.get_page_data().await.unwrap();
    service.get_page_data().await.unwrap();
    assert_eq!(api.authorizations().len(), 1);

    let uncached = BlogService::new(&api.url(), Duration::from_secs(10), Duration::ZERO);
    uncached.get_page_data().await.unwrap();
    uncached.get_page_data().await.unwrap();
    assert_eq!(api.authorizations().len(), 3);
}

#[tokio::test]
async fn test_public_calls_send_no_authorization() {
    let api = MockApi::start().await;
    website(&api, Duration::ZERO)
        .oneshot(get("/blog"))
        .await
        .unwrap();
    assert_eq!(api.authorizations(), vec![None]);
}
