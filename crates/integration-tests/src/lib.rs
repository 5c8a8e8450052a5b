//! Integration tests for the AiGENThix admin panel and website.
//!
//! [`MockApi`] serves a small in-process copy of the content API on
//! `127.0.0.1:0`. Its responses are chosen by the request so each test can
//! reach a specific branch:
//!
//! | request | response |
//! |---|---|
//! | `POST /api/auth/login`, email `editor@aigenthix.com` | token and user |
//! | `POST /api/auth/login`, email `plain@aigenthix.com` | 200, non-JSON body |
//! | `POST /api/auth/login`, email `partial@aigenthix.com` | 200, user without token |
//! | `POST /api/auth/login`, anything else | 401 `{"detail": "Invalid credentials"}` |
//! | `GET /api/admin/blogs/404` | 404 `{"error": "Blog not found"}` |
//! | `GET /api/admin/blogs/409` | 200 `{"success": false, "error": "Slug taken"}` |
//! | `GET /api/admin/blogs/504` | answers after two seconds |
//! | `GET /api/blogs/missing` | 200 `{"success": false, "error": "Blog not found"}` |
//! | `POST /api/admin/upload/image`, `file` part named `reject.png` | 200 `{"success": false, "error": "Unsupported image"}` |
//! | `POST /api/admin/upload/image`, `file` part named `silent.png` | 200 `{"success": false}` |
//! | `POST /api/admin/upload/image`, `file` part named `slow.png` | answers after two seconds |
//! | `POST /api/admin/upload/image`, no `file` part | 400 `{"error": "No file provided"}` |
//! | `POST /api/admin/upload/image`, any other `file` part | URL under `https://cdn.aigenthix.com/uploads/` |
//!
//! Every request's `Authorization` and `Content-Type` headers are recorded and
//! can be read with [`MockApi::authorizations`] and [`MockApi::content_types`].

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Multipart, Path, Request, State},
    http::{
        HeaderMap, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use serde_json::{Value, json};

/// Token issued by the mock login.
pub const MOCK_TOKEN: &str = "mock-token-123";

/// Headers of one request the mock received.
#[derive(Debug, Clone)]
struct SeenRequest {
    authorization: Option<String>,
    content_type: Option<String>,
}

type Seen = Arc<Mutex<Vec<SeenRequest>>>;

/// A running mock content API.
pub struct MockApi {
    addr: SocketAddr,
    seen: Seen,
}

impl MockApi {
    /// Bind on an ephemeral port and serve in the background.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start() -> Self {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let app = router(Arc::clone(&seen));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap_or_else(|e| panic!("bind mock api: {e}"));
        let addr = listener
            .local_addr()
            .unwrap_or_else(|e| panic!("mock api address: {e}"));
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Self { addr, seen }
    }

    /// Base URL to hand to a client.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// `Authorization` headers of every request so far, in order.
    #[must_use]
    pub fn authorizations(&self) -> Vec<Option<String>> {
        self.seen_requests()
            .into_iter()
            .map(|r| r.authorization)
            .collect()
    }

    /// `Content-Type` headers of every request so far, in order.
    #[must_use]
    pub fn content_types(&self) -> Vec<Option<String>> {
        self.seen_requests()
            .into_iter()
            .map(|r| r.content_type)
            .collect()
    }

    fn seen_requests(&self) -> Vec<SeenRequest> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

fn router(seen: Seen) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/admin/blogs", get(list_blogs).post(create_blog))
        .route(
            "/api/admin/blogs/{id}",
            get(get_blog).put(update_blog).delete(delete_blog),
        )
        .route("/api/admin/blogs/{id}/publish", patch(toggle_publish))
        .route("/api/admin/blogs/{id}/featured", patch(toggle_featured))
        .route("/api/admin/blogs/bulk/{action}", post(bulk))
        .route("/api/admin/upload/image", post(upload_image))
        .route("/api/blogs/page-data", get(page_data))
        .route("/api/blogs/{slug}", get(public_blog))
        .layer(middleware::from_fn_with_state(seen, record_headers))
}

fn header(headers: &HeaderMap, name: axum::http::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

async fn record_headers(State(seen): State<Seen>, request: Request, next: Next) -> Response {
    let headers = request.headers();
    let entry = SeenRequest {
        authorization: header(headers, AUTHORIZATION),
        content_type: header(headers, CONTENT_TYPE),
    };
    seen.lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(entry);
    next.run(request).await
}

fn ok(data: Value) -> Json<Value> {
    Json(json!({ "success": true, "data": data }))
}

/// A full post as the API returns it.
#[must_use]
pub fn blog_json(id: i64, slug: &str, category: &str) -> Value {
    json!({
        "id": id,
        "title": format!("Post {id}"),
        "slug": slug,
        "content": "## Intro\n\nHello **world**",
        "excerpt": "A short summary",
        "category": category,
        "tags": ["ai"],
        "featured_image_url": "https://images.unsplash.com/photo-1",
        "author_name": "Asha",
        "published": true,
        "is_featured": id == 1,
        "read_time": 3,
        "created_at": "2024-12-10T10:00:00Z",
        "updated_at": "2024-12-11T10:00:00Z"
    })
}

/// A list row as the API returns it.
#[must_use]
pub fn list_item_json(id: i64, published: bool, category: &str) -> Value {
    json!({
        "id": id,
        "title": format!("Post {id}"),
        "slug": format!("post-{id}"),
        "category": category,
        "author_name": "Asha",
        "published": published,
        "is_featured": id == 1,
        "read_time": 3,
        "created_at": "2024-12-10T10:00:00Z"
    })
}

async fn login(Json(body): Json<Value>) -> Response {
    match body["email"].as_str().unwrap_or_default() {
        "editor@aigenthix.com" => Json(json!({
            "token": MOCK_TOKEN,
            "user": { "id": 7, "email": "editor@aigenthix.com", "name": "Editor" }
        }))
        .into_response(),
        "plain@aigenthix.com" => "<html>gateway</html>".into_response(),
        "partial@aigenthix.com" => Json(json!({
            "user": { "id": 7, "email": "partial@aigenthix.com", "name": "Partial" }
        }))
        .into_response(),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Invalid credentials" })),
        )
            .into_response(),
    }
}

async fn list_blogs() -> Json<Value> {
    ok(json!([
        list_item_json(1, true, "AI"),
        list_item_json(2, false, "AI"),
        list_item_json(3, true, "Data"),
    ]))
}

async fn get_blog(Path(id): Path<i64>) -> Response {
    match id {
        404 => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Blog not found" })),
        )
            .into_response(),
        409 => Json(json!({ "success": false, "error": "Slug taken" })).into_response(),
        504 => {
            tokio::time::sleep(Duration::from_secs(2)).await;
            ok(blog_json(id, "slow", "AI")).into_response()
        }
        _ => ok(blog_json(id, &format!("post-{id}"), "AI")).into_response(),
    }
}

async fn create_blog(Json(body): Json<Value>) -> Json<Value> {
    let slug = body["slug"].as_str().filter(|s| !s.is_empty()).unwrap_or("new-post");
    ok(json!({ "id": 42, "slug": slug }))
}

async fn update_blog(Path(_id): Path<i64>, Json(body): Json<Value>) -> Json<Value> {
    ok(json!({ "slug": body["slug"].as_str().unwrap_or("updated") }))
}

async fn delete_blog(Path(id): Path<i64>) -> Response {
    if id == 404 {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Blog not found" })),
        )
            .into_response();
    }
    ok(Value::Null).into_response()
}

async fn toggle_publish(Path(_id): Path<i64>) -> Json<Value> {
    ok(json!({ "published": true }))
}

async fn toggle_featured(Path(_id): Path<i64>) -> Json<Value> {
    ok(json!({ "is_featured": true }))
}

async fn bulk(Path(_action): Path<String>, Json(body): Json<Value>) -> Json<Value> {
    let affected = body["ids"].as_array().map_or(0, Vec::len);
    ok(json!({ "affected": affected }))
}

async fn upload_image(mut multipart: Multipart) -> Response {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or("upload").to_string();
        return match name.as_str() {
            "reject.png" => {
                Json(json!({ "success": false, "error": "Unsupported image" })).into_response()
            }
            "silent.png" => Json(json!({ "success": false })).into_response(),
            "slow.png" => {
                tokio::time::sleep(Duration::from_secs(2)).await;
                ok(json!({ "url": "https://cdn.aigenthix.com/uploads/slow.png" })).into_response()
            }
            _ => ok(json!({ "url": format!("https://cdn.aigenthix.com/uploads/{name}") }))
                .into_response(),
        };
    }
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "No file provided" })),
    )
        .into_response()
}

async fn page_data() -> Json<Value> {
    ok(json!({
        "featured": list_item_json(1, true, "AI"),
        "latest": [
            list_item_json(1, true, "AI"),
            list_item_json(2, true, "AI"),
            list_item_json(3, true, "Data"),
        ],
        "popular": [list_item_json(3, true, "Data")],
        "categories": [{ "id": 1, "name": "AI" }, { "id": 2, "name": "Data" }]
    }))
}

async fn public_blog(Path(slug): Path<String>) -> Json<Value> {
    if slug == "missing" {
        return Json(json!({ "success": false, "error": "Blog not found" }));
    }
    ok(blog_json(1, &slug, "AI"))
}
