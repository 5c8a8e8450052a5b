//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Health check
//! GET  /                            - Redirect to dashboard or login
//!
//! # Auth
//! GET  /login                       - Login view
//! POST /login                       - Log in, set auth_token cookie
//! POST /logout                      - Clear cookie
//!
//! # Pages
//! GET  /dashboard                   - Blog list, stats, filter and search
//! GET  /blogs                       - Redirect to dashboard
//! GET  /blogs/new                   - Empty editor
//! POST /blogs/new                   - Create
//! GET  /blogs/edit/{id}             - Editor for one post
//! POST /blogs/edit/{id}             - Update
//!
//! # Actions (JSON)
//! POST /api/blogs/{id}/delete       - Delete
//! POST /api/blogs/{id}/publish      - Toggle published
//! POST /api/blogs/{id}/featured     - Toggle featured
//! POST /api/blogs/bulk/{action}     - publish, unpublish or delete many
//! POST /api/upload/image            - Upload an image
//! ```

pub mod actions;
pub mod auth;
pub mod blogs;
pub mod dashboard;

use aigenthix_core::BlogId;
use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Serialize;

use crate::panel::BlogMutations;
use crate::state::AppState;

/// Body of every mutation endpoint.
#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<BlogId>,
}

impl MutationResponse {
    #[must_use]
    pub fn from_mutations(ok: bool, mutations: &BlogMutations) -> Self {
        Self {
            ok,
            error: mutations.error.clone(),
            id: None,
        }
    }

    /// A failure answered before any call was made.
    pub fn failed(status: StatusCode, error: impl Into<String>) -> Response {
        let body = Self {
            ok: false,
            error: Some(error.into()),
            id: None,
        };
        (status, Json(body)).into_response()
    }
}

impl IntoResponse for MutationResponse {
    fn into_response(self) -> Response {
        let status = if self.ok {
            StatusCode::OK
        } else {
            StatusCode::UNPROCESSABLE_ENTITY
        };
        (status, Json(self)).into_response()
    }
}

/// Build the page and action routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .route("/dashboard", get(dashboard::index))
        .route("/blogs", get(|| async { Redirect::to("/dashboard") }))
        .route("/blogs/new", get(blogs::new_form).post(blogs::create))
        .route("/blogs/edit/{id}", get(blogs::edit_form).post(blogs::update))
        .route("/api/blogs/{id}/delete", post(actions::delete))
        .route("/api/blogs/{id}/publish", post(actions::toggle_publish))
        .route("/api/blogs/{id}/featured", post(actions::toggle_featured))
        .route("/api/blogs/bulk/{action}", post(actions::bulk))
        .route("/api/upload/image", post(actions::upload_image))
}
