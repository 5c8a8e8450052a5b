//! Blog editor pages: create and edit.

use aigenthix_core::{Blog, BlogFormData, BlogId};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::instrument;

use super::MutationResponse;
use crate::middleware::RequireToken;
use crate::panel::{BlogDetailState, BlogMutations};
use crate::state::AppState;

/// Editor view: the form plus, when editing, the stored post.
#[derive(Debug, Serialize)]
pub struct EditorView {
    pub form: Option<BlogFormData>,
    pub blog: Option<Blog>,
    pub loading: bool,
    pub error: Option<String>,
}

/// GET /blogs/new
pub async fn new_form() -> Json<EditorView> {
    Json(EditorView {
        form: Some(BlogFormData::default()),
        blog: None,
        loading: false,
        error: None,
    })
}

/// POST /blogs/new
#[instrument(skip(state, token, data), fields(title = %data.title))]
pub async fn create(
    RequireToken(token): RequireToken,
    State(state): State<AppState>,
    Json(data): Json<BlogFormData>,
) -> Response {
    if let Err(e) = data.validate() {
        return MutationResponse::failed(StatusCode::BAD_REQUEST, e.to_string());
    }
    let mut mutations = BlogMutations::new();
    let ok = mutations.create(&state.blogs(&token), &data).await;
    let created = mutations.last_created();
    let mut response = MutationResponse::from_mutations(ok, &mutations);
    response.id = created;
    response.into_response()
}

/// GET /blogs/edit/{id}
#[instrument(skip(state, token))]
pub async fn edit_form(
    RequireToken(token): RequireToken,
    State(state): State<AppState>,
    Path(id): Path<BlogId>,
) -> Json<EditorView> {
    let detail = BlogDetailState::load(&state.blogs(&token), id).await;
    Json(EditorView {
        form: detail.blog.as_ref().map(Blog::to_form),
        blog: detail.blog,
        loading: detail.loading,
        error: detail.error,
    })
}

/// POST /blogs/edit/{id}
#[instrument(skip(state, token, data))]
pub async fn update(
    RequireToken(token): RequireToken,
    State(state): State<AppState>,
    Path(id): Path<BlogId>,
    Json(data): Json<BlogFormData>,
) -> Response {
    if let Err(e) = data.validate() {
        return MutationResponse::failed(StatusCode::BAD_REQUEST, e.to_string());
    }
    let mut mutations = BlogMutations::new();
    let ok = mutations.update(&state.blogs(&token), id, &data).await;
    MutationResponse::from_mutations(ok, &mutations).into_response()
}
