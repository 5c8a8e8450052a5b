//! JSON action endpoints behind the dashboard buttons.

use aigenthix_core::{BlogId, BulkIds};
use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::instrument;

use super::MutationResponse;
use crate::api::{BulkAction, UploadFile};
use crate::error::AppError;
use crate::middleware::RequireToken;
use crate::panel::BlogMutations;
use crate::state::AppState;

/// POST /api/blogs/{id}/delete
#[instrument(skip(state, token))]
pub async fn delete(
    RequireToken(token): RequireToken,
    State(state): State<AppState>,
    Path(id): Path<BlogId>,
) -> MutationResponse {
    let mut mutations = BlogMutations::new();
    let ok = mutations.delete(&state.blogs(&token), id).await;
    MutationResponse::from_mutations(ok, &mutations)
}

/// POST /api/blogs/{id}/publish
#[instrument(skip(state, token))]
pub async fn toggle_publish(
    RequireToken(token): RequireToken,
    State(state): State<AppState>,
    Path(id): Path<BlogId>,
) -> MutationResponse {
    let mut mutations = BlogMutations::new();
    let ok = mutations.toggle_publish(&state.blogs(&token), id).await;
    MutationResponse::from_mutations(ok, &mutations)
}

/// POST /api/blogs/{id}/featured
#[instrument(skip(state, token))]
pub async fn toggle_featured(
    RequireToken(token): RequireToken,
    State(state): State<AppState>,
    Path(id): Path<BlogId>,
) -> MutationResponse {
    let mut mutations = BlogMutations::new();
    let ok = mutations.toggle_featured(&state.blogs(&token), id).await;
    MutationResponse::from_mutations(ok, &mutations)
}

/// POST /api/blogs/bulk/{action}
#[instrument(skip(state, token, body), fields(count = body.ids.len()))]
pub async fn bulk(
    RequireToken(token): RequireToken,
    State(state): State<AppState>,
    Path(action): Path<String>,
    Json(body): Json<BulkIds>,
) -> Response {
    let action = match action.parse::<BulkAction>() {
        Ok(action) => action,
        Err(e) => return MutationResponse::failed(StatusCode::BAD_REQUEST, e),
    };
    if body.ids.is_empty() {
        return MutationResponse::failed(StatusCode::BAD_REQUEST, "No blogs selected");
    }
    let mut mutations = BlogMutations::new();
    let ok = mutations.bulk(&state.blogs(&token), action, &body.ids).await;
    MutationResponse::from_mutations(ok, &mutations).into_response()
}

/// Proxy an image upload to the content API.
///
/// POST /api/upload/image
#[instrument(skip(state, token, multipart))]
pub async fn upload_image(
    RequireToken(token): RequireToken,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let mime = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let uploaded = state
            .blogs(&token)
            .upload_image(UploadFile::new(file_name, mime, bytes.to_vec()))
            .await?;
        return Ok(Json(json!({ "ok": true, "url": uploaded.url })));
    }
    Err(AppError::BadRequest("missing file field".to_string()))
}
