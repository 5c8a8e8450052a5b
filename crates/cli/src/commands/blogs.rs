//! Blog commands.

use std::io::Read as _;
use std::path::Path;

use aigenthix_admin::api::{BulkAction, UploadFile};
use aigenthix_core::{BlogFormData, BlogId};
use serde_json::json;

use super::{CliError, Context, emit};

pub async fn list(ctx: &Context) -> Result<(), CliError> {
    emit(&ctx.blogs()?.get_all().await?)
}

pub async fn get(ctx: &Context, id: BlogId) -> Result<(), CliError> {
    emit(&ctx.blogs()?.get_by_id(id).await?)
}

pub async fn create(ctx: &Context, file: &Path) -> Result<(), CliError> {
    let data = read_form(file)?;
    emit(&ctx.blogs()?.create(&data).await?)
}

pub async fn update(ctx: &Context, id: BlogId, file: &Path) -> Result<(), CliError> {
    let data = read_form(file)?;
    emit(&ctx.blogs()?.update(id, &data).await?)
}

pub async fn delete(ctx: &Context, id: BlogId) -> Result<(), CliError> {
    ctx.blogs()?.delete(id).await?;
    emit(&json!({ "ok": true, "id": id }))
}

pub async fn toggle_publish(ctx: &Context, id: BlogId) -> Result<(), CliError> {
    emit(&ctx.blogs()?.toggle_publish(id).await?)
}

pub async fn toggle_featured(ctx: &Context, id: BlogId) -> Result<(), CliError> {
    emit(&ctx.blogs()?.toggle_featured(id).await?)
}

pub async fn bulk(ctx: &Context, action: BulkAction, ids: &[BlogId]) -> Result<(), CliError> {
    let affected = ctx.blogs()?.bulk(action, ids).await?;
    tracing::info!(action = action.as_str(), affected = affected.affected, "Bulk action done");
    emit(&affected)
}

pub async fn upload(ctx: &Context, path: &Path) -> Result<(), CliError> {
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned());
    let file = UploadFile::new(file_name, mime_for(path), bytes);
    emit(&ctx.blogs()?.upload_image(file).await?)
}

/// Read and validate a form from `path`, or stdin for `-`.
fn read_form(path: &Path) -> Result<BlogFormData, CliError> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };
    let data: BlogFormData = serde_json::from_str(&raw)?;
    data.validate()?;
    Ok(data)
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("avif") => "image/avif",
        _ => "application/octet-stream",
    }
}
