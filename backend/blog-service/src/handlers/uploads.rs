/// Serves stored upload bytes back to clients. Post records reference images
/// by `/uploads/<name>` relative paths; this endpoint resolves them.
use actix_web::{web, HttpResponse};

use crate::error::Result;
use crate::services::UploadStore;
use crate::AppState;

/// GET /uploads/{filename}
pub async fn serve_upload(
    state: web::Data<AppState>,
    filename: web::Path<String>,
) -> Result<HttpResponse> {
    let bytes = state.uploads.open(&filename).await?;

    Ok(HttpResponse::Ok()
        .content_type(UploadStore::content_type(&filename))
        .body(bytes))
}
