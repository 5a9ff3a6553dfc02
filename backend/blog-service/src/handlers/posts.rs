/// Post endpoints: multipart creation, author-scoped listing, diff-tracked
/// updates and edit history.
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::StreamExt;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::PostChanges;
use crate::services::CreatePostData;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub detail: bool,
}

/// POST /posts — multipart/form-data with optional `image` file part and
/// optional `text` / `address` text parts.
pub async fn create_post(
    state: web::Data<AppState>,
    user: CurrentUser,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    let mut data = CreatePostData::default();

    while let Some(field) = payload.next().await {
        let mut field =
            field.map_err(|e| AppError::Validation(format!("Multipart error: {}", e)))?;

        let field_name = field.name().to_string();
        match field_name.as_str() {
            "image" => {
                let filename = field
                    .content_disposition()
                    .get_filename()
                    .unwrap_or("upload.bin")
                    .to_string();

                let mut bytes = Vec::new();
                while let Some(chunk) = field.next().await {
                    let chunk = chunk
                        .map_err(|e| AppError::Validation(format!("Image read error: {}", e)))?;
                    bytes.extend_from_slice(&chunk);
                }

                if !bytes.is_empty() {
                    data.image = Some(state.uploads.save(&filename, &bytes).await?);
                }
            }
            "text" => {
                data.text = Some(read_text_field(&mut field).await?);
            }
            "address" => {
                data.address = Some(read_text_field(&mut field).await?);
            }
            _ => {
                // Drain and ignore unknown fields
                while let Some(chunk) = field.next().await {
                    chunk.map_err(|e| AppError::Validation(format!("Multipart error: {}", e)))?;
                }
            }
        }
    }

    let post = state.posts.create(&user, data).await?;

    Ok(HttpResponse::Created().json(json!({ "success": true, "post": post })))
}

/// GET /posts — the authenticated user's own posts only.
pub async fn list_posts(state: web::Data<AppState>, user: CurrentUser) -> Result<HttpResponse> {
    let posts = state.posts.list_own(&user).await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "posts": posts })))
}

/// GET /posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    _user: CurrentUser,
    id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post = state.posts.get(*id).await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "post": post })))
}

/// PUT /posts/{id} — tracked-field changes, author only.
pub async fn update_post(
    state: web::Data<AppState>,
    user: CurrentUser,
    id: web::Path<Uuid>,
    changes: web::Json<PostChanges>,
) -> Result<HttpResponse> {
    let post = state.posts.update(&user, *id, changes.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "post": post })))
}

/// DELETE /posts/{id} — author only.
pub async fn delete_post(
    state: web::Data<AppState>,
    user: CurrentUser,
    id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    state.posts.delete(&user, *id).await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "Post deleted" })))
}

/// GET /posts/{id}/history?detail=true|false
pub async fn get_edit_history(
    state: web::Data<AppState>,
    _user: CurrentUser,
    id: web::Path<Uuid>,
    query: web::Query<HistoryQuery>,
) -> Result<HttpResponse> {
    let (edit_count, history) = state.posts.edit_history(*id, query.detail).await?;

    let mut body = json!({ "success": true, "editCount": edit_count });
    if let Some(history) = history {
        body["history"] = json!(history);
    }

    Ok(HttpResponse::Ok().json(body))
}

async fn read_text_field(field: &mut actix_multipart::Field) -> Result<String> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| AppError::Validation(format!("Field read error: {}", e)))?;
        bytes.extend_from_slice(&chunk);
    }
    String::from_utf8(bytes).map_err(|_| AppError::Validation("Field is not valid UTF-8".into()))
}
