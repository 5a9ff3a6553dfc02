/// User profile endpoints
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::services::users::UpdateUserData;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(length(min = 1))]
    pub password: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub nickname: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    pub phone: Option<String>,
    pub birth_year: Option<i32>,
    pub gender: Option<String>,
}

/// PUT /user — update the authenticated user's own record.
pub async fn update_current_user(
    state: web::Data<AppState>,
    user: CurrentUser,
    req: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let req = req.into_inner();

    let updated = state
        .users
        .update(
            &user,
            UpdateUserData {
                name: req.name,
                password: req.password,
                nickname: req.nickname,
                email: req.email,
                phone: req.phone,
                birth_year: req.birth_year,
                gender: req.gender,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "user": updated })))
}

/// GET /users/me — the authenticated user's profile plus post count.
pub async fn current_user_profile(
    state: web::Data<AppState>,
    user: CurrentUser,
) -> Result<HttpResponse> {
    let (profile, post_count) = state.users.profile(user.id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "user": profile,
        "postCount": post_count,
    })))
}

/// GET /users — all users, password digests excluded.
pub async fn list_users(state: web::Data<AppState>, _user: CurrentUser) -> Result<HttpResponse> {
    let users = state.users.list().await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "users": users })))
}

/// GET /users/{id} — profile plus post count.
pub async fn get_user_profile(
    state: web::Data<AppState>,
    _user: CurrentUser,
    id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let (profile, post_count) = state.users.profile(*id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "user": profile,
        "postCount": post_count,
    })))
}

/// DELETE /users/{id} — self only.
pub async fn delete_user(
    state: web::Data<AppState>,
    user: CurrentUser,
    id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    state.users.delete(&user, *id).await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "User deleted" })))
}
