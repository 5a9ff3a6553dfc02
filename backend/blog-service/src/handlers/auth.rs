/// Registration and authentication endpoints (local password + Google OAuth)
use actix_web::{web, HttpResponse};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::services::users::RegisterData;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(min = 1))]
    pub password: String,

    #[validate(length(min = 1, max = 100))]
    pub nickname: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    pub phone: Option<String>,
    pub birth_year: Option<i32>,
    pub gender: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AuthenticateRequest {
    pub name: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct GoogleCallbackQuery {
    pub code: String,
    #[allow(dead_code)]
    pub state: Option<String>,
}

/// POST /register
pub async fn register(
    state: web::Data<AppState>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let req = req.into_inner();

    let user = state
        .users
        .register(RegisterData {
            name: req.name,
            password: req.password,
            nickname: req.nickname,
            email: req.email,
            phone: req.phone,
            birth_year: req.birth_year,
            gender: req.gender,
        })
        .await?;

    Ok(HttpResponse::Created().json(json!({ "success": true, "user": user })))
}

/// POST /authenticate
pub async fn authenticate(
    state: web::Data<AppState>,
    req: web::Json<AuthenticateRequest>,
) -> Result<HttpResponse> {
    let token = state.users.authenticate(&req.name, &req.password).await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "token": token })))
}

/// GET /auth/google — redirect to the Google consent screen.
pub async fn google_login(state: web::Data<AppState>) -> Result<HttpResponse> {
    let provider = state
        .oauth
        .as_ref()
        .ok_or_else(|| AppError::Internal("Google OAuth is not configured".to_string()))?;

    let csrf_state: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect();

    Ok(HttpResponse::Found()
        .insert_header(("Location", provider.authorization_url(&csrf_state)))
        .finish())
}

/// GET /auth/google/callback — exchange the code and issue a session token.
pub async fn google_callback(
    state: web::Data<AppState>,
    query: web::Query<GoogleCallbackQuery>,
) -> Result<HttpResponse> {
    let provider = state
        .oauth
        .as_ref()
        .ok_or_else(|| AppError::Internal("Google OAuth is not configured".to_string()))?;

    let info = provider.exchange_code(&query.code).await?;
    let token = state.users.authenticate_google(info).await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "token": token })))
}
