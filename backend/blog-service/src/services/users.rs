use std::sync::Arc;

use uuid::Uuid;

use crate::db::{PostStore, UserStore};
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::{NewUser, UserChanges, UserProfile};
use crate::security::{jwt, password};
use crate::services::oauth::google::GoogleUserInfo;

/// Registration input. The password arrives in plaintext and is hashed here;
/// it never reaches the user store.
#[derive(Debug, Clone)]
pub struct RegisterData {
    pub name: String,
    pub password: String,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_year: Option<i32>,
    pub gender: Option<String>,
}

/// Partial profile update; a supplied password is re-hashed before storage.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserData {
    pub name: Option<String>,
    pub password: Option<String>,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_year: Option<i32>,
    pub gender: Option<String>,
}

/// User-facing workflows: registration, authentication, profile aggregation.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    posts: Arc<dyn PostStore>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>, posts: Arc<dyn PostStore>) -> Self {
        Self { users, posts }
    }

    pub async fn register(&self, data: RegisterData) -> Result<UserProfile> {
        if data.name.trim().is_empty() || data.password.is_empty() {
            return Err(AppError::Validation(
                "Name and password are required".to_string(),
            ));
        }

        if self.users.find_by_name(&data.name).await?.is_some() {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }

        let password_hash = password::hash_password(&data.password)?;
        let user = self
            .users
            .create(NewUser {
                name: data.name,
                nickname: data.nickname,
                email: data.email,
                phone: data.phone,
                birth_year: data.birth_year,
                gender: data.gender,
                password_hash: Some(password_hash),
                google_id: None,
            })
            .await?;

        Ok(user.into())
    }

    /// Password login. An unknown name and a bad password are distinct
    /// failures; accounts provisioned through federated login carry no hash
    /// and are rejected the same way as a wrong password.
    pub async fn authenticate(&self, name: &str, plaintext: &str) -> Result<String> {
        let user = self
            .users
            .find_by_name(name)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let hash = user
            .password_hash
            .as_deref()
            .ok_or_else(|| AppError::Authentication("Invalid credentials".to_string()))?;

        password::verify_password(plaintext, hash)?;

        jwt::generate_token(user.id, &user.name).map_err(|e| AppError::Internal(e.to_string()))
    }

    /// Federated login: resolve the Google subject to a local user,
    /// provisioning a password-less account on first sight, then issue the
    /// same session token as a password login.
    pub async fn authenticate_google(&self, info: GoogleUserInfo) -> Result<String> {
        let user = match self.users.find_by_google_id(&info.sub).await? {
            Some(user) => user,
            None => {
                let name = info
                    .name
                    .clone()
                    .or_else(|| info.email.clone())
                    .unwrap_or_else(|| format!("google-{}", info.sub));
                self.users
                    .create(NewUser {
                        name,
                        email: info.email.clone(),
                        google_id: Some(info.sub.clone()),
                        password_hash: None,
                        ..Default::default()
                    })
                    .await?
            }
        };

        jwt::generate_token(user.id, &user.name).map_err(|e| AppError::Internal(e.to_string()))
    }

    pub async fn update(&self, ctx: &CurrentUser, data: UpdateUserData) -> Result<UserProfile> {
        let password_hash = match data.password.as_deref() {
            Some(plaintext) if !plaintext.is_empty() => Some(password::hash_password(plaintext)?),
            _ => None,
        };

        let changes = UserChanges {
            name: data.name,
            nickname: data.nickname,
            email: data.email,
            phone: data.phone,
            birth_year: data.birth_year,
            gender: data.gender,
            password_hash,
        };

        let user = self
            .users
            .update(ctx.id, changes)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(user.into())
    }

    /// Profile projection plus the author's post count.
    pub async fn profile(&self, id: Uuid) -> Result<(UserProfile, i64)> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let post_count = self.posts.count_by_author(id).await?;

        Ok((user.into(), post_count))
    }

    pub async fn list(&self) -> Result<Vec<UserProfile>> {
        let users = self.users.list().await?;
        Ok(users.into_iter().map(UserProfile::from).collect())
    }

    /// Deletion is self-only: an authenticated user may not remove anyone
    /// else's account.
    pub async fn delete(&self, ctx: &CurrentUser, id: Uuid) -> Result<()> {
        if ctx.id != id {
            return Err(AppError::Authorization(
                "Users may only delete their own account".to_string(),
            ));
        }

        if !self.users.delete(id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        Ok(())
    }
}
