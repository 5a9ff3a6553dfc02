use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{NewUser, User, UserChanges};

/// User directory contract. Lookups report absence as `Ok(None)`, never as an
/// error; callers decide whether absence is fatal.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, data: NewUser) -> Result<User>;
    async fn find_by_name(&self, name: &str) -> Result<Option<User>>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_by_google_id(&self, google_id: &str) -> Result<Option<User>>;
    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>>;
    async fn list(&self) -> Result<Vec<User>>;
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

const USER_COLUMNS: &str = "id, name, nickname, email, phone, birth_year, gender, \
     password_hash, google_id, created_at, updated_at";

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, data: NewUser) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, nickname, email, phone, birth_year, gender, password_hash, google_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(&data.name)
        .bind(&data.nickname)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(data.birth_year)
        .bind(&data.gender)
        .bind(&data.password_hash)
        .bind(&data.google_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(user)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE name = $1",
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_google_id(&self, google_id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE google_id = $1",
        ))
        .bind(google_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Partial merge: fields absent from `changes` keep their stored value.
    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                nickname = COALESCE($3, nickname),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                birth_year = COALESCE($6, birth_year),
                gender = COALESCE($7, gender),
                password_hash = COALESCE($8, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.nickname)
        .bind(&changes.email)
        .bind(&changes.phone)
        .bind(changes.birth_year)
        .bind(&changes.gender)
        .bind(&changes.password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(user)
    }

    async fn list(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at",
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn map_unique_violation(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            let message = match db.constraint() {
                Some("users_name_key") => "Username already exists",
                Some("users_nickname_key") => "Nickname already exists",
                Some("users_email_key") => "Email already exists",
                Some("users_phone_key") => "Phone already exists",
                Some("users_google_id_key") => "Google account already linked",
                _ => "User already exists",
            };
            return AppError::Conflict(message.to_string());
        }
    }
    AppError::Database(err)
}
