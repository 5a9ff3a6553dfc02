use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered account. Authentication resolves through the password hash,
/// the Google subject id, or both; at least one is always present.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_year: Option<i32>,
    pub gender: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub google_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Password-free projection returned by every user-facing endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_year: Option<i32>,
    pub gender: Option<String>,
    pub google_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        UserProfile {
            id: user.id,
            name: user.name,
            nickname: user.nickname,
            email: user.email,
            phone: user.phone,
            birth_year: user.birth_year,
            gender: user.gender,
            google_id: user.google_id,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Fields accepted when inserting a user. `password_hash` is already hashed
/// by the caller; raw passwords never reach the store.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub name: String,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_year: Option<i32>,
    pub gender: Option<String>,
    pub password_hash: Option<String>,
    pub google_id: Option<String>,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_year: Option<i32>,
    pub gender: Option<String>,
    pub password_hash: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "alice".to_string(),
            nickname: Some("al".to_string()),
            email: Some("alice@example.com".to_string()),
            phone: None,
            birth_year: Some(1990),
            gender: Some("female".to_string()),
            password_hash: Some("$argon2id$...".to_string()),
            google_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn user_serialization_never_includes_password_hash() {
        let json = serde_json::to_value(sample_user()).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["name"], "alice");
    }

    #[test]
    fn profile_projection_carries_no_password_field() {
        let profile = UserProfile::from(sample_user());
        let json = serde_json::to_value(profile).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["nickname"], "al");
    }
}
