//! User workflow scenarios: registration, authentication, profile
//! aggregation, federated provisioning and account deletion.

mod common;

use std::sync::Arc;

use uuid::Uuid;

use blog_service::error::AppError;
use blog_service::middleware::CurrentUser;
use blog_service::security::jwt;
use blog_service::services::oauth::google::GoogleUserInfo;
use blog_service::services::users::{RegisterData, UpdateUserData};
use blog_service::services::{CreatePostData, PostService, UserService};
use common::{InMemoryPostStore, InMemoryUserStore};

fn services() -> (UserService, PostService) {
    jwt::initialize_secret("integration-test-secret").unwrap();
    let users = Arc::new(InMemoryUserStore::default());
    let posts = Arc::new(InMemoryPostStore::default());
    (
        UserService::new(users, posts.clone()),
        PostService::new(posts),
    )
}

fn register(name: &str, password: &str) -> RegisterData {
    RegisterData {
        name: name.to_string(),
        password: password.to_string(),
        nickname: None,
        email: None,
        phone: None,
        birth_year: None,
        gender: None,
    }
}

#[tokio::test]
async fn duplicate_registration_fails_with_already_exists() {
    let (users, _) = services();

    users.register(register("alice", "pw1")).await.unwrap();
    let err = users.register(register("alice", "pw2")).await.unwrap_err();

    match err {
        AppError::Conflict(message) => assert!(message.contains("already exists")),
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[tokio::test]
async fn register_then_authenticate_round_trip() {
    let (users, _) = services();

    let profile = users.register(register("alice", "pw1")).await.unwrap();
    let token = users.authenticate("alice", "pw1").await.unwrap();

    let claims = jwt::validate_token(&token).unwrap().claims;
    assert_eq!(claims.sub, profile.id.to_string());
    assert_eq!(claims.name, "alice");
}

#[tokio::test]
async fn wrong_password_is_credentials_error_when_user_exists() {
    let (users, _) = services();

    users.register(register("alice", "pw1")).await.unwrap();

    let err = users.authenticate("alice", "wrong").await.unwrap_err();
    assert!(matches!(err, AppError::Authentication(_)));

    let err = users.authenticate("nobody", "pw1").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn profile_reports_post_count() {
    let (users, posts) = services();

    let profile = users.register(register("alice", "pw1")).await.unwrap();
    let (fetched, count) = users.profile(profile.id).await.unwrap();
    assert_eq!(fetched.id, profile.id);
    assert_eq!(count, 0);

    let ctx = CurrentUser {
        id: profile.id,
        name: profile.name.clone(),
    };
    for i in 0..3 {
        posts
            .create(
                &ctx,
                CreatePostData {
                    text: Some(format!("post {i}")),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
    }

    let (_, count) = users.profile(profile.id).await.unwrap();
    assert_eq!(count, 3);
}

#[tokio::test]
async fn profile_of_missing_user_is_not_found() {
    let (users, _) = services();

    let err = users.profile(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn google_login_provisions_once_then_reuses_the_account() {
    let (users, _) = services();

    let info = GoogleUserInfo {
        sub: "google-sub-1".to_string(),
        email: Some("bob@example.com".to_string()),
        name: Some("Bob".to_string()),
        picture: None,
    };

    let first = users.authenticate_google(info.clone()).await.unwrap();
    let second = users.authenticate_google(info).await.unwrap();

    let first_id = jwt::validate_token(&first).unwrap().claims.sub;
    let second_id = jwt::validate_token(&second).unwrap().claims.sub;
    assert_eq!(first_id, second_id);

    assert_eq!(users.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn federated_account_cannot_use_password_login() {
    let (users, _) = services();

    users
        .authenticate_google(GoogleUserInfo {
            sub: "google-sub-2".to_string(),
            email: None,
            name: Some("Carol".to_string()),
            picture: None,
        })
        .await
        .unwrap();

    let err = users.authenticate("Carol", "anything").await.unwrap_err();
    assert!(matches!(err, AppError::Authentication(_)));
}

#[tokio::test]
async fn password_update_is_rehashed_and_usable() {
    let (users, _) = services();

    let profile = users.register(register("alice", "old-pw")).await.unwrap();
    let ctx = CurrentUser {
        id: profile.id,
        name: profile.name.clone(),
    };

    users
        .update(
            &ctx,
            UpdateUserData {
                password: Some("new-pw".to_string()),
                nickname: Some("al".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(users.authenticate("alice", "old-pw").await.is_err());
    let token = users.authenticate("alice", "new-pw").await.unwrap();
    assert!(!token.is_empty());
}

#[tokio::test]
async fn listing_users_excludes_password_material() {
    let (users, _) = services();

    users.register(register("alice", "pw1")).await.unwrap();
    users.register(register("bob", "pw2")).await.unwrap();

    let listed = users.list().await.unwrap();
    assert_eq!(listed.len(), 2);

    let json = serde_json::to_value(&listed).unwrap();
    for entry in json.as_array().unwrap() {
        assert!(entry.get("passwordHash").is_none());
        assert!(entry.get("password_hash").is_none());
    }
}

#[tokio::test]
async fn users_can_only_delete_themselves() {
    let (users, _) = services();

    let alice = users.register(register("alice", "pw1")).await.unwrap();
    let bob = users.register(register("bob", "pw2")).await.unwrap();

    let alice_ctx = CurrentUser {
        id: alice.id,
        name: alice.name.clone(),
    };

    let err = users.delete(&alice_ctx, bob.id).await.unwrap_err();
    assert!(matches!(err, AppError::Authorization(_)));

    users.delete(&alice_ctx, alice.id).await.unwrap();
    let err = users.profile(alice.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
