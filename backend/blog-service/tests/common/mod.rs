//! In-memory store doubles used by the service-level scenario tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use uuid::Uuid;

use blog_service::db::{PostStore, UserStore};
use blog_service::error::{AppError, Result};
use blog_service::models::{apply_update, NewPost, NewUser, Post, PostChanges, User, UserChanges};

#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<HashMap<Uuid, User>>,
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, data: NewUser) -> Result<User> {
        let mut users = self.users.lock().unwrap();

        if users.values().any(|u| u.name == data.name) {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }
        if let Some(email) = &data.email {
            if users.values().any(|u| u.email.as_ref() == Some(email)) {
                return Err(AppError::Conflict("Email already exists".to_string()));
            }
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: data.name,
            nickname: data.nickname,
            email: data.email,
            phone: data.phone,
            birth_year: data.birth_year,
            gender: data.gender,
            password_hash: data.password_hash,
            google_id: data.google_id,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.values().find(|u| u.name == name).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.get(&id).cloned())
    }

    async fn find_by_google_id(&self, google_id: &str) -> Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users
            .values()
            .find(|u| u.google_id.as_deref() == Some(google_id))
            .cloned())
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(nickname) = changes.nickname {
            user.nickname = Some(nickname);
        }
        if let Some(email) = changes.email {
            user.email = Some(email);
        }
        if let Some(phone) = changes.phone {
            user.phone = Some(phone);
        }
        if let Some(birth_year) = changes.birth_year {
            user.birth_year = Some(birth_year);
        }
        if let Some(gender) = changes.gender {
            user.gender = Some(gender);
        }
        if let Some(password_hash) = changes.password_hash {
            user.password_hash = Some(password_hash);
        }
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    async fn list(&self) -> Result<Vec<User>> {
        let users = self.users.lock().unwrap();
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by_key(|u| u.created_at);
        Ok(all)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut users = self.users.lock().unwrap();
        Ok(users.remove(&id).is_some())
    }
}

#[derive(Default)]
pub struct InMemoryPostStore {
    posts: Mutex<HashMap<Uuid, Post>>,
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn create(&self, data: NewPost) -> Result<Post> {
        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4(),
            author_id: data.author_id,
            author: data.author,
            image: data.image,
            text: data.text,
            address: data.address,
            posted_at: now,
            edit_count: 0,
            edit_history: Json(Vec::new()),
            created_at: now,
            updated_at: now,
        };
        self.posts.lock().unwrap().insert(post.id, post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>> {
        Ok(self.posts.lock().unwrap().get(&id).cloned())
    }

    async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Post>> {
        let posts = self.posts.lock().unwrap();
        let mut own: Vec<Post> = posts
            .values()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect();
        own.sort_by(|a, b| b.posted_at.cmp(&a.posted_at));
        Ok(own)
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<i64> {
        let posts = self.posts.lock().unwrap();
        Ok(posts.values().filter(|p| p.author_id == author_id).count() as i64)
    }

    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>> {
        let mut posts = self.posts.lock().unwrap();
        let Some(post) = posts.get_mut(&id) else {
            return Ok(None);
        };
        apply_update(post, &changes, Utc::now());
        Ok(Some(post.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.posts.lock().unwrap().remove(&id).is_some())
    }
}
