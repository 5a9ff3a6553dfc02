use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{apply_update, NewPost, Post, PostChanges};

/// Post store contract: author-scoped listing, diff-tracked updates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn create(&self, data: NewPost) -> Result<Post>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>>;
    async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Post>>;
    async fn count_by_author(&self, author_id: Uuid) -> Result<i64>;
    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>>;
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

const POST_COLUMNS: &str = "id, author_id, author, image, text, address, posted_at, \
     edit_count, edit_history, created_at, updated_at";

#[derive(Clone)]
pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    /// Insert a new post. `posted_at`, the edit counter and the empty history
    /// are set server-side and are immutable afterwards.
    async fn create(&self, data: NewPost) -> Result<Post> {
        let post = sqlx::query_as::<_, Post>(&format!(
            r#"
            INSERT INTO posts (author_id, author, image, text, address)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {POST_COLUMNS}
            "#,
        ))
        .bind(data.author_id)
        .bind(&data.author)
        .bind(&data.image)
        .bind(&data.text)
        .bind(&data.address)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    /// Posts scoped to a single author, newest first. The listing is never
    /// global; cross-author leakage is ruled out at the query level.
    async fn list_by_author(&self, author_id: Uuid) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE author_id = $1 ORDER BY posted_at DESC",
        ))
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM posts WHERE author_id = $1")
            .bind(author_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get::<i64, _>("count"))
    }

    /// Diff-tracked update. The row lock makes the diff computation, counter
    /// increment, history append and field writes one observable unit, so
    /// concurrent updates to the same post serialize: values are last-write-
    /// wins, but no history entry is ever lost and `edit_count` stays exact.
    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>> {
        let mut tx = self.pool.begin().await?;

        let stored = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1 FOR UPDATE",
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let mut post = match stored {
            Some(post) => post,
            None => return Ok(None),
        };

        apply_update(&mut post, &changes, Utc::now());

        sqlx::query(
            r#"
            UPDATE posts SET
                image = $2,
                text = $3,
                address = $4,
                edit_count = $5,
                edit_history = $6,
                updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(post.id)
        .bind(&post.image)
        .bind(&post.text)
        .bind(&post.address)
        .bind(post.edit_count)
        .bind(&post.edit_history)
        .bind(post.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(post))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
