use std::sync::Arc;

use uuid::Uuid;

use crate::db::PostStore;
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::{EditEntry, NewPost, Post, PostChanges};

/// Post creation input. Author identity comes from the authenticated context.
#[derive(Debug, Clone, Default)]
pub struct CreatePostData {
    pub image: Option<String>,
    pub text: Option<String>,
    pub address: Option<String>,
}

/// Post lifecycle workflows. Mutation is gated on authorship; reads by id are
/// open to any authenticated user.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostStore>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostStore>) -> Self {
        Self { posts }
    }

    pub async fn create(&self, ctx: &CurrentUser, data: CreatePostData) -> Result<Post> {
        let has_image = data.image.as_deref().is_some_and(|v| !v.trim().is_empty());
        let has_text = data.text.as_deref().is_some_and(|v| !v.trim().is_empty());
        if !has_image && !has_text {
            return Err(AppError::Validation(
                "Post requires at least one of image or text".to_string(),
            ));
        }

        self.posts
            .create(NewPost {
                author_id: ctx.id,
                author: ctx.name.clone(),
                image: data.image,
                text: data.text,
                address: data.address,
            })
            .await
    }

    pub async fn get(&self, id: Uuid) -> Result<Post> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))
    }

    /// The listing is scoped to the requesting author; there is no global
    /// post listing endpoint.
    pub async fn list_own(&self, ctx: &CurrentUser) -> Result<Vec<Post>> {
        self.posts.list_by_author(ctx.id).await
    }

    pub async fn update(&self, ctx: &CurrentUser, id: Uuid, changes: PostChanges) -> Result<Post> {
        self.authorize_author(ctx, id).await?;

        self.posts
            .update(id, changes)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))
    }

    pub async fn delete(&self, ctx: &CurrentUser, id: Uuid) -> Result<()> {
        self.authorize_author(ctx, id).await?;

        if !self.posts.delete(id).await? {
            return Err(AppError::NotFound("Post not found".to_string()));
        }

        Ok(())
    }

    /// Edit counter, optionally with the full diff sequence.
    pub async fn edit_history(
        &self,
        id: Uuid,
        detailed: bool,
    ) -> Result<(i32, Option<Vec<EditEntry>>)> {
        let post = self.get(id).await?;
        let history = detailed.then(|| post.edit_history.0.clone());
        Ok((post.edit_count, history))
    }

    async fn authorize_author(&self, ctx: &CurrentUser, id: Uuid) -> Result<()> {
        let post = self.get(id).await?;
        if post.author_id != ctx.id {
            return Err(AppError::Authorization(
                "Only the author may modify this post".to_string(),
            ));
        }
        Ok(())
    }
}
