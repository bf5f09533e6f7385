//! Comment service
//!
//! Comments are public: anyone may add, read, edit or remove them. Every
//! operation first resolves the parent post, and a comment is only visible
//! through the post it belongs to.

use std::sync::Arc;
use uuid::Uuid;

use crate::core::db::models::{Comment, CommentSummary, CreateComment, Post, UpdateComment};
use crate::core::db::store::{CommentStore, PostStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum CommentError {
    #[error("Blog post with the provided ID does not exist")]
    PostNotFound,

    #[error("Comment with the provided ID does not exist")]
    NotFound,

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Validated input for a new comment
#[derive(Debug, Clone)]
pub struct NewComment {
    pub author: String,
    pub comment: String,
}

#[derive(Clone)]
pub struct CommentService {
    posts: Arc<dyn PostStore>,
    comments: Arc<dyn CommentStore>,
}

impl CommentService {
    pub fn new(posts: Arc<dyn PostStore>, comments: Arc<dyn CommentStore>) -> Self {
        Self { posts, comments }
    }

    /// Create a comment and append it to the post's collection
    pub async fn add(&self, post_id: Uuid, input: NewComment) -> Result<Comment, CommentError> {
        self.post(post_id).await?;

        let comment = self
            .comments
            .create(CreateComment {
                post: post_id,
                author: input.author,
                comment: input.comment,
            })
            .await?;

        self.posts
            .push_comment(post_id, comment.id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => CommentError::PostNotFound,
                other => other.into(),
            })?;

        tracing::info!(post_id = %post_id, comment_id = %comment.id, "Comment added");

        Ok(comment)
    }

    /// Comments of a post in collection order
    pub async fn list(&self, post_id: Uuid) -> Result<Vec<CommentSummary>, CommentError> {
        let post = self.post(post_id).await?;
        let comments = self.comments.list_by_post(post_id).await?;

        Ok(post
            .comments
            .iter()
            .filter_map(|id| comments.iter().find(|c| c.id == *id))
            .cloned()
            .map(CommentSummary::from)
            .collect())
    }

    pub async fn get(&self, post_id: Uuid, comment_id: Uuid) -> Result<CommentSummary, CommentError> {
        self.post(post_id).await?;
        let comment = self.comment(post_id, comment_id).await?;

        Ok(comment.into())
    }

    /// Overwrite the provided fields of a comment
    pub async fn update(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        changes: UpdateComment,
    ) -> Result<Comment, CommentError> {
        self.post(post_id).await?;
        self.comment(post_id, comment_id).await?;

        self.comments
            .update(comment_id, changes)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => CommentError::NotFound,
                other => other.into(),
            })
    }

    /// Remove exactly this comment from the post and delete it
    pub async fn delete(&self, post_id: Uuid, comment_id: Uuid) -> Result<(), CommentError> {
        self.post(post_id).await?;
        self.comment(post_id, comment_id).await?;

        self.posts.remove_comment(post_id, comment_id).await?;
        self.comments.delete(comment_id).await?;

        tracing::info!(post_id = %post_id, comment_id = %comment_id, "Comment deleted");

        Ok(())
    }

    async fn post(&self, post_id: Uuid) -> Result<Post, CommentError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or(CommentError::PostNotFound)
    }

    /// Load a comment, treating one attached to another post as absent
    async fn comment(&self, post_id: Uuid, comment_id: Uuid) -> Result<Comment, CommentError> {
        self.comments
            .find_by_id(comment_id)
            .await?
            .filter(|c| c.post == post_id)
            .ok_or(CommentError::NotFound)
    }
}
