//! Storage ports
//!
//! Services depend on these traits rather than on a concrete backend. The
//! PostgreSQL repositories implement them for production and the in-memory
//! store implements them for tests.

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::db::models::{
    Comment, CreateComment, CreatePost, CreateUser, Post, UpdateComment, UpdatePost, User,
};

/// Errors shared by every store implementation
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Record not found")]
    NotFound,

    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Translate a sqlx error, promoting unique violations to `Conflict`
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err
            && db_err.is_unique_violation()
        {
            return StoreError::Conflict(db_err.message().to_string());
        }
        StoreError::Database(err)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user; `Conflict` when the email is already taken
    async fn create(&self, user: CreateUser) -> StoreResult<User>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Exact match on the stored (normalized) email
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Replace the password hash; `NotFound` when the user is gone
    async fn update_password(&self, id: Uuid, password_hash: &str) -> StoreResult<()>;
}

#[async_trait]
pub trait PostStore: Send + Sync {
    async fn create(&self, post: CreatePost) -> StoreResult<Post>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Post>>;

    /// Newest first
    async fn list(&self, limit: i64, offset: i64) -> StoreResult<Vec<Post>>;

    async fn count(&self) -> StoreResult<i64>;

    /// Apply non-`None` fields and refresh `updated_at`
    async fn update(&self, id: Uuid, updates: UpdatePost) -> StoreResult<Post>;

    /// Returns whether a row was removed
    async fn delete(&self, id: Uuid) -> StoreResult<bool>;

    /// Append a comment id to the post's collection
    async fn push_comment(&self, id: Uuid, comment_id: Uuid) -> StoreResult<()>;

    /// Remove a comment id from the post's collection
    async fn remove_comment(&self, id: Uuid, comment_id: Uuid) -> StoreResult<()>;
}

#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn create(&self, comment: CreateComment) -> StoreResult<Comment>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Comment>>;

    /// All comments belonging to a post, in creation order
    async fn list_by_post(&self, post_id: Uuid) -> StoreResult<Vec<Comment>>;

    /// All comments belonging to any of the given posts
    async fn list_by_posts(&self, post_ids: &[Uuid]) -> StoreResult<Vec<Comment>>;

    async fn update(&self, id: Uuid, updates: UpdateComment) -> StoreResult<Comment>;

    async fn delete(&self, id: Uuid) -> StoreResult<bool>;

    /// Remove every comment of a post; returns the number removed
    async fn delete_by_post(&self, post_id: Uuid) -> StoreResult<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        assert_eq!(format!("{}", StoreError::NotFound), "Record not found");
        assert!(
            format!("{}", StoreError::Conflict("users_email_key".into()))
                .contains("users_email_key")
        );
    }

    #[test]
    fn test_from_sqlx_keeps_non_unique_errors() {
        let err = StoreError::from_sqlx(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Database(sqlx::Error::RowNotFound)));
    }
}
