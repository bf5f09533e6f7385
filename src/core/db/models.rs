//! Database models for the blog
//!
//! This module defines the entity structs that map to PostgreSQL tables, the
//! DTOs used to create and update them, and the response shapes returned by
//! the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ============================================================================
// User Model
// ============================================================================

/// User entity representing a registered account
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User data for creation (password already hashed, email already normalized)
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

// ============================================================================
// Post Model
// ============================================================================

/// Blog post entity
///
/// `author` is the display name captured at creation; `author_id` is the
/// account that owns the post and is what ownership checks compare against.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub author: String,
    pub author_id: Uuid,
    pub title: String,
    pub body: String,
    #[sqlx(rename = "comment_ids")]
    pub comments: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Post data for creation
#[derive(Debug, Clone)]
pub struct CreatePost {
    pub author: String,
    pub author_id: Uuid,
    pub title: String,
    pub body: String,
}

/// Post data for updates; `None` leaves the field unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub body: Option<String>,
}

/// Post with its comments resolved, for read endpoints
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostWithComments {
    pub id: Uuid,
    pub author: String,
    pub author_id: Uuid,
    pub title: String,
    pub body: String,
    pub comments: Vec<CommentSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostWithComments {
    /// Attach comments, ordered as in the post's comment id collection
    pub fn assemble(post: Post, comments: Vec<Comment>) -> Self {
        let ordered = post
            .comments
            .iter()
            .filter_map(|id| comments.iter().find(|c| c.id == *id))
            .cloned()
            .map(CommentSummary::from)
            .collect();

        Self {
            id: post.id,
            author: post.author,
            author_id: post.author_id,
            title: post.title,
            body: post.body,
            comments: ordered,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

// ============================================================================
// Comment Model
// ============================================================================

/// Comment entity; `author` is free text and not tied to an account
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub author: String,
    pub comment: String,
    #[sqlx(rename = "post_id")]
    pub post: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Comment data for creation
#[derive(Debug, Clone)]
pub struct CreateComment {
    pub post: Uuid,
    pub author: String,
    pub comment: String,
}

/// Comment data for updates
#[derive(Debug, Clone, Default)]
pub struct UpdateComment {
    pub author: Option<String>,
    pub comment: Option<String>,
}

/// Comment without the post back-reference (for read endpoints)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentSummary {
    pub id: Uuid,
    pub author: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Comment> for CommentSummary {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            author: comment.author,
            comment: comment.comment,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}
