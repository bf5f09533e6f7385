//! Blog post service
//!
//! Creation requires an authenticated user that still exists. Updates and
//! deletes are restricted to the post's author. Deleting a post removes its
//! comments first, then the post; the two steps are not transactional.

use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::auth::guard::{CurrentUser, NotAuthor, PostAction, ensure_author};
use crate::core::db::models::{CreatePost, Post, PostWithComments, UpdatePost};
use crate::core::db::store::{CommentStore, PostStore, StoreError, UserStore};

/// Page size used when the client does not ask for one
pub const DEFAULT_PAGE_LIMIT: i64 = 50;

/// Largest page a client may request
pub const MAX_PAGE_LIMIT: i64 = 100;

#[derive(Debug, thiserror::Error)]
pub enum PostError {
    #[error("Blog post does not exist")]
    NotFound,

    #[error("Authentication details required")]
    Unauthenticated,

    #[error(transparent)]
    NotAuthor(#[from] NotAuthor),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Validated input for a new post
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub body: String,
}

/// Page and limit after defaults and clamping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl Pagination {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Number of pages needed for `total` posts
    pub fn total_pages(&self, total: i64) -> i64 {
        (total + self.limit - 1) / self.limit
    }
}

/// One page of posts with their comments
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPage {
    pub total_pages: i64,
    pub current_page: i64,
    pub posts: Vec<PostWithComments>,
}

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostStore>,
    comments: Arc<dyn CommentStore>,
    users: Arc<dyn UserStore>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostStore>,
        comments: Arc<dyn CommentStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            posts,
            comments,
            users,
        }
    }

    /// Store a post authored by `user`
    pub async fn create(&self, user: &CurrentUser, input: NewPost) -> Result<Post, PostError> {
        // The token may outlive the account
        let author = self
            .users
            .find_by_id(user.id)
            .await?
            .ok_or(PostError::Unauthenticated)?;

        let post = self
            .posts
            .create(CreatePost {
                author: author.name,
                author_id: author.id,
                title: input.title,
                body: input.body,
            })
            .await?;

        tracing::info!(post_id = %post.id, author_id = %post.author_id, "Blog post created");

        Ok(post)
    }

    /// Newest posts first, each with its comments
    pub async fn list(&self, pagination: Pagination) -> Result<PostPage, PostError> {
        let posts = self
            .posts
            .list(pagination.limit, pagination.offset())
            .await?;
        let total = self.posts.count().await?;

        let ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
        let comments = self.comments.list_by_posts(&ids).await?;

        let posts = posts
            .into_iter()
            .map(|post| {
                let own = comments
                    .iter()
                    .filter(|c| c.post == post.id)
                    .cloned()
                    .collect();
                PostWithComments::assemble(post, own)
            })
            .collect();

        Ok(PostPage {
            total_pages: pagination.total_pages(total),
            current_page: pagination.page,
            posts,
        })
    }

    pub async fn get(&self, id: Uuid) -> Result<PostWithComments, PostError> {
        let post = self.find(id).await?;
        let comments = self.comments.list_by_post(id).await?;

        Ok(PostWithComments::assemble(post, comments))
    }

    /// Overwrite the provided fields of a post owned by `user`
    pub async fn update(
        &self,
        user: &CurrentUser,
        id: Uuid,
        changes: UpdatePost,
    ) -> Result<Post, PostError> {
        let post = self.find(id).await?;
        ensure_author(user, &post, PostAction::Update)?;

        let post = self.posts.update(id, changes).await.map_err(not_found)?;

        tracing::info!(post_id = %post.id, "Blog post updated");

        Ok(post)
    }

    /// Delete a post owned by `user` together with its comments
    pub async fn delete(&self, user: &CurrentUser, id: Uuid) -> Result<(), PostError> {
        let post = self.find(id).await?;
        ensure_author(user, &post, PostAction::Delete)?;

        let removed = self.comments.delete_by_post(id).await?;
        if !self.posts.delete(id).await? {
            return Err(PostError::NotFound);
        }

        tracing::info!(post_id = %id, comments_removed = removed, "Blog post deleted");

        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Post, PostError> {
        self.posts.find_by_id(id).await?.ok_or(PostError::NotFound)
    }
}

fn not_found(err: StoreError) -> PostError {
    match err {
        StoreError::NotFound => PostError::NotFound,
        other => PostError::Store(other),
    }
}
