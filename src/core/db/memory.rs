//! In-memory store
//!
//! A `dashmap`-backed implementation of the storage ports. Used by the test
//! suites and handy for running the API without PostgreSQL. Per-entry locking
//! makes each operation atomic on its own record.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::{DashMap, mapref::entry::Entry};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::db::models::{
    Comment, CreateComment, CreatePost, CreateUser, Post, UpdateComment, UpdatePost, User,
};
use crate::core::db::store::{CommentStore, PostStore, StoreError, StoreResult, UserStore};

/// In-memory users, posts and comments
#[derive(Default, Clone)]
pub struct MemoryStore {
    users: Arc<DashMap<Uuid, User>>,
    emails: Arc<DashMap<String, Uuid>>,
    posts: Arc<DashMap<Uuid, Post>>,
    comments: Arc<DashMap<Uuid, Comment>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, user: CreateUser) -> StoreResult<User> {
        let id = Uuid::new_v4();

        match self.emails.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(StoreError::Conflict(user.email)),
            Entry::Vacant(slot) => {
                slot.insert(id);
                let now = Utc::now();
                let record = User {
                    id,
                    name: user.name,
                    email: user.email,
                    password_hash: user.password_hash,
                    created_at: now,
                    updated_at: now,
                };
                self.users.insert(id, record.clone());
                Ok(record)
            }
        }
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let Some(id) = self.emails.get(email).map(|id| *id) else {
            return Ok(None);
        };
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> StoreResult<()> {
        let mut user = self.users.get_mut(&id).ok_or(StoreError::NotFound)?;
        user.password_hash = password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn create(&self, post: CreatePost) -> StoreResult<Post> {
        let now = Utc::now();
        let record = Post {
            id: Uuid::new_v4(),
            author: post.author,
            author_id: post.author_id,
            title: post.title,
            body: post.body,
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.posts.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Post>> {
        Ok(self.posts.get(&id).map(|p| p.clone()))
    }

    async fn list(&self, limit: i64, offset: i64) -> StoreResult<Vec<Post>> {
        let mut posts: Vec<Post> = self.posts.iter().map(|p| p.clone()).collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(posts
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count(&self) -> StoreResult<i64> {
        Ok(self.posts.len() as i64)
    }

    async fn update(&self, id: Uuid, updates: UpdatePost) -> StoreResult<Post> {
        let mut post = self.posts.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(title) = updates.title {
            post.title = title;
        }
        if let Some(body) = updates.body {
            post.body = body;
        }
        post.updated_at = Utc::now();
        Ok(post.clone())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.posts.remove(&id).is_some())
    }

    async fn push_comment(&self, id: Uuid, comment_id: Uuid) -> StoreResult<()> {
        let mut post = self.posts.get_mut(&id).ok_or(StoreError::NotFound)?;
        post.comments.push(comment_id);
        Ok(())
    }

    async fn remove_comment(&self, id: Uuid, comment_id: Uuid) -> StoreResult<()> {
        let mut post = self.posts.get_mut(&id).ok_or(StoreError::NotFound)?;
        post.comments.retain(|c| *c != comment_id);
        Ok(())
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn create(&self, comment: CreateComment) -> StoreResult<Comment> {
        let now = Utc::now();
        let record = Comment {
            id: Uuid::new_v4(),
            author: comment.author,
            comment: comment.comment,
            post: comment.post,
            created_at: now,
            updated_at: now,
        };
        self.comments.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Comment>> {
        Ok(self.comments.get(&id).map(|c| c.clone()))
    }

    async fn list_by_post(&self, post_id: Uuid) -> StoreResult<Vec<Comment>> {
        self.list_by_posts(&[post_id]).await
    }

    async fn list_by_posts(&self, post_ids: &[Uuid]) -> StoreResult<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .comments
            .iter()
            .filter(|c| post_ids.contains(&c.post))
            .map(|c| c.clone())
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments)
    }

    async fn update(&self, id: Uuid, updates: UpdateComment) -> StoreResult<Comment> {
        let mut comment = self.comments.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(author) = updates.author {
            comment.author = author;
        }
        if let Some(text) = updates.comment {
            comment.comment = text;
        }
        comment.updated_at = Utc::now();
        Ok(comment.clone())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.comments.remove(&id).is_some())
    }

    async fn delete_by_post(&self, post_id: Uuid) -> StoreResult<u64> {
        let mut removed = 0u64;
        self.comments.retain(|_, c| {
            let keep = c.post != post_id;
            if !keep {
                removed += 1;
            }
            keep
        });
        Ok(removed)
    }
}
