//! Post repository for database operations
//!
//! The post row carries its ordered comment ids in a `UUID[]` column.
//! Appends and removals are single `UPDATE` statements so concurrent comment
//! writes on the same post do not overwrite each other.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::db::models::{CreatePost, Post, UpdatePost};
use crate::core::db::store::{PostStore, StoreError, StoreResult};

/// Post repository for database operations
#[derive(Clone)]
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    /// Create a new post repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PostRepository {
    async fn create(&self, post: CreatePost) -> StoreResult<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (author, author_id, title, body)
            VALUES ($1, $2, $3, $4)
            RETURNING id, author, author_id, title, body, comment_ids, created_at, updated_at
            "#,
        )
        .bind(&post.author)
        .bind(post.author_id)
        .bind(&post.title)
        .bind(&post.body)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, author, author_id, title, body, comment_ids, created_at, updated_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn list(&self, limit: i64, offset: i64) -> StoreResult<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, author, author_id, title, body, comment_ids, created_at, updated_at
            FROM posts
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn count(&self) -> StoreResult<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    async fn update(&self, id: Uuid, updates: UpdatePost) -> StoreResult<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET
                title = COALESCE($2, title),
                body = COALESCE($3, body),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, author, author_id, title, body, comment_ids, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&updates.title)
        .bind(&updates.body)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn push_comment(&self, id: Uuid, comment_id: Uuid) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET comment_ids = array_append(comment_ids, $2)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(comment_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn remove_comment(&self, id: Uuid, comment_id: Uuid) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET comment_ids = array_remove(comment_ids, $2)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(comment_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::db::models::{CreateComment, CreateUser};
    use crate::core::db::pool::{DbConfig, create_pool_with_migrations};
    use crate::core::db::repositories::{CommentRepository, UserRepository};
    use crate::core::db::store::{CommentStore, UserStore};

    async fn create_test_pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let config = DbConfig {
            database_url: url,
            ..Default::default()
        };
        create_pool_with_migrations(&config)
            .await
            .expect("Failed to create pool")
    }

    async fn create_author(pool: &PgPool) -> Uuid {
        let users = UserRepository::new(pool.clone());
        users
            .create(CreateUser {
                name: "Post Author".to_string(),
                email: format!("author_{}@example.com", Uuid::new_v4()),
                password_hash: "$2b$04$hash".to_string(),
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    #[ignore = "requires running PostgreSQL database"]
    async fn test_create_update_delete_post() {
        let pool = create_test_pool().await;
        let author_id = create_author(&pool).await;
        let repo = PostRepository::new(pool);

        let post = repo
            .create(CreatePost {
                author: "Post Author".to_string(),
                author_id,
                title: "Hello".to_string(),
                body: "World".to_string(),
            })
            .await
            .unwrap();
        assert!(post.comments.is_empty());

        let updated = repo
            .update(
                post.id,
                UpdatePost {
                    title: Some("Hello again".to_string()),
                    body: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "Hello again");
        assert_eq!(updated.body, "World");

        assert!(repo.delete(post.id).await.unwrap());
        assert!(repo.find_by_id(post.id).await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "requires running PostgreSQL database"]
    async fn test_comment_id_collection() {
        let pool = create_test_pool().await;
        let author_id = create_author(&pool).await;
        let repo = PostRepository::new(pool);

        let post = repo
            .create(CreatePost {
                author: "Post Author".to_string(),
                author_id,
                title: "Hello".to_string(),
                body: "World".to_string(),
            })
            .await
            .unwrap();

        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        repo.push_comment(post.id, a).await.unwrap();
        repo.push_comment(post.id, b).await.unwrap();
        repo.remove_comment(post.id, a).await.unwrap();

        let reloaded = repo.find_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(reloaded.comments, vec![b]);

        repo.delete(post.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires running PostgreSQL database"]
    async fn test_delete_post_with_remaining_comment_removes_it() {
        let pool = create_test_pool().await;
        let author_id = create_author(&pool).await;
        let posts = PostRepository::new(pool.clone());
        let comments = CommentRepository::new(pool);

        let post = posts
            .create(CreatePost {
                author: "Post Author".to_string(),
                author_id,
                title: "Hello".to_string(),
                body: "World".to_string(),
            })
            .await
            .unwrap();
        let straggler = comments
            .create(CreateComment {
                post: post.id,
                author: "Bob".to_string(),
                comment: "late".to_string(),
            })
            .await
            .unwrap();

        assert!(posts.delete(post.id).await.unwrap());
        assert!(comments.find_by_id(straggler.id).await.unwrap().is_none());
    }
}
