//! Database module for the blog
//!
//! This module provides database connectivity, models, the storage ports the
//! services depend on, and their PostgreSQL and in-memory implementations.

pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;
pub mod store;

// Re-export commonly used items
pub use memory::MemoryStore;
pub use models::*;
pub use pool::{DbConfig, DbError, create_pool_with_migrations};
pub use repositories::{CommentRepository, PostRepository, UserRepository};
pub use store::{CommentStore, PostStore, StoreError, StoreResult, UserStore};

// Re-export sqlx types that might be needed
pub use sqlx::PgPool;
