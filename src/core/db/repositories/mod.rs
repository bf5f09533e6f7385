//! Database repositories for the blog
//!
//! PostgreSQL implementations of the storage ports in `core::db::store`.
//! Repositories encapsulate data access logic and keep SQL out of the services.

pub mod comment;
pub mod post;
pub mod user;

pub use comment::CommentRepository;
pub use post::PostRepository;
pub use user::UserRepository;
