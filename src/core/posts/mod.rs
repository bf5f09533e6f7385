//! Blog posts
//!
//! Paginated listing, single-post reads with comments, and author-only
//! updates and deletes.

pub mod api;
pub mod service;

pub use api::post_router;
pub use service::{NewPost, Pagination, PostError, PostPage, PostService};
