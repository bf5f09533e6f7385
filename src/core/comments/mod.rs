//! Public comments on blog posts

pub mod api;
pub mod service;

pub use api::comment_router;
pub use service::{CommentError, CommentService, NewComment};
