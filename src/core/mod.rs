//! Core domain logic: configuration, persistence, auth, posts and comments

pub mod auth;
pub mod comments;
pub mod config;
pub mod db;
pub mod error;
pub mod posts;
pub mod response;
pub mod validation;
