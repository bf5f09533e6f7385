//! Blog API - JSON REST backend for a multi-author blog
//!
//! Users register and log in to obtain a signed session token, write blog
//! posts that only they may edit or delete, and anyone may comment on posts.

pub mod app;
pub mod core;
