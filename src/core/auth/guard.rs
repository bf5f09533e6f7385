//! Request authentication and post ownership checks
//!
//! [`CurrentUser`] is an axum extractor that reads the session token from the
//! `Authorization` header. The raw token is accepted; a `Bearer ` prefix is
//! stripped when present.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use std::fmt;
use uuid::Uuid;

use crate::core::auth::jwt::JwtService;
use crate::core::db::models::Post;
use crate::core::error::ApiError;

pub const NO_TOKEN_MESSAGE: &str = "No token, authorization denied!";
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid token";

/// Identity decoded from a valid session token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    JwtService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let invalid = || ApiError::Unauthorized(INVALID_TOKEN_MESSAGE.to_string());
        let token = match extract_token(parts) {
            TokenHeader::Missing => {
                return Err(ApiError::Unauthorized(NO_TOKEN_MESSAGE.to_string()));
            }
            TokenHeader::Unreadable => return Err(invalid()),
            TokenHeader::Present(token) => token,
        };

        let jwt = JwtService::from_ref(state);

        let claims = jwt.verify(token).map_err(|_| invalid())?;
        let id = claims.user_id().map_err(|_| invalid())?;

        Ok(CurrentUser {
            id,
            email: claims.email,
            name: claims.name,
        })
    }
}

enum TokenHeader<'a> {
    /// No header, or only whitespace
    Missing,
    /// Header bytes are not visible ASCII
    Unreadable,
    Present(&'a str),
}

fn extract_token(parts: &Parts) -> TokenHeader<'_> {
    let Some(raw) = parts.headers.get(header::AUTHORIZATION) else {
        return TokenHeader::Missing;
    };
    let Ok(value) = raw.to_str() else {
        return TokenHeader::Unreadable;
    };

    let value = value.trim();
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    if token.is_empty() {
        TokenHeader::Missing
    } else {
        TokenHeader::Present(token)
    }
}

/// Mutations that require post ownership
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostAction {
    Update,
    Delete,
}

impl fmt::Display for PostAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostAction::Update => write!(f, "update"),
            PostAction::Delete => write!(f, "delete"),
        }
    }
}

/// The acting user did not create the post
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("You are not permitted to {0} a post you did not create")]
pub struct NotAuthor(pub PostAction);

impl From<NotAuthor> for ApiError {
    fn from(err: NotAuthor) -> Self {
        ApiError::Forbidden(err.to_string())
    }
}

/// Reject the action unless `user` created `post`
pub fn ensure_author(user: &CurrentUser, post: &Post, action: PostAction) -> Result<(), NotAuthor> {
    if post.author_id == user.id {
        return Ok(());
    }

    tracing::debug!(user_id = %user.id, post_id = %post.id, %action, "Ownership check failed");
    Err(NotAuthor(action))
}
