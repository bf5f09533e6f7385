//! Comment API endpoints (no authentication)
//!
//! - POST /api/blog-posts/{id}/comments - Add a comment
//! - GET /api/blog-posts/{id}/comments - List comments
//! - GET /api/blog-posts/{id}/comments/{comment_id} - Get one comment
//! - PUT /api/blog-posts/{id}/comments/{comment_id} - Update a comment
//! - DELETE /api/blog-posts/{id}/comments/{comment_id} - Delete a comment

use axum::{
    Json, Router,
    extract::{
        FromRef, Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    routing::get,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::core::comments::service::{CommentError, CommentService, NewComment};
use crate::core::db::models::{Comment, CommentSummary, UpdateComment};
use crate::core::error::ApiError;
use crate::core::response::{Empty, Reply};
use crate::core::validation::{FieldError, FieldErrors, MAX_AUTHOR_LENGTH};

impl From<CommentError> for ApiError {
    fn from(err: CommentError) -> Self {
        match err {
            CommentError::PostNotFound | CommentError::NotFound => {
                ApiError::NotFound(err.to_string())
            }
            CommentError::Store(store) => ApiError::internal(store.to_string()),
        }
    }
}

/// Body of POST /api/blog-posts/{id}/comments
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateCommentRequest {
    pub author: Option<String>,
    pub comment: Option<String>,
}

impl CreateCommentRequest {
    pub fn validate(self) -> Result<NewComment, Vec<FieldError>> {
        let mut errors = FieldErrors::new();
        let author = errors.required_text(
            "author",
            self.author.as_deref(),
            "Provide an author for this comment",
            Some(MAX_AUTHOR_LENGTH),
        );
        let comment = errors.required_text(
            "comment",
            self.comment.as_deref(),
            "Kindly provide a comment",
            None,
        );

        errors.finish(NewComment { author, comment })
    }
}

/// Body of PUT /api/blog-posts/{id}/comments/{comment_id}
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateCommentRequest {
    pub author: Option<String>,
    pub comment: Option<String>,
}

impl UpdateCommentRequest {
    pub fn validate(self) -> Result<UpdateComment, Vec<FieldError>> {
        let mut errors = FieldErrors::new();
        let author = errors.optional_text("author", self.author.as_deref(), Some(MAX_AUTHOR_LENGTH));
        let comment = errors.optional_text("comment", self.comment.as_deref(), None);

        errors.finish(UpdateComment { author, comment })
    }
}

/// Create the comment API router
pub fn comment_router<S>() -> Router<S>
where
    CommentService: FromRef<S>,
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/api/blog-posts/{id}/comments",
            get(list_comments).post(add_comment),
        )
        .route(
            "/api/blog-posts/{id}/comments/{comment_id}",
            get(get_comment).put(update_comment).delete(delete_comment),
        )
}

fn post_id(path: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|_| CommentError::PostNotFound.into())
}

/// Malformed ids are reported against whichever segment fails to parse
fn comment_path(path: Result<Path<(String, String)>, PathRejection>) -> Result<(Uuid, Uuid), ApiError> {
    let Ok(Path((post, comment))) = path else {
        return Err(CommentError::PostNotFound.into());
    };
    let post = Uuid::parse_str(&post).map_err(|_| ApiError::from(CommentError::PostNotFound))?;
    let comment = Uuid::parse_str(&comment).map_err(|_| ApiError::from(CommentError::NotFound))?;

    Ok((post, comment))
}

/// POST /api/blog-posts/{id}/comments
async fn add_comment(
    State(comments): State<CommentService>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<CreateCommentRequest>, JsonRejection>,
) -> Result<Reply<Comment>, ApiError> {
    let post_id = post_id(path)?;
    let Json(request) = payload?;
    let input = request.validate()?;

    let comment = comments.add(post_id, input).await?;

    Ok(Reply::created("Successfully commented on blog post", comment))
}

/// GET /api/blog-posts/{id}/comments
async fn list_comments(
    State(comments): State<CommentService>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Reply<Vec<CommentSummary>>, ApiError> {
    let post_id = post_id(path)?;
    let list = comments.list(post_id).await?;

    Ok(Reply::ok("Successfully retrieved all comments", list))
}

/// GET /api/blog-posts/{id}/comments/{comment_id}
async fn get_comment(
    State(comments): State<CommentService>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<Reply<CommentSummary>, ApiError> {
    let (post_id, comment_id) = comment_path(path)?;
    let comment = comments.get(post_id, comment_id).await?;

    Ok(Reply::ok("Successfully retrieved comment", comment))
}

/// PUT /api/blog-posts/{id}/comments/{comment_id}
async fn update_comment(
    State(comments): State<CommentService>,
    path: Result<Path<(String, String)>, PathRejection>,
    payload: Result<Json<UpdateCommentRequest>, JsonRejection>,
) -> Result<Reply<Comment>, ApiError> {
    let (post_id, comment_id) = comment_path(path)?;
    let Json(request) = payload?;
    let changes = request.validate()?;

    let comment = comments.update(post_id, comment_id, changes).await?;

    Ok(Reply::ok("Successfully updated comment", comment))
}

/// DELETE /api/blog-posts/{id}/comments/{comment_id}
async fn delete_comment(
    State(comments): State<CommentService>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<Reply<Empty>, ApiError> {
    let (post_id, comment_id) = comment_path(path)?;
    comments.delete(post_id, comment_id).await?;

    Ok(Reply::ok("Successfully deleted comment", Empty {}))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_messages() {
        let errors = CreateCommentRequest::default().validate().unwrap_err();

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].param, "author");
        assert_eq!(errors[0].msg, "Provide an author for this comment");
        assert_eq!(errors[1].param, "comment");
        assert_eq!(errors[1].msg, "Kindly provide a comment");
    }

    #[test]
    fn test_create_request_author_limit() {
        let errors = CreateCommentRequest {
            author: Some("a".repeat(MAX_AUTHOR_LENGTH + 1)),
            comment: Some("hi".into()),
        }
        .validate()
        .unwrap_err();

        assert_eq!(errors[0].param, "author");
    }

    #[test]
    fn test_update_request_optional_fields() {
        let changes = UpdateCommentRequest {
            author: None,
            comment: Some(" it's ".into()),
        }
        .validate()
        .unwrap();

        assert_eq!(changes.author, None);
        assert_eq!(changes.comment.as_deref(), Some("it&#x27;s"));
    }

    #[test]
    fn test_comment_error_to_api_error() {
        assert!(matches!(
            ApiError::from(CommentError::PostNotFound),
            ApiError::NotFound(ref m) if m == "Blog post with the provided ID does not exist"
        ));
        assert!(matches!(
            ApiError::from(CommentError::NotFound),
            ApiError::NotFound(ref m) if m == "Comment with the provided ID does not exist"
        ));
    }

    #[test]
    fn test_comment_path_reports_bad_segment() {
        let post = Uuid::new_v4().to_string();
        let result = comment_path(Ok(Path((post, "nope".to_string()))));

        assert!(matches!(
            result,
            Err(ApiError::NotFound(ref m)) if m == "Comment with the provided ID does not exist"
        ));
    }
}
