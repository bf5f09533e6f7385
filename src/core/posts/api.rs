//! Blog post API endpoints
//!
//! - POST /api/blog-posts - Create a post (auth required)
//! - GET /api/blog-posts - Paginated list (`page`, `limit`)
//! - GET /api/blog-posts/{id} - One post with its comments
//! - PUT /api/blog-posts/{id} - Update a post (author only)
//! - DELETE /api/blog-posts/{id} - Delete a post and its comments (author only)

use axum::{
    Json, Router,
    extract::{
        FromRef, Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    routing::get,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::core::auth::{CurrentUser, JwtService};
use crate::core::db::models::{Post, PostWithComments, UpdatePost};
use crate::core::db::store::StoreError;
use crate::core::error::ApiError;
use crate::core::posts::service::{NewPost, Pagination, PostError, PostPage, PostService};
use crate::core::response::{Empty, Reply};
use crate::core::validation::{FieldError, FieldErrors, MAX_TITLE_LENGTH};

const POST_NOT_FOUND: &str = "Blog post does not exist";

impl From<PostError> for ApiError {
    fn from(err: PostError) -> Self {
        match err {
            PostError::NotFound | PostError::Store(StoreError::NotFound) => {
                ApiError::not_found(POST_NOT_FOUND)
            }
            PostError::Unauthenticated => ApiError::Unauthorized(err.to_string()),
            PostError::NotAuthor(denied) => denied.into(),
            PostError::Store(store) => ApiError::internal(store.to_string()),
        }
    }
}

// ============================================================================
// Request DTOs
// ============================================================================

/// Query parameters for listing posts
#[derive(Debug, Default, Deserialize)]
pub struct ListPostsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Body of POST /api/blog-posts
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub body: Option<String>,
}

impl CreatePostRequest {
    pub fn validate(self) -> Result<NewPost, Vec<FieldError>> {
        let mut errors = FieldErrors::new();
        let title = errors.required_text(
            "title",
            self.title.as_deref(),
            "Provide a blog post title",
            Some(MAX_TITLE_LENGTH),
        );
        let body = errors.required_text(
            "body",
            self.body.as_deref(),
            "Provide blog post content",
            None,
        );

        errors.finish(NewPost { title, body })
    }
}

/// Body of PUT /api/blog-posts/{id}; blank fields are left unchanged
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub body: Option<String>,
}

impl UpdatePostRequest {
    pub fn validate(self) -> Result<UpdatePost, Vec<FieldError>> {
        let mut errors = FieldErrors::new();
        let title = errors.optional_text("title", self.title.as_deref(), Some(MAX_TITLE_LENGTH));
        let body = errors.optional_text("body", self.body.as_deref(), None);

        errors.finish(UpdatePost { title, body })
    }
}

// ============================================================================
// Router
// ============================================================================

/// Create the blog post API router
pub fn post_router<S>() -> Router<S>
where
    PostService: FromRef<S>,
    JwtService: FromRef<S>,
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/api/blog-posts", get(list_posts).post(create_post))
        .route(
            "/api/blog-posts/{id}",
            get(get_post).put(update_post).delete(delete_post),
        )
}

fn post_id(path: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|_| ApiError::not_found(POST_NOT_FOUND))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/blog-posts
async fn create_post(
    State(posts): State<PostService>,
    user: CurrentUser,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<Reply<Post>, ApiError> {
    let Json(request) = payload?;
    let input = request.validate()?;

    let post = posts.create(&user, input).await?;

    Ok(Reply::created("Successfully created blog post", post))
}

/// GET /api/blog-posts
async fn list_posts(
    State(posts): State<PostService>,
    query: Result<Query<ListPostsQuery>, QueryRejection>,
) -> Result<Reply<PostPage>, ApiError> {
    let Query(query) = query?;
    let pagination = Pagination::new(query.page, query.limit);

    let page = posts.list(pagination).await?;

    Ok(Reply::ok("Successfully retrieved all blog posts", page))
}

/// GET /api/blog-posts/{id}
async fn get_post(
    State(posts): State<PostService>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Reply<PostWithComments>, ApiError> {
    let id = post_id(path)?;
    let post = posts.get(id).await?;

    Ok(Reply::ok("Successfully retrieved blog post", post))
}

/// PUT /api/blog-posts/{id}
async fn update_post(
    State(posts): State<PostService>,
    user: CurrentUser,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdatePostRequest>, JsonRejection>,
) -> Result<Reply<Post>, ApiError> {
    let id = post_id(path)?;
    let Json(request) = payload?;
    let changes = request.validate()?;

    let post = posts.update(&user, id, changes).await?;

    Ok(Reply::ok("Successfully updated blog post", post))
}

/// DELETE /api/blog-posts/{id}
async fn delete_post(
    State(posts): State<PostService>,
    user: CurrentUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Reply<Empty>, ApiError> {
    let id = post_id(path)?;
    posts.delete(&user, id).await?;

    Ok(Reply::ok("Successfully deleted blog post", Empty {}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auth::{NotAuthor, PostAction};

    #[test]
    fn test_create_request_requires_title_and_body() {
        let errors = CreatePostRequest {
            title: Some("   ".into()),
            body: None,
        }
        .validate()
        .unwrap_err();

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].param, "title");
        assert_eq!(errors[0].msg, "Provide a blog post title");
        assert_eq!(errors[1].param, "body");
        assert_eq!(errors[1].msg, "Provide blog post content");
    }

    #[test]
    fn test_create_request_escapes_and_trims() {
        let input = CreatePostRequest {
            title: Some("  <b>Hi</b> ".into()),
            body: Some("a & b".into()),
        }
        .validate()
        .unwrap();

        assert_eq!(input.title, "&lt;b&gt;Hi&lt;&#x2F;b&gt;");
        assert_eq!(input.body, "a &amp; b");
    }

    #[test]
    fn test_create_request_title_too_long() {
        let errors = CreatePostRequest {
            title: Some("t".repeat(MAX_TITLE_LENGTH + 1)),
            body: Some("body".into()),
        }
        .validate()
        .unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].param, "title");
    }

    #[test]
    fn test_update_request_blank_fields_are_absent() {
        let changes = UpdatePostRequest {
            title: Some("  ".into()),
            body: Some(" new ".into()),
        }
        .validate()
        .unwrap();

        assert_eq!(changes.title, None);
        assert_eq!(changes.body.as_deref(), Some("new"));
    }

    #[test]
    fn test_list_query_deserialization() {
        let query: ListPostsQuery = serde_json::from_str(r#"{"page":2}"#).unwrap();
        assert_eq!(query.page, Some(2));
        assert_eq!(query.limit, None);
    }

    #[test]
    fn test_post_error_to_api_error() {
        assert!(matches!(
            ApiError::from(PostError::NotFound),
            ApiError::NotFound(ref m) if m == POST_NOT_FOUND
        ));
        assert!(matches!(
            ApiError::from(PostError::Unauthenticated),
            ApiError::Unauthorized(ref m) if m == "Authentication details required"
        ));
        assert!(matches!(
            ApiError::from(PostError::NotAuthor(NotAuthor(PostAction::Update))),
            ApiError::Forbidden(_)
        ));
        assert!(matches!(
            ApiError::from(PostError::Store(StoreError::Database(sqlx::Error::PoolTimedOut))),
            ApiError::Internal { .. }
        ));
    }
}
