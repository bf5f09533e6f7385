//! Application state and HTTP router assembly

use axum::{
    Router,
    extract::FromRef,
    http::{HeaderName, Method, Uri, header},
    routing::get,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::core::auth::{AuthService, JwtConfig, JwtService, PasswordHasher, auth_router};
use crate::core::comments::{CommentService, comment_router};
use crate::core::config::Config;
use crate::core::db::{
    CommentRepository, CommentStore, MemoryStore, PgPool, PostRepository, PostStore,
    UserRepository, UserStore,
};
use crate::core::error::ApiError;
use crate::core::posts::{PostService, post_router};
use crate::core::response::Reply;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub posts: PostService,
    pub comments: CommentService,
    pub jwt: JwtService,
}

impl AppState {
    /// Wire services over arbitrary store implementations
    pub fn new(
        users: Arc<dyn UserStore>,
        posts: Arc<dyn PostStore>,
        comments: Arc<dyn CommentStore>,
        hasher: PasswordHasher,
        jwt: JwtService,
    ) -> Self {
        Self {
            auth: AuthService::new(users.clone(), hasher, jwt.clone()),
            posts: PostService::new(posts.clone(), comments.clone(), users),
            comments: CommentService::new(posts, comments),
            jwt,
        }
    }

    /// State backed by PostgreSQL repositories
    pub fn postgres(pool: PgPool, config: &Config) -> Self {
        Self::new(
            Arc::new(UserRepository::new(pool.clone())),
            Arc::new(PostRepository::new(pool.clone())),
            Arc::new(CommentRepository::new(pool)),
            PasswordHasher::from_config(config),
            JwtService::new(JwtConfig::from_config(config)),
        )
    }

    /// State backed by a fresh in-memory store
    pub fn in_memory(jwt_secret: &str, bcrypt_cost: u32) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(
            store.clone(),
            store.clone(),
            store,
            PasswordHasher::new(bcrypt_cost),
            JwtService::new(JwtConfig::new(jwt_secret)),
        )
    }
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

impl FromRef<AppState> for PostService {
    fn from_ref(state: &AppState) -> Self {
        state.posts.clone()
    }
}

impl FromRef<AppState> for CommentService {
    fn from_ref(state: &AppState) -> Self {
        state.comments.clone()
    }
}

impl FromRef<AppState> for JwtService {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}

/// Build the full API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(welcome))
        .merge(auth_router::<AppState>())
        .merge(post_router::<AppState>())
        .merge(comment_router::<AppState>())
        .fallback(route_not_found)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_headers([
            header::ORIGIN,
            HeaderName::from_static("x-requested-with"),
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
        .allow_methods([
            Method::POST,
            Method::GET,
            Method::PATCH,
            Method::PUT,
            Method::DELETE,
        ])
}

/// GET /
async fn welcome() -> Reply<()> {
    Reply::message("Welcome to Blog-API")
}

async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("{} route does not exist on this server", uri.path()))
}
