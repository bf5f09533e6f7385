//! Auth API endpoints
//!
//! - POST /api/auth/register - Create an account and get a session token
//! - POST /api/auth/login - Login and get a session token
//! - POST /api/auth/change-password - Rotate a password (no token issued)

use axum::{
    Json, Router,
    extract::{FromRef, State, rejection::JsonRejection},
    routing::post,
};
use serde::Deserialize;

use crate::core::auth::service::{
    AuthError, AuthResponse, AuthService, Login, PasswordChange, Registration,
};
use crate::core::error::ApiError;
use crate::core::response::Reply;
use crate::core::validation::{FieldError, FieldErrors};

const REGISTRATION_FAILED_MESSAGE: &str = "Registration failed, please try again later";

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmailAlreadyExists => ApiError::Conflict(err.to_string()),
            AuthError::UserNotFound | AuthError::EmailNotFound => ApiError::NotFound(err.to_string()),
            AuthError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            AuthError::RegistrationIncomplete(detail) => {
                ApiError::internal_with(REGISTRATION_FAILED_MESSAGE, detail)
            }
            AuthError::Internal(detail) => ApiError::internal(detail),
        }
    }
}

/// Body of POST /api/auth/register
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<Registration, Vec<FieldError>> {
        let mut errors = FieldErrors::new();

        let name = self.name.as_deref().map(str::trim).unwrap_or_default();
        if name.is_empty() {
            errors.push("name", "Name is required");
        }
        let email = errors.email("email", self.email.as_deref());
        let password = errors.password("password", self.password.as_deref());

        errors.finish(Registration {
            name: name.to_string(),
            email,
            password,
        })
    }
}

/// Body of POST /api/auth/login
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    pub fn validate(self) -> Result<Login, Vec<FieldError>> {
        let mut errors = FieldErrors::new();
        let email = errors.email("email", self.email.as_deref());
        let password = errors.password("password", self.password.as_deref());

        errors.finish(Login { email, password })
    }
}

/// Body of POST /api/auth/change-password
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub email: Option<String>,
    pub old_password: Option<String>,
    pub new_password: Option<String>,
}

impl ChangePasswordRequest {
    pub fn validate(self) -> Result<PasswordChange, Vec<FieldError>> {
        let mut errors = FieldErrors::new();
        let email = errors.email("email", self.email.as_deref());
        let old_password = errors.password("oldPassword", self.old_password.as_deref());
        let new_password = errors.password("newPassword", self.new_password.as_deref());

        errors.finish(PasswordChange {
            email,
            old_password,
            new_password,
        })
    }
}

/// Create the auth API router
pub fn auth_router<S>() -> Router<S>
where
    AuthService: FromRef<S>,
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/api/auth/register", post(register_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/change-password", post(change_password_handler))
}

/// POST /api/auth/register
async fn register_handler(
    State(auth): State<AuthService>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Reply<AuthResponse>, ApiError> {
    let Json(request) = payload?;
    let input = request.validate()?;

    tracing::info!("Registration attempt for email: {}", input.email);

    let response = auth.register(input).await?;

    tracing::info!("User registered successfully: {}", response.email);

    Ok(Reply::created("Registration successful", response))
}

/// POST /api/auth/login
async fn login_handler(
    State(auth): State<AuthService>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Reply<AuthResponse>, ApiError> {
    let Json(request) = payload?;
    let input = request.validate()?;

    tracing::info!("Login attempt for email: {}", input.email);

    let response = auth.login(input).await?;

    Ok(Reply::ok("Login successful", response))
}

/// POST /api/auth/change-password
async fn change_password_handler(
    State(auth): State<AuthService>,
    payload: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> Result<Reply<()>, ApiError> {
    let Json(request) = payload?;
    let input = request.validate()?;

    auth.change_password(input).await?;

    Ok(Reply::message(
        "Successfully changed password. Proceed to login",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auth::jwt::{JwtConfig, JwtService};
    use crate::core::auth::password::PasswordHasher;
    use crate::core::config::MIN_BCRYPT_COST;
    use crate::core::db::MemoryStore;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        let service = AuthService::new(
            Arc::new(MemoryStore::new()),
            PasswordHasher::new(MIN_BCRYPT_COST),
            JwtService::new(JwtConfig::new("auth_api_test_secret")),
        );
        auth_router().with_state(service)
    }

    async fn post_json(app: &Router, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    // ========================================================================
    // Request Validation Tests
    // ========================================================================

    #[test]
    fn test_register_request_collects_all_errors() {
        let errors = RegisterRequest::default().validate().unwrap_err();
        let params: Vec<&str> = errors.iter().map(|e| e.param.as_str()).collect();

        assert_eq!(params, vec!["name", "email", "password"]);
        assert_eq!(errors[0].msg, "Name is required");
        assert!(errors.iter().all(|e| e.location == "body"));
    }

    #[test]
    fn test_register_request_normalizes_email() {
        let request = RegisterRequest {
            name: Some("  Ann ".into()),
            email: Some(" A@X.com ".into()),
            password: Some("secret1".into()),
        };
        let input = request.validate().unwrap();

        assert_eq!(input.name, "Ann");
        assert_eq!(input.email, "a@x.com");
    }

    #[test]
    fn test_change_password_request_uses_camel_case_params() {
        let request: ChangePasswordRequest =
            serde_json::from_str(r#"{"email":"a@x.com","oldPassword":"123","newPassword":"secret2"}"#)
                .unwrap();
        let errors = request.validate().unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].param, "oldPassword");
        assert_eq!(errors[0].msg, "Provide a password of 6 or more characters");
    }

    // ========================================================================
    // Error Mapping Tests
    // ========================================================================

    #[test]
    fn test_auth_error_to_api_error() {
        assert!(matches!(
            ApiError::from(AuthError::EmailAlreadyExists),
            ApiError::Conflict(_)
        ));
        assert!(matches!(
            ApiError::from(AuthError::UserNotFound),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from(AuthError::InvalidCredentials),
            ApiError::Unauthorized(_)
        ));

        match ApiError::from(AuthError::RegistrationIncomplete("bad key".into())) {
            ApiError::Internal { public, detail } => {
                assert_eq!(public, REGISTRATION_FAILED_MESSAGE);
                assert_eq!(detail, "bad key");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    // ========================================================================
    // Handler Tests
    // ========================================================================

    #[tokio::test]
    async fn test_register_then_login() {
        let app = app();

        let (status, body) = post_json(
            &app,
            "/api/auth/register",
            r#"{"name":"Ann","email":"A@x.com","password":"secret1"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Registration successful");
        assert_eq!(body["error"], false);
        assert_eq!(body["data"]["email"], "a@x.com");
        assert!(body["data"]["token"].as_str().is_some());
        assert!(body["data"]["userId"].as_str().is_some());

        let (status, body) = post_json(
            &app,
            "/api/auth/login",
            r#"{"email":"a@x.com","password":"secret1"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Login successful");
        assert_eq!(body["data"]["name"], "Ann");
    }

    #[tokio::test]
    async fn test_register_validation_envelope() {
        let (status, body) = post_json(&app(), "/api/auth/register", r#"{"email":"nope"}"#).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["message"], "Validation errors");
        assert_eq!(body["error"], true);
        assert_eq!(body["errors"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_malformed_json_is_validation_error() {
        let (status, body) = post_json(&app(), "/api/auth/login", "{not json").await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], true);
        assert_eq!(body["errors"][0]["param"], "body");
    }

    #[tokio::test]
    async fn test_login_unknown_user_is_not_found() {
        let (status, body) = post_json(
            &app(),
            "/api/auth/login",
            r#"{"email":"ghost@x.com","password":"secret1"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "User does not exist");
    }

    #[tokio::test]
    async fn test_change_password_flow() {
        let app = app();
        post_json(
            &app,
            "/api/auth/register",
            r#"{"name":"Ann","email":"a@x.com","password":"secret1"}"#,
        )
        .await;

        let (status, body) = post_json(
            &app,
            "/api/auth/change-password",
            r#"{"email":"a@x.com","oldPassword":"secret1","newPassword":"secret2"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Successfully changed password. Proceed to login");
        assert!(body.get("data").is_none());

        let (status, body) = post_json(
            &app,
            "/api/auth/login",
            r#"{"email":"a@x.com","password":"secret1"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid password");
    }
}
