//! Authentication service
//!
//! Registration, login and password rotation. Coordinates the user store, the
//! password hasher and the JWT service. Inputs arrive already validated and
//! with the email normalized.

use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::auth::jwt::{JwtError, JwtService};
use crate::core::auth::password::{PasswordError, PasswordHasher};
use crate::core::db::models::{CreateUser, User};
use crate::core::db::store::{StoreError, UserStore};

/// Authentication service error types
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("User with provided email already exists!")]
    EmailAlreadyExists,

    #[error("User does not exist")]
    UserNotFound,

    #[error("User with the provided email address does not exist")]
    EmailNotFound,

    #[error("Invalid password")]
    InvalidCredentials,

    /// The account was stored but no token could be signed for it
    #[error("Token issuance failed after registration: {0}")]
    RegistrationIncomplete(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => AuthError::EmailAlreadyExists,
            StoreError::NotFound => AuthError::UserNotFound,
            StoreError::Database(_) => AuthError::Internal(err.to_string()),
        }
    }
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

/// Validated registration input
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Validated login input
#[derive(Debug, Clone)]
pub struct Login {
    pub email: String,
    pub password: String,
}

/// Validated password change input
#[derive(Debug, Clone)]
pub struct PasswordChange {
    pub email: String,
    pub old_password: String,
    pub new_password: String,
}

/// Identity and session token returned by register and login
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub token: String,
}

impl AuthResponse {
    fn new(user: User, token: String) -> Self {
        Self {
            user_id: user.id,
            name: user.name,
            email: user.email,
            token,
        }
    }
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    jwt: JwtService,
}

impl AuthService {
    /// Create a new authentication service
    pub fn new(users: Arc<dyn UserStore>, hasher: PasswordHasher, jwt: JwtService) -> Self {
        Self { users, hasher, jwt }
    }

    /// Register a new user and sign a token for it
    pub async fn register(&self, input: Registration) -> Result<AuthResponse, AuthError> {
        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        let password_hash = self.hasher.hash(&input.password).await?;

        let user = self
            .users
            .create(CreateUser {
                name: input.name,
                email: input.email,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, "User account created");

        // The account is already persisted; a signing failure leaves it in place
        let issued = self
            .jwt
            .issue(user.id, &user.email, &user.name)
            .map_err(|e| {
                tracing::warn!(user_id = %user.id, "Registered user without a token");
                AuthError::RegistrationIncomplete(e.to_string())
            })?;

        Ok(AuthResponse::new(user, issued.token))
    }

    /// Authenticate by email and password
    pub async fn login(&self, input: Login) -> Result<AuthResponse, AuthError> {
        let user = self
            .users
            .find_by_email(&input.email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !self
            .hasher
            .verify(&input.password, &user.password_hash)
            .await?
        {
            return Err(AuthError::InvalidCredentials);
        }

        let issued = self.jwt.issue(user.id, &user.email, &user.name)?;

        Ok(AuthResponse::new(user, issued.token))
    }

    /// Replace the password after checking the old one. No token is issued.
    pub async fn change_password(&self, input: PasswordChange) -> Result<(), AuthError> {
        let user = self
            .users
            .find_by_email(&input.email)
            .await?
            .ok_or(AuthError::EmailNotFound)?;

        if !self
            .hasher
            .verify(&input.old_password, &user.password_hash)
            .await?
        {
            return Err(AuthError::InvalidCredentials);
        }

        let password_hash = self.hasher.hash(&input.new_password).await?;
        self.users
            .update_password(user.id, &password_hash)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => AuthError::EmailNotFound,
                other => other.into(),
            })?;

        tracing::info!(user_id = %user.id, "Password changed");

        Ok(())
    }
}
