//! Authentication for the blog API
//!
//! This module provides:
//! - bcrypt password hashing
//! - JWT session token issuance and verification
//! - User registration, login and password rotation
//! - The `CurrentUser` extractor and post ownership checks
//! - REST API endpoints for auth operations

pub mod api;
pub mod guard;
pub mod jwt;
pub mod password;
pub mod service;

pub use api::auth_router;
pub use guard::{CurrentUser, NotAuthor, PostAction, ensure_author};
pub use jwt::{Claims, IssuedToken, JwtConfig, JwtError, JwtService};
pub use password::{PasswordError, PasswordHasher};
pub use service::{AuthError, AuthResponse, AuthService, Login, PasswordChange, Registration};
