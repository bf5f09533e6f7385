//! JWT utilities for session token issuance and verification
//!
//! Tokens are HS256-signed and expire 24 hours after issuance. Verification
//! failures of every kind (bad signature, garbage input, wrong issuer,
//! expiry) surface as the single [`JwtError::InvalidToken`] so callers cannot
//! tell why a token was refused.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::config::Config;

/// Default session token lifetime (24 hours)
const TOKEN_EXPIRATION_HOURS: i64 = 24;

/// Default issuer embedded in every token
const DEFAULT_ISSUER: &str = "blog-api";

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token lifetime in hours
    pub expiration_hours: i64,
    /// Token issuer
    pub issuer: String,
}

impl JwtConfig {
    /// Create a new JWT configuration
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            expiration_hours: TOKEN_EXPIRATION_HOURS,
            issuer: DEFAULT_ISSUER.to_string(),
        }
    }

    /// Create config from the application configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.jwt_secret.clone())
    }

    /// Set token lifetime
    pub fn expiration(mut self, hours: i64) -> Self {
        self.expiration_hours = hours;
        self
    }

    /// Set issuer
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }
}

/// JWT errors
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Token encoding failed: {0}")]
    Encoding(String),

    #[error("Invalid token")]
    InvalidToken,
}

impl From<jsonwebtoken::errors::Error> for JwtError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        tracing::debug!("Token rejected: {:?}", err.kind());
        JwtError::InvalidToken
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// User email
    pub email: String,
    /// Display name
    pub name: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issuer
    pub iss: String,
    /// JWT ID (unique identifier for this token)
    pub jti: String,
}

impl Claims {
    /// Get user ID as UUID
    pub fn user_id(&self) -> Result<Uuid, JwtError> {
        Uuid::parse_str(&self.sub).map_err(|_| JwtError::InvalidToken)
    }
}

/// A freshly signed token and its expiry
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: i64,
}

/// JWT service for token operations
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    /// Create a new JWT service
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Sign a session token for a user
    pub fn issue(&self, user_id: Uuid, email: &str, name: &str) -> Result<IssuedToken, JwtError> {
        let now = Utc::now();
        let exp = now + Duration::hours(self.config.expiration_hours);

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: self.config.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::Encoding(e.to_string()))?;

        Ok(IssuedToken {
            token,
            expires_at: exp.timestamp(),
        })
    }

    /// Validate and decode a token
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);
        // Set leeway to 0 for strict expiration checking
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> JwtService {
        let config = JwtConfig::new("test_secret_key_for_testing_only_32bytes!");
        JwtService::new(config)
    }

    // ========================================================================
    // JwtConfig Tests
    // ========================================================================

    #[test]
    fn test_jwt_config_new() {
        let config = JwtConfig::new("my_secret");

        assert_eq!(config.secret, "my_secret");
        assert_eq!(config.expiration_hours, 24);
        assert_eq!(config.issuer, "blog-api");
    }

    #[test]
    fn test_jwt_config_builder() {
        let config = JwtConfig::new("secret").expiration(2).issuer("my_app");

        assert_eq!(config.expiration_hours, 2);
        assert_eq!(config.issuer, "my_app");
    }

    // ========================================================================
    // Issue / Verify Tests
    // ========================================================================

    #[test]
    fn test_issue_and_verify() {
        let service = create_test_service();
        let user_id = Uuid::new_v4();

        let issued = service.issue(user_id, "ann@example.com", "Ann").unwrap();
        assert!(!issued.token.is_empty());

        let claims = service.verify(&issued.token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, "ann@example.com");
        assert_eq!(claims.name, "Ann");
        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.exp, issued.expires_at);
    }

    #[test]
    fn test_token_lifetime_is_24_hours() {
        let service = create_test_service();
        let issued = service.issue(Uuid::new_v4(), "a@x.com", "A").unwrap();
        let claims = service.verify(&issued.token).unwrap();

        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_token_contains_unique_jti() {
        let service = create_test_service();
        let user_id = Uuid::new_v4();

        let first = service.issue(user_id, "a@x.com", "A").unwrap();
        let second = service.issue(user_id, "a@x.com", "A").unwrap();

        let claims1 = service.verify(&first.token).unwrap();
        let claims2 = service.verify(&second.token).unwrap();
        assert_ne!(claims1.jti, claims2.jti);
    }

    // ========================================================================
    // Rejection Tests
    // ========================================================================

    #[test]
    fn test_verify_garbage_token() {
        let service = create_test_service();
        assert!(matches!(
            service.verify("invalid.token.here"),
            Err(JwtError::InvalidToken)
        ));
        assert!(matches!(service.verify(""), Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_verify_wrong_secret() {
        let service1 = JwtService::new(JwtConfig::new("secret_one"));
        let service2 = JwtService::new(JwtConfig::new("secret_two"));

        let issued = service1.issue(Uuid::new_v4(), "a@x.com", "A").unwrap();
        assert!(matches!(
            service2.verify(&issued.token),
            Err(JwtError::InvalidToken)
        ));
    }

    #[test]
    fn test_verify_wrong_issuer() {
        let other = JwtService::new(JwtConfig::new("shared").issuer("someone-else"));
        let ours = JwtService::new(JwtConfig::new("shared"));

        let issued = other.issue(Uuid::new_v4(), "a@x.com", "A").unwrap();
        assert!(matches!(ours.verify(&issued.token), Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_verify_tampered_token() {
        let service = create_test_service();
        let issued = service.issue(Uuid::new_v4(), "a@x.com", "A").unwrap();

        let mut tampered = issued.token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        assert!(matches!(service.verify(&tampered), Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_expired_token_is_uniformly_invalid() {
        // Negative lifetime yields a token that is already expired
        let config = JwtConfig::new("test_secret").expiration(-1);
        let service = JwtService::new(config);

        let issued = service.issue(Uuid::new_v4(), "a@x.com", "A").unwrap();
        let result = service.verify(&issued.token);

        assert!(
            matches!(result, Err(JwtError::InvalidToken)),
            "Expected InvalidToken, got: {:?}",
            result
        );
    }

    #[test]
    fn test_claims_user_id_rejects_non_uuid_subject() {
        let claims = Claims {
            sub: "not-a-uuid".to_string(),
            email: String::new(),
            name: String::new(),
            iat: 0,
            exp: 0,
            iss: String::new(),
            jti: String::new(),
        };
        assert!(matches!(claims.user_id(), Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_jwt_error_display() {
        assert_eq!(format!("{}", JwtError::InvalidToken), "Invalid token");
        assert!(format!("{}", JwtError::Encoding("bad key".into())).contains("bad key"));
    }
}
