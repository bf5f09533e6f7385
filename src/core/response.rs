//! JSON response envelope shared by every endpoint
//!
//! Success: `{ "message", "error": false, "data"? }`
//! Failure: `{ "message", "error": true, "errors"? }`

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::core::validation::FieldError;

/// Envelope returned by every endpoint
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub message: String,
    pub error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

/// Placeholder payload for operations that return `data: {}`
#[derive(Debug, Default, Serialize)]
pub struct Empty {}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            error: false,
            data: Some(data),
            errors: None,
        }
    }
}

impl ApiResponse<()> {
    /// Success envelope without a `data` field
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: false,
            data: None,
            errors: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: true,
            data: None,
            errors: None,
        }
    }

    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self {
            message: "Validation errors".to_string(),
            error: true,
            data: None,
            errors: Some(errors),
        }
    }
}

/// Success response with an explicit status code
pub struct Reply<T: Serialize> {
    status: StatusCode,
    body: ApiResponse<T>,
}

impl<T: Serialize> Reply<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            status: StatusCode::OK,
            body: ApiResponse::success(message, data),
        }
    }

    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            body: ApiResponse::success(message, data),
        }
    }
}

impl Reply<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            body: ApiResponse::message(message),
        }
    }
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
