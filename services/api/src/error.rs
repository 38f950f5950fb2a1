//! Custom error types for the API service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Unauthorized access
    #[error("Unauthorized")]
    Unauthorized,

    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Resource not found
    #[error("Not found")]
    NotFound,

    /// Conflicting state, e.g. duplicate email on signup
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] common::error::DatabaseError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
            ApiError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

/// Login failure causes
///
/// The two credential failures are distinct for audit logging but map to the
/// same opaque 401 response, so the API never reveals whether the email or
/// the password was wrong.
#[derive(Error, Debug)]
pub enum AuthError {
    /// No account exists for the supplied email
    #[error("User not found")]
    UserNotFound,

    /// Password did not match the stored hash
    #[error("Incorrect credentials for user {user_id}")]
    CredentialsIncorrect { user_id: Uuid },

    /// Unexpected failure while authenticating
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::UserNotFound => {
                warn!("Login failed: user not found");
                StatusCode::UNAUTHORIZED
            }
            AuthError::CredentialsIncorrect { user_id } => {
                warn!("Login failed: incorrect credentials for user {}", user_id);
                StatusCode::UNAUTHORIZED
            }
            AuthError::Internal(e) => {
                tracing::error!("Login failed unexpectedly: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = match status {
            StatusCode::UNAUTHORIZED => Json(json!({ "error": "Unauthorized" })),
            _ => Json(json!({ "error": "Internal server error" })),
        };

        (status, body).into_response()
    }
}
