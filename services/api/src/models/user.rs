//! User model and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub email_confirmed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User shape returned by the API (never carries the password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub email_confirmed: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            email_confirmed: user.email_confirmed,
            created_at: user.created_at,
        }
    }
}

/// Signup payload
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Action discriminator for `POST /users/password`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PasswordAction {
    Forgot,
    Reset,
}

/// Payload for `POST /users/password`
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordActionRequest {
    pub action: PasswordAction,
    pub email: String,
    pub token: Option<String>,
    pub new_password: Option<String>,
}

/// Login payload
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response for a successful login
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub user_id: Uuid,
    pub token_type: String,
    pub expires_in: u64,
}

/// Ephemeral pairing of a session token with the authenticated user id.
///
/// Produced by login, consumed by the HTTP layer; never persisted.
#[derive(Debug, Clone)]
pub struct AuthenticationData {
    pub token: String,
    pub user_id: Uuid,
}
