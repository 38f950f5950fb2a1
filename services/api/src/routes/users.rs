//! User account routes

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::error;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{CreateUserRequest, PasswordAction, PasswordActionRequest, UserResponse};
use crate::state::AppState;
use crate::validation::{validate_email, validate_name, validate_password};

/// Register a new user account
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_name(&payload.name).map_err(ApiError::BadRequest)?;
    validate_email(&payload.email).map_err(ApiError::BadRequest)?;
    validate_password(&payload.password).map_err(ApiError::BadRequest)?;

    let user = state
        .account_service
        .sign_up(&payload)
        .await
        .map_err(|e| {
            error!("Failed to create user: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::Conflict("Email already registered".to_string()))?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// List all users
pub async fn get_users(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let users = state.user_repository.list_all().await.map_err(|e| {
        error!("Failed to list users: {}", e);
        ApiError::InternalServerError
    })?;

    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(users))
}

/// Get a user by ID
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .user_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to get user: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(UserResponse::from(user)))
}

/// Password actions: `FORGOT` requests a reset token, `RESET` consumes one
pub async fn password_action(
    State(state): State<AppState>,
    Json(payload): Json<PasswordActionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_email(&payload.email).map_err(ApiError::BadRequest)?;

    let ok = match payload.action {
        PasswordAction::Forgot => state
            .account_service
            .request_reset_password(&payload.email)
            .await
            .map_err(|e| {
                error!("Password reset request failed: {}", e);
                ApiError::InternalServerError
            })?,
        PasswordAction::Reset => {
            let token = payload
                .token
                .as_deref()
                .ok_or_else(|| ApiError::BadRequest("Token is required".to_string()))?;
            let new_password = payload
                .new_password
                .as_deref()
                .ok_or_else(|| ApiError::BadRequest("New password is required".to_string()))?;
            validate_password(new_password).map_err(ApiError::BadRequest)?;

            state
                .account_service
                .reset_password(&payload.email, token, new_password)
                .await
                .map_err(|e| {
                    error!("Password reset failed: {}", e);
                    ApiError::InternalServerError
                })?
        }
    };

    if ok {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::BadRequest("Password action failed".to_string()))
    }
}

/// Confirm a user's email address with a confirmation token
pub async fn confirm_email(
    State(state): State<AppState>,
    Path((id, token)): Path<(Uuid, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let ok = state
        .account_service
        .confirm_email(id, &token)
        .await
        .map_err(|e| {
            error!("Email confirmation failed: {}", e);
            ApiError::InternalServerError
        })?;

    if ok {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::BadRequest("Email confirmation failed".to_string()))
    }
}

/// Re-send the email-confirmation mail with a fresh token
pub async fn resend_email_confirm(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let ok = state
        .account_service
        .resend_email_confirm(id)
        .await
        .map_err(|e| {
            error!("Confirmation resend failed: {}", e);
            ApiError::InternalServerError
        })?;

    if ok {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::BadRequest("Confirmation resend failed".to_string()))
    }
}
