//! Authentication routes

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::info;

use crate::error::AuthError;
use crate::models::{LoginRequest, TokenResponse};
use crate::state::AppState;

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AuthError> {
    info!("Login attempt for {}", payload.email);

    let auth = state
        .account_service
        .login(&payload.email, &payload.password)
        .await?;

    let response = TokenResponse {
        token: auth.token,
        user_id: auth.user_id,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt_service.session_token_expiry(),
    };

    Ok((StatusCode::OK, Json(response)))
}
