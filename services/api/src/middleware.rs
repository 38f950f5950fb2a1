//! Middleware for session token validation

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::error;
use uuid::Uuid;

use crate::state::AppState;

/// Authenticated principal, inserted as a request extension and passed
/// explicitly to handlers that need the caller's identity
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub Uuid);

/// Extract and validate the session token from the Authorization header
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let claims = state.jwt_service.validate_token(token).map_err(|e| {
        error!("Failed to validate session token: {}", e);
        StatusCode::UNAUTHORIZED
    })?;

    req.extensions_mut().insert(AuthenticatedUser(claims.sub));

    Ok(next.run(req).await)
}
