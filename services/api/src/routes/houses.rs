//! House routes

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::error;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::AddMemberRequest;
use crate::state::AppState;
use crate::validation::validate_name;

/// List all houses
pub async fn get_houses(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let houses = state.house_repository.list_all().await.map_err(|e| {
        error!("Failed to list houses: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(houses))
}

/// Get a house by ID
pub async fn get_house(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let house = state
        .house_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to get house: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(house))
}

/// List a house's members
pub async fn get_members(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .house_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to get house: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound)?;

    let members = state.house_repository.list_members(id).await.map_err(|e| {
        error!("Failed to list members: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(members))
}

/// Add a member to a house
pub async fn add_member(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddMemberRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_name(&payload.name).map_err(ApiError::BadRequest)?;

    let member = state
        .house_repository
        .add_member(id, &payload.name)
        .await
        .map_err(|e| {
            error!("Failed to add member: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound)?;

    Ok((StatusCode::CREATED, Json(member)))
}

/// Remove a member from a house
pub async fn remove_member(
    State(state): State<AppState>,
    Path((id, member_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let removed = state
        .house_repository
        .remove_member(id, member_id)
        .await
        .map_err(|e| {
            error!("Failed to remove member: {}", e);
            ApiError::InternalServerError
        })?;

    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}
