//! Amenity and booking routes

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::error;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::AuthenticatedUser;
use crate::models::{CreateAmenityRequest, CreateBookingRequest, UpdateAmenityRequest};
use crate::state::AppState;
use crate::validation::validate_name;

/// Create an amenity in a community
pub async fn create_amenity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateAmenityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_name(&payload.name).map_err(ApiError::BadRequest)?;

    let amenity = state
        .amenity_repository
        .create(id, &payload)
        .await
        .map_err(|e| {
            error!("Failed to create amenity: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound)?;

    Ok((StatusCode::CREATED, Json(amenity)))
}

/// List a community's amenities
pub async fn get_amenities(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .community_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to get community: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound)?;

    let amenities = state
        .amenity_repository
        .list_by_community(id)
        .await
        .map_err(|e| {
            error!("Failed to list amenities: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(amenities))
}

/// Get an amenity by ID
pub async fn get_amenity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let amenity = state
        .amenity_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to get amenity: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(amenity))
}

/// Update an amenity
pub async fn update_amenity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAmenityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let amenity = state
        .amenity_repository
        .update(id, &payload)
        .await
        .map_err(|e| {
            error!("Failed to update amenity: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(amenity))
}

/// Delete an amenity
pub async fn delete_amenity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state.amenity_repository.delete(id).await.map_err(|e| {
        error!("Failed to delete amenity: {}", e);
        ApiError::InternalServerError
    })?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

/// Book an amenity for the authenticated user
pub async fn create_booking(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.ends_at <= payload.starts_at {
        return Err(ApiError::BadRequest(
            "Booking must end after it starts".to_string(),
        ));
    }

    let booking = state
        .amenity_repository
        .add_booking(id, user_id, &payload)
        .await
        .map_err(|e| {
            error!("Failed to create booking: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound)?;

    Ok((StatusCode::CREATED, Json(booking)))
}

/// Delete a booking of an amenity
pub async fn delete_booking(
    State(state): State<AppState>,
    Path((id, booking_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state
        .amenity_repository
        .delete_booking(id, booking_id)
        .await
        .map_err(|e| {
            error!("Failed to delete booking: {}", e);
            ApiError::InternalServerError
        })?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}
