//! Community routes

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
use crate::models::{AddAdminRequest, CreateCommunityRequest, CreateHouseRequest, UserResponse};
use crate::state::AppState;
use crate::validation::validate_name;

/// Create a community; the authenticated caller becomes its first admin
pub async fn create_community(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(creator)): Extension<AuthenticatedUser>,
    Json(payload): Json<CreateCommunityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_name(&payload.name).map_err(ApiError::BadRequest)?;
    validate_name(&payload.district).map_err(ApiError::BadRequest)?;

    let community = state
        .community_repository
        .create(&payload, creator)
        .await
        .map_err(|e| {
            error!("Failed to create community: {}", e);
            ApiError::InternalServerError
        })?;

    Ok((StatusCode::CREATED, Json(community)))
}

/// List all communities
pub async fn get_communities(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let communities = state.community_repository.list_all().await.map_err(|e| {
        error!("Failed to list communities: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(communities))
}

/// Get a community by ID
pub async fn get_community(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let community = state
        .community_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to get community: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(community))
}

/// Delete a community and everything it owns
pub async fn delete_community(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state
        .community_repository
        .delete_community(id)
        .await
        .map_err(|e| {
            error!("Failed to delete community: {}", e);
            ApiError::InternalServerError
        })?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

/// Add a user to a community's admin set
pub async fn add_admin(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddAdminRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let added = state
        .community_repository
        .add_admin(id, payload.user_id)
        .await
        .map_err(|e| {
            error!("Failed to add admin: {}", e);
            ApiError::InternalServerError
        })?;

    if added {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

/// List a community's admins
pub async fn get_admins(
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

    let admins = state.community_repository.list_admins(id).await.map_err(|e| {
        error!("Failed to list admins: {}", e);
        ApiError::InternalServerError
    })?;

    let admins: Vec<UserResponse> = admins.into_iter().map(UserResponse::from).collect();
    Ok(Json(admins))
}

/// Add a house to a community
pub async fn add_house(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateHouseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_name(&payload.name).map_err(ApiError::BadRequest)?;

    let house = state
        .community_repository
        .add_house(id, &payload.name)
        .await
        .map_err(|e| {
            error!("Failed to add house: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound)?;

    Ok((StatusCode::CREATED, Json(house)))
}

/// List a community's houses
pub async fn get_houses(
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

    let houses = state.community_repository.list_houses(id).await.map_err(|e| {
        error!("Failed to list houses: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(houses))
}

/// Remove a house from a community, detaching its members first
pub async fn remove_house(
    State(state): State<AppState>,
    Path((id, house_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let removed = state
        .community_repository
        .remove_house(id, house_id)
        .await
        .map_err(|e| {
            error!("Failed to remove house: {}", e);
            ApiError::InternalServerError
        })?;

    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}
