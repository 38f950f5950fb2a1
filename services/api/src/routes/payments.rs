//! Payment routes

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::error;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::SchedulePaymentRequest;
use crate::state::AppState;

/// Schedule a payment charged to a house member
pub async fn schedule_payment(
    State(state): State<AppState>,
    Json(payload): Json<SchedulePaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.charge_cents <= 0 {
        return Err(ApiError::BadRequest("Charge must be positive".to_string()));
    }

    let payment = state
        .payment_repository
        .schedule(&payload)
        .await
        .map_err(|e| {
            error!("Failed to schedule payment: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound)?;

    Ok((StatusCode::CREATED, Json(payment)))
}

/// Get a payment by ID
pub async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let payment = state
        .payment_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to get payment: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(payment))
}

/// List payments charged to a house member
pub async fn get_member_payments(
    State(state): State<AppState>,
    Path(member_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let payments = state
        .payment_repository
        .list_by_member(member_id)
        .await
        .map_err(|e| {
            error!("Failed to list member payments: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(payments))
}

/// List payments scheduled by an admin of a community
pub async fn get_admin_payments(
    State(state): State<AppState>,
    Path((community_id, admin_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let payments = state
        .payment_repository
        .list_by_community_admin(community_id, admin_id)
        .await
        .map_err(|e| {
            error!("Failed to list admin payments: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(payments))
}
