//! Amenity and booking models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Amenity entity, owned by a community
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Amenity {
    pub id: Uuid,
    pub community_id: Uuid,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
}

/// Amenity creation payload
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAmenityRequest {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
}

/// Amenity update payload
#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateAmenityRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
}

/// Amenity booking entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub amenity_id: Uuid,
    pub booking_user_id: Uuid,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

/// Booking creation payload
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingRequest {
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}
