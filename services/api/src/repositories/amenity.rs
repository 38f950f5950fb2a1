//! Amenity and booking repository for database operations

use anyhow::Result;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::models::{Amenity, Booking, CreateAmenityRequest, CreateBookingRequest, UpdateAmenityRequest};

/// Amenity repository
#[derive(Clone)]
pub struct AmenityRepository {
    pool: PgPool,
}

impl AmenityRepository {
    /// Create a new amenity repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an amenity in a community
    ///
    /// Returns `None` when the community does not exist.
    pub async fn create(
        &self,
        community_id: Uuid,
        request: &CreateAmenityRequest,
    ) -> Result<Option<Amenity>> {
        let community = sqlx::query("SELECT id FROM communities WHERE id = $1")
            .bind(community_id)
            .fetch_optional(&self.pool)
            .await?;
        if community.is_none() {
            return Ok(None);
        }

        let row = sqlx::query(
            r#"
            INSERT INTO amenities (community_id, name, description, price_cents)
            VALUES ($1, $2, $3, $4)
            RETURNING id, community_id, name, description, price_cents
            "#,
        )
        .bind(community_id)
        .bind(&request.name)
        .bind(request.description.as_deref().unwrap_or(""))
        .bind(request.price_cents)
        .fetch_one(&self.pool)
        .await?;

        info!("Created amenity in community {}", community_id);
        Ok(Some(map_amenity(&row)))
    }

    /// List a community's amenities
    pub async fn list_by_community(&self, community_id: Uuid) -> Result<Vec<Amenity>> {
        let rows = sqlx::query(
            r#"
            SELECT id, community_id, name, description, price_cents
            FROM amenities
            WHERE community_id = $1
            ORDER BY name
            "#,
        )
        .bind(community_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_amenity).collect())
    }

    /// Find an amenity by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Amenity>> {
        let row = sqlx::query(
            "SELECT id, community_id, name, description, price_cents FROM amenities WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_amenity))
    }

    /// Update an amenity, keeping unspecified fields
    ///
    /// Returns the updated amenity, or `None` when it does not exist.
    pub async fn update(&self, id: Uuid, request: &UpdateAmenityRequest) -> Result<Option<Amenity>> {
        let row = sqlx::query(
            r#"
            UPDATE amenities
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                price_cents = COALESCE($4, price_cents)
            WHERE id = $1
            RETURNING id, community_id, name, description, price_cents
            "#,
        )
        .bind(id)
        .bind(request.name.as_deref())
        .bind(request.description.as_deref())
        .bind(request.price_cents)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_amenity))
    }

    /// Delete an amenity (bookings go with it)
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM amenities WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Book an amenity for a user
    ///
    /// Returns `None` when the amenity does not exist.
    pub async fn add_booking(
        &self,
        amenity_id: Uuid,
        booking_user_id: Uuid,
        request: &CreateBookingRequest,
    ) -> Result<Option<Booking>> {
        let amenity = sqlx::query("SELECT id FROM amenities WHERE id = $1")
            .bind(amenity_id)
            .fetch_optional(&self.pool)
            .await?;
        if amenity.is_none() {
            return Ok(None);
        }

        let row = sqlx::query(
            r#"
            INSERT INTO amenity_bookings (amenity_id, booking_user_id, starts_at, ends_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, amenity_id, booking_user_id, starts_at, ends_at
            "#,
        )
        .bind(amenity_id)
        .bind(booking_user_id)
        .bind(request.starts_at)
        .bind(request.ends_at)
        .fetch_one(&self.pool)
        .await?;

        info!("Booked amenity {} for user {}", amenity_id, booking_user_id);
        Ok(Some(map_booking(&row)))
    }

    /// Delete a booking of an amenity
    pub async fn delete_booking(&self, amenity_id: Uuid, booking_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM amenity_bookings WHERE id = $1 AND amenity_id = $2")
            .bind(booking_id)
            .bind(amenity_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}

/// Map a database row to an Amenity
fn map_amenity(row: &PgRow) -> Amenity {
    Amenity {
        id: row.get("id"),
        community_id: row.get("community_id"),
        name: row.get("name"),
        description: row.get("description"),
        price_cents: row.get("price_cents"),
    }
}

/// Map a database row to a Booking
fn map_booking(row: &PgRow) -> Booking {
    Booking {
        id: row.get("id"),
        amenity_id: row.get("amenity_id"),
        booking_user_id: row.get("booking_user_id"),
        starts_at: row.get("starts_at"),
        ends_at: row.get("ends_at"),
    }
}
