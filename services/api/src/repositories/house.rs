//! House repository for database operations

use anyhow::Result;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::models::{House, HouseMember};
use crate::repositories::community::map_house;

/// House repository
#[derive(Clone)]
pub struct HouseRepository {
    pool: PgPool,
}

impl HouseRepository {
    /// Create a new house repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all houses
    pub async fn list_all(&self) -> Result<Vec<House>> {
        let rows = sqlx::query("SELECT id, community_id, name FROM houses ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(map_house).collect())
    }

    /// Find a house by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<House>> {
        let row = sqlx::query("SELECT id, community_id, name FROM houses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(map_house))
    }

    /// List a house's members
    pub async fn list_members(&self, house_id: Uuid) -> Result<Vec<HouseMember>> {
        let rows = sqlx::query("SELECT id, house_id, name FROM house_members WHERE house_id = $1")
            .bind(house_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(map_member).collect())
    }

    /// Add a member to a house
    ///
    /// Returns `None` when the house does not exist.
    pub async fn add_member(&self, house_id: Uuid, name: &str) -> Result<Option<HouseMember>> {
        let house = sqlx::query("SELECT id FROM houses WHERE id = $1")
            .bind(house_id)
            .fetch_optional(&self.pool)
            .await?;
        if house.is_none() {
            return Ok(None);
        }

        let row = sqlx::query(
            r#"
            INSERT INTO house_members (house_id, name)
            VALUES ($1, $2)
            RETURNING id, house_id, name
            "#,
        )
        .bind(house_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        info!("Added member to house {}", house_id);
        Ok(Some(map_member(&row)))
    }

    /// Remove a member from a house
    ///
    /// Returns `false` when no such member is attached to that house.
    pub async fn remove_member(&self, house_id: Uuid, member_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM house_members WHERE id = $1 AND house_id = $2")
            .bind(member_id)
            .bind(house_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}

/// Map a database row to a HouseMember
fn map_member(row: &PgRow) -> HouseMember {
    HouseMember {
        id: row.get("id"),
        house_id: row.get("house_id"),
        name: row.get("name"),
    }
}
