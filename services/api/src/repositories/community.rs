//! Community repository for database operations
//!
//! Owns the community aggregate: the admin set, the houses and, through
//! them, the house members. Deletion cascades bottom-up inside a single
//! transaction so no partially-deleted aggregate is ever observable.

use anyhow::Result;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::models::{Community, CreateCommunityRequest, House, User};
use crate::repositories::user::map_user;

/// Community repository
#[derive(Clone)]
pub struct CommunityRepository {
    pool: PgPool,
}

impl CommunityRepository {
    /// Create a new community repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a community with the creator as its first admin
    pub async fn create(&self, request: &CreateCommunityRequest, creator: Uuid) -> Result<Community> {
        info!("Creating community '{}' for user {}", request.name, creator);

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            INSERT INTO communities (name, district)
            VALUES ($1, $2)
            RETURNING id, name, district, created_at
            "#,
        )
        .bind(&request.name)
        .bind(&request.district)
        .fetch_one(&mut *tx)
        .await?;

        let community = map_community(&row);

        sqlx::query("INSERT INTO community_admins (community_id, user_id) VALUES ($1, $2)")
            .bind(community.id)
            .bind(creator)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(community)
    }

    /// List all communities
    pub async fn list_all(&self) -> Result<Vec<Community>> {
        let rows = sqlx::query(
            "SELECT id, name, district, created_at FROM communities ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_community).collect())
    }

    /// Find a community by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Community>> {
        let row = sqlx::query("SELECT id, name, district, created_at FROM communities WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(map_community))
    }

    /// Add a user to a community's admin set
    ///
    /// Returns `false` when either the community or the user does not exist.
    /// Re-adding an existing admin is a no-op that still reports `true`.
    pub async fn add_admin(&self, community_id: Uuid, user_id: Uuid) -> Result<bool> {
        let community = sqlx::query("SELECT id FROM communities WHERE id = $1")
            .bind(community_id)
            .fetch_optional(&self.pool)
            .await?;
        if community.is_none() {
            return Ok(false);
        }

        let user = sqlx::query("SELECT id FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        if user.is_none() {
            return Ok(false);
        }

        sqlx::query(
            r#"
            INSERT INTO community_admins (community_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(community_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(true)
    }

    /// List a community's admins
    pub async fn list_admins(&self, community_id: Uuid) -> Result<Vec<User>> {
        let rows = sqlx::query(
            r#"
            SELECT u.id, u.email, u.name, u.password_hash, u.email_confirmed,
                   u.created_at, u.updated_at
            FROM users u
            JOIN community_admins ca ON ca.user_id = u.id
            WHERE ca.community_id = $1
            ORDER BY u.name
            "#,
        )
        .bind(community_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_user).collect())
    }

    /// Add a house to a community
    ///
    /// Returns `None` when the community does not exist.
    pub async fn add_house(&self, community_id: Uuid, name: &str) -> Result<Option<House>> {
        let community = sqlx::query("SELECT id FROM communities WHERE id = $1")
            .bind(community_id)
            .fetch_optional(&self.pool)
            .await?;
        if community.is_none() {
            return Ok(None);
        }

        let row = sqlx::query(
            r#"
            INSERT INTO houses (community_id, name)
            VALUES ($1, $2)
            RETURNING id, community_id, name
            "#,
        )
        .bind(community_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(Some(map_house(&row)))
    }

    /// List a community's houses
    pub async fn list_houses(&self, community_id: Uuid) -> Result<Vec<House>> {
        let rows = sqlx::query("SELECT id, community_id, name FROM houses WHERE community_id = $1")
            .bind(community_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(map_house).collect())
    }

    /// Delete a community and everything it transitively owns
    ///
    /// One transaction: members of every house, the houses, the admin links,
    /// then the community row. Unknown id is a silent `false` with nothing
    /// touched.
    pub async fn delete_community(&self, id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let community = sqlx::query("SELECT id FROM communities WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if community.is_none() {
            return Ok(false);
        }

        // Snapshot the owned house ids before mutating anything.
        let house_rows = sqlx::query("SELECT id FROM houses WHERE community_id = $1")
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;
        let house_ids: Vec<Uuid> = house_rows.iter().map(|row| row.get("id")).collect();

        for house_id in house_ids {
            delete_house(&mut tx, house_id).await?;
        }

        sqlx::query("DELETE FROM community_admins WHERE community_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM communities WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!("Deleted community {}", id);
        Ok(true)
    }

    /// Remove a house from a community, detaching its members first
    ///
    /// Returns `false` when the house does not exist or belongs to a
    /// different community. Holds for any member count, including zero.
    pub async fn remove_house(&self, community_id: Uuid, house_id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let house = sqlx::query("SELECT id FROM houses WHERE id = $1 AND community_id = $2 FOR UPDATE")
            .bind(house_id)
            .bind(community_id)
            .fetch_optional(&mut *tx)
            .await?;
        if house.is_none() {
            return Ok(false);
        }

        delete_house(&mut tx, house_id).await?;

        tx.commit().await?;

        info!("Removed house {} from community {}", house_id, community_id);
        Ok(true)
    }
}

/// Delete a house and its members inside the caller's transaction,
/// members first
async fn delete_house(tx: &mut sqlx::Transaction<'_, sqlx::Postgres>, house_id: Uuid) -> Result<()> {
    sqlx::query("DELETE FROM house_members WHERE house_id = $1")
        .bind(house_id)
        .execute(&mut **tx)
        .await?;

    sqlx::query("DELETE FROM houses WHERE id = $1")
        .bind(house_id)
        .execute(&mut **tx)
        .await?;

    Ok(())
}

/// Map a database row to a Community
fn map_community(row: &PgRow) -> Community {
    Community {
        id: row.get("id"),
        name: row.get("name"),
        district: row.get("district"),
        created_at: row.get("created_at"),
    }
}

/// Map a database row to a House
pub(crate) fn map_house(row: &PgRow) -> House {
    House {
        id: row.get("id"),
        community_id: row.get("community_id"),
        name: row.get("name"),
    }
}
