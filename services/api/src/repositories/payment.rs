//! Payment repository for database operations

use anyhow::Result;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::models::{Payment, SchedulePaymentRequest};

/// Payment repository
#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    /// Create a new payment repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Schedule a payment charged to a house member by an admin
    ///
    /// Returns `None` when the admin user or the house member does not exist.
    pub async fn schedule(&self, request: &SchedulePaymentRequest) -> Result<Option<Payment>> {
        let admin = sqlx::query("SELECT id FROM users WHERE id = $1")
            .bind(request.admin_id)
            .fetch_optional(&self.pool)
            .await?;
        if admin.is_none() {
            return Ok(None);
        }

        let member = sqlx::query("SELECT id FROM house_members WHERE id = $1")
            .bind(request.member_id)
            .fetch_optional(&self.pool)
            .await?;
        if member.is_none() {
            return Ok(None);
        }

        let row = sqlx::query(
            r#"
            INSERT INTO payments
                (charge_cents, payment_type, description, recurring, due_on, admin_id, member_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, charge_cents, payment_type, description, recurring, due_on,
                      admin_id, member_id
            "#,
        )
        .bind(request.charge_cents)
        .bind(&request.payment_type)
        .bind(request.description.as_deref().unwrap_or(""))
        .bind(request.recurring.unwrap_or(false))
        .bind(request.due_on)
        .bind(request.admin_id)
        .bind(request.member_id)
        .fetch_one(&self.pool)
        .await?;

        info!(
            "Scheduled payment for member {} by admin {}",
            request.member_id, request.admin_id
        );
        Ok(Some(map_payment(&row)))
    }

    /// Find a payment by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Payment>> {
        let row = sqlx::query(
            r#"
            SELECT id, charge_cents, payment_type, description, recurring, due_on,
                   admin_id, member_id
            FROM payments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_payment))
    }

    /// List payments charged to a house member
    pub async fn list_by_member(&self, member_id: Uuid) -> Result<Vec<Payment>> {
        let rows = sqlx::query(
            r#"
            SELECT id, charge_cents, payment_type, description, recurring, due_on,
                   admin_id, member_id
            FROM payments
            WHERE member_id = $1
            ORDER BY due_on
            "#,
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_payment).collect())
    }

    /// List payments scheduled by an admin of the given community
    ///
    /// Returns `None` when the user is not an admin of that community.
    pub async fn list_by_community_admin(
        &self,
        community_id: Uuid,
        admin_id: Uuid,
    ) -> Result<Option<Vec<Payment>>> {
        let membership = sqlx::query(
            "SELECT 1 AS ok FROM community_admins WHERE community_id = $1 AND user_id = $2",
        )
        .bind(community_id)
        .bind(admin_id)
        .fetch_optional(&self.pool)
        .await?;
        if membership.is_none() {
            return Ok(None);
        }

        let rows = sqlx::query(
            r#"
            SELECT id, charge_cents, payment_type, description, recurring, due_on,
                   admin_id, member_id
            FROM payments
            WHERE admin_id = $1
            ORDER BY due_on
            "#,
        )
        .bind(admin_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(rows.iter().map(map_payment).collect()))
    }
}

/// Map a database row to a Payment
fn map_payment(row: &PgRow) -> Payment {
    Payment {
        id: row.get("id"),
        charge_cents: row.get("charge_cents"),
        payment_type: row.get("payment_type"),
        description: row.get("description"),
        recurring: row.get("recurring"),
        due_on: row.get("due_on"),
        admin_id: row.get("admin_id"),
        member_id: row.get("member_id"),
    }
}
