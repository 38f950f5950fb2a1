//! Payment models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Scheduled payment entity, charged to a house member by a community admin
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub id: Uuid,
    pub charge_cents: i64,
    pub payment_type: String,
    pub description: String,
    pub recurring: bool,
    pub due_on: NaiveDate,
    pub admin_id: Uuid,
    pub member_id: Uuid,
}

/// Payment scheduling payload
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulePaymentRequest {
    pub charge_cents: i64,
    pub payment_type: String,
    pub description: Option<String>,
    pub recurring: Option<bool>,
    pub due_on: NaiveDate,
    pub admin_id: Uuid,
    pub member_id: Uuid,
}
