//! Community model and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Community entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Community {
    pub id: Uuid,
    pub name: String,
    pub district: String,
    pub created_at: DateTime<Utc>,
}

/// Community creation payload
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCommunityRequest {
    pub name: String,
    pub district: String,
}

/// Payload for adding an admin to a community
#[derive(Debug, Clone, Deserialize)]
pub struct AddAdminRequest {
    pub user_id: Uuid,
}
