//! House and house-member models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// House entity, owned by a community
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct House {
    pub id: Uuid,
    pub community_id: Uuid,
    pub name: String,
}

/// House creation payload
#[derive(Debug, Clone, Deserialize)]
pub struct CreateHouseRequest {
    pub name: String,
}

/// House member entity, owned by a house
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HouseMember {
    pub id: Uuid,
    pub house_id: Uuid,
    pub name: String,
}

/// Payload for adding a member to a house
#[derive(Debug, Clone, Deserialize)]
pub struct AddMemberRequest {
    pub name: String,
}
