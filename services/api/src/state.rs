//! Application state shared across handlers

use sqlx::PgPool;

use crate::jwt::JwtService;
use crate::repositories::{
    AmenityRepository, CommunityRepository, HouseRepository, PaymentRepository, UserRepository,
};
use crate::services::AccountService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_service: JwtService,
    pub account_service: AccountService,
    pub user_repository: UserRepository,
    pub community_repository: CommunityRepository,
    pub house_repository: HouseRepository,
    pub amenity_repository: AmenityRepository,
    pub payment_repository: PaymentRepository,
}
