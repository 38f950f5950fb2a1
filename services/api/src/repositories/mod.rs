//! Repositories for database operations

pub mod amenity;
pub mod community;
pub mod house;
pub mod payment;
pub mod token;
pub mod user;

pub use amenity::AmenityRepository;
pub use community::CommunityRepository;
pub use house::HouseRepository;
pub use payment::PaymentRepository;
pub use token::{SecurityTokenRepository, TokenConfig};
pub use user::UserRepository;
