//! Hearth API models

pub mod amenity;
pub mod community;
pub mod house;
pub mod payment;
pub mod token;
pub mod user;

// Re-export for convenience
pub use amenity::{Amenity, Booking, CreateAmenityRequest, CreateBookingRequest, UpdateAmenityRequest};
pub use community::{AddAdminRequest, Community, CreateCommunityRequest};
pub use house::{AddMemberRequest, CreateHouseRequest, House, HouseMember};
pub use payment::{Payment, SchedulePaymentRequest};
pub use token::{SecurityToken, TokenKind};
pub use user::{
    AuthenticationData, CreateUserRequest, LoginRequest, PasswordAction, PasswordActionRequest,
    TokenResponse, User, UserResponse,
};
