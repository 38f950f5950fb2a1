//! Hearth API routes

use axum::{
    Json, Router, middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use serde_json::json;

use crate::middleware::auth_middleware;
use crate::state::AppState;

pub mod amenities;
pub mod auth;
pub mod communities;
pub mod houses;
pub mod payments;
pub mod users;

/// Create the router for the Hearth API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/users", get(users::get_users))
        .route("/users/:id", get(users::get_user))
        .route("/communities", post(communities::create_community))
        .route("/communities", get(communities::get_communities))
        .route("/communities/:id", get(communities::get_community))
        .route("/communities/:id", delete(communities::delete_community))
        .route("/communities/:id/admins", post(communities::add_admin))
        .route("/communities/:id/admins", get(communities::get_admins))
        .route("/communities/:id/houses", post(communities::add_house))
        .route("/communities/:id/houses", get(communities::get_houses))
        .route(
            "/communities/:id/houses/:house_id",
            delete(communities::remove_house),
        )
        .route(
            "/communities/:id/amenities",
            post(amenities::create_amenity),
        )
        .route("/communities/:id/amenities", get(amenities::get_amenities))
        .route(
            "/communities/:id/admins/:admin_id/payments",
            get(payments::get_admin_payments),
        )
        .route("/houses", get(houses::get_houses))
        .route("/houses/:id", get(houses::get_house))
        .route("/houses/:id/members", get(houses::get_members))
        .route("/houses/:id/members", post(houses::add_member))
        .route(
            "/houses/:id/members/:member_id",
            delete(houses::remove_member),
        )
        .route("/amenities/:id", get(amenities::get_amenity))
        .route("/amenities/:id", put(amenities::update_amenity))
        .route("/amenities/:id", delete(amenities::delete_amenity))
        .route("/amenities/:id/bookings", post(amenities::create_booking))
        .route(
            "/amenities/:id/bookings/:booking_id",
            delete(amenities::delete_booking),
        )
        .route("/payments", post(payments::schedule_payment))
        .route("/payments/:id", get(payments::get_payment))
        .route("/members/:member_id/payments", get(payments::get_member_payments))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/users", post(users::create_user))
        .route("/users/password", post(users::password_action))
        .route(
            "/users/:id/email-confirm/:token",
            get(users::confirm_email),
        )
        .route(
            "/users/:id/email-confirm-resend",
            get(users::resend_email_confirm),
        )
        .route("/auth/login", post(auth::login))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "hearth-api"
    }))
}
