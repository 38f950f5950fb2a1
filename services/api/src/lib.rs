//! Hearth API service library
//!
//! REST backend for residential-community management: user accounts,
//! authentication, communities, houses, house members, amenities, bookings,
//! payments and email notifications.

pub mod error;
pub mod jwt;
pub mod mailer;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod validation;

/// Embedded database migrations for the Hearth schema
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();
