//! Common library for the Hearth application
//!
//! This crate provides shared infrastructure used by the Hearth services:
//! PostgreSQL connection pooling, migrations, and database error handling.

pub mod database;
pub mod error;
