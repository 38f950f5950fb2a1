//! Integration tests for the infrastructure components
//!
//! These tests verify that the PostgreSQL database is properly configured
//! and accessible from the application. They require a provisioned database
//! and are therefore ignored by default; run them with `cargo test -- --ignored`
//! once `DATABASE_URL` points at a live instance.

use common::database::{health_check, init_pool, DatabaseConfig};
use sqlx::Row;

/// Verify that PostgreSQL is reachable and can answer a trivial query
#[tokio::test]
#[ignore = "requires a provisioned PostgreSQL instance"]
async fn test_database_connectivity() -> Result<(), Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    assert!(health_check(&pool).await?, "Database health check failed");

    let row = sqlx::query("SELECT 1 as result").fetch_one(&pool).await?;
    let result: i32 = row.get("result");
    assert_eq!(result, 1, "PostgreSQL simple query test failed");

    Ok(())
}
