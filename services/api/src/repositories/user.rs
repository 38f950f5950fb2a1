//! User repository for database operations
//!
//! Besides plain lookups this repository owns the two guarded mutations of a
//! user record: consuming a reset token to store a new password and consuming
//! a confirmation token to mark the email confirmed. Each runs as a single
//! transaction so a token is never burned without its guarded mutation.

use anyhow::Result;
use chrono::Utc;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::models::{CreateUserRequest, SecurityToken, TokenKind, User};
use crate::password;
use crate::repositories::token::{issue_fresh_in, map_token};

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user with a hashed password
    ///
    /// Returns `None` when the email is already taken. The `users.email`
    /// unique constraint is the arbiter: no pre-check, so two concurrent
    /// signups with the same address race on the index and exactly one wins.
    pub async fn create(&self, request: &CreateUserRequest) -> Result<Option<User>> {
        info!("Creating new user: {}", request.email);

        let password_hash = password::hash(&request.password)?;

        let row = match sqlx::query(
            r#"
            INSERT INTO users (email, name, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, name, password_hash, email_confirmed, created_at, updated_at
            "#,
        )
        .bind(&request.email)
        .bind(&request.name)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await
        {
            Ok(row) => row,
            Err(e) if is_unique_violation(&e) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        Ok(Some(map_user(&row)))
    }

    /// Create a new user together with their initial email-confirmation
    /// token, committing both in one transaction
    ///
    /// Returns `None` when the email is already taken. Either the user row
    /// and the token row both become durable or neither does, so a freshly
    /// registered account always has a live confirmation token.
    pub async fn create_with_confirm_token(
        &self,
        request: &CreateUserRequest,
        confirm_token_days: i64,
    ) -> Result<Option<(User, SecurityToken)>> {
        info!("Creating new user: {}", request.email);

        let password_hash = password::hash(&request.password)?;

        let mut tx = self.pool.begin().await?;

        let row = match sqlx::query(
            r#"
            INSERT INTO users (email, name, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, name, password_hash, email_confirmed, created_at, updated_at
            "#,
        )
        .bind(&request.email)
        .bind(&request.name)
        .bind(&password_hash)
        .fetch_one(&mut *tx)
        .await
        {
            Ok(row) => row,
            Err(e) if is_unique_violation(&e) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let user = map_user(&row);

        let token =
            issue_fresh_in(&mut tx, TokenKind::EmailConfirm, confirm_token_days, user.id).await?;

        tx.commit().await?;

        Ok(Some((user, token)))
    }

    /// Find a user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, email, name, password_hash, email_confirmed, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_user))
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, email, name, password_hash, email_confirmed, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_user))
    }

    /// List all users
    pub async fn list_all(&self) -> Result<Vec<User>> {
        let rows = sqlx::query(
            r#"
            SELECT id, email, name, password_hash, email_confirmed, created_at, updated_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_user).collect())
    }

    /// Verify a user's password against the stored hash
    pub fn verify_password(&self, user: &User, plaintext: &str) -> bool {
        password::verify(plaintext, &user.password_hash)
    }

    /// Consume a reset token and store the re-hashed password
    ///
    /// Runs as one transaction: the token scan, the single-use flip and the
    /// password update either all commit or none do. Returns `false` on
    /// unknown email, no usable token, or a lost race on the `used` flag.
    pub async fn reset_password(&self, email: &str, token: &str, new_password: &str) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let Some(user_row) = sqlx::query("SELECT id FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(false);
        };
        let user_id: Uuid = user_row.get("id");

        let Some(token_id) = find_usable_token(&mut tx, user_id, TokenKind::Reset, token).await?
        else {
            return Ok(false);
        };

        if !consume_token(&mut tx, token_id).await? {
            return Ok(false);
        }

        let password_hash = password::hash(new_password)?;
        sqlx::query("UPDATE users SET password_hash = $1, updated_at = now() WHERE id = $2")
            .bind(&password_hash)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!("Password reset for user {}", user_id);
        Ok(true)
    }

    /// Consume a confirmation token and mark the user's email confirmed
    ///
    /// Same transaction shape as `reset_password`. An already-confirmed user
    /// short-circuits to `false` without touching any token.
    pub async fn confirm_email(&self, user_id: Uuid, token: &str) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let Some(user_row) = sqlx::query("SELECT email_confirmed FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(false);
        };

        let email_confirmed: bool = user_row.get("email_confirmed");
        if email_confirmed {
            return Ok(false);
        }

        let Some(token_id) =
            find_usable_token(&mut tx, user_id, TokenKind::EmailConfirm, token).await?
        else {
            return Ok(false);
        };

        if !consume_token(&mut tx, token_id).await? {
            return Ok(false);
        }

        sqlx::query("UPDATE users SET email_confirmed = TRUE, updated_at = now() WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!("Email confirmed for user {}", user_id);
        Ok(true)
    }
}

/// Scan the user's token collection for one satisfying the confirm-phase
/// predicate, inside the caller's transaction
async fn find_usable_token(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    user_id: Uuid,
    kind: TokenKind,
    presented: &str,
) -> Result<Option<Uuid>> {
    let rows = sqlx::query(
        r#"
        SELECT id, user_id, token_type, token, created_on, expires_on, used
        FROM security_tokens
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_all(&mut **tx)
    .await?;

    let today = Utc::now().date_naive();
    for row in &rows {
        let candidate = map_token(row)?;
        if candidate.is_usable(kind, presented, today) {
            return Ok(Some(candidate.id));
        }
    }

    Ok(None)
}

/// Flip the `used` flag, reporting whether this caller won the flip
async fn consume_token(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    token_id: Uuid,
) -> Result<bool> {
    let result = sqlx::query("UPDATE security_tokens SET used = TRUE WHERE id = $1 AND used = FALSE")
        .bind(token_id)
        .execute(&mut **tx)
        .await?;

    Ok(result.rows_affected() == 1)
}

/// Unique-constraint violation (PostgreSQL error 23505)
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

/// Map a database row to a User
pub(crate) fn map_user(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        name: row.get("name"),
        password_hash: row.get("password_hash"),
        email_confirmed: row.get("email_confirmed"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
