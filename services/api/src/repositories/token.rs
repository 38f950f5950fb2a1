//! Security token repository
//!
//! Mints and consumes the single-use tokens guarding password reset and
//! email confirmation. Issuing a token invalidates any prior unused token of
//! the same kind for the same user, so at most one live token per kind per
//! user exists at any time.

use anyhow::Result;
use chrono::{Duration, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::models::{SecurityToken, TokenKind};

/// Token lifetime configuration
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Email-confirmation token lifetime in days
    pub email_confirm_token_days: i64,
    /// Password-reset token lifetime in days
    pub password_reset_token_days: i64,
}

impl TokenConfig {
    /// Create a new TokenConfig from environment variables
    ///
    /// # Environment Variables
    /// - `EMAIL_CONFIRM_TOKEN_DAYS`: confirmation token lifetime (default: 15)
    /// - `PASSWORD_RESET_TOKEN_DAYS`: reset token lifetime (default: 1)
    pub fn from_env() -> Result<Self> {
        let email_confirm_token_days = std::env::var("EMAIL_CONFIRM_TOKEN_DAYS")
            .unwrap_or_else(|_| "15".to_string())
            .parse()
            .unwrap_or(15);

        let password_reset_token_days = std::env::var("PASSWORD_RESET_TOKEN_DAYS")
            .unwrap_or_else(|_| "1".to_string())
            .parse()
            .unwrap_or(1);

        Ok(TokenConfig {
            email_confirm_token_days,
            password_reset_token_days,
        })
    }
}

/// Security token repository
#[derive(Clone)]
pub struct SecurityTokenRepository {
    pool: PgPool,
    config: TokenConfig,
}

impl SecurityTokenRepository {
    /// Create a new security token repository
    pub fn new(pool: PgPool, config: TokenConfig) -> Self {
        Self { pool, config }
    }

    /// Configured token lifetimes
    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    /// Issue a fresh email-confirmation token for a user
    pub async fn create_email_confirm_token(&self, user_id: Uuid) -> Result<SecurityToken> {
        self.issue_fresh(TokenKind::EmailConfirm, self.config.email_confirm_token_days, user_id)
            .await
    }

    /// Issue a fresh password-reset token for a user
    pub async fn create_password_reset_token(&self, user_id: Uuid) -> Result<SecurityToken> {
        self.issue_fresh(TokenKind::Reset, self.config.password_reset_token_days, user_id)
            .await
    }

    /// Issue a token of the given kind, invalidating any prior unused token
    /// of that kind for the user in the same transaction
    pub async fn issue_fresh(
        &self,
        kind: TokenKind,
        lifetime_days: i64,
        user_id: Uuid,
    ) -> Result<SecurityToken> {
        let mut tx = self.pool.begin().await?;
        let token = issue_fresh_in(&mut tx, kind, lifetime_days, user_id).await?;
        tx.commit().await?;
        Ok(token)
    }

    /// Mark a token used
    ///
    /// The conditional update is the replay guard: returns `true` only for
    /// the single caller that flips `used` from false to true.
    pub async fn use_token(&self, token_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE security_tokens SET used = TRUE
            WHERE id = $1 AND used = FALSE
            "#,
        )
        .bind(token_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Load a user's token collection
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<SecurityToken>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, token_type, token, created_on, expires_on, used
            FROM security_tokens
            WHERE user_id = $1
            ORDER BY created_on DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_token).collect()
    }
}

/// Invalidate any prior unused token of the given kind and insert a fresh
/// one, inside the caller's transaction
///
/// Callers that need the token row to commit together with another mutation
/// (user creation on signup) pass their own transaction; `issue_fresh` wraps
/// this in a transaction of its own.
pub(crate) async fn issue_fresh_in(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    kind: TokenKind,
    lifetime_days: i64,
    user_id: Uuid,
) -> Result<SecurityToken> {
    let today = Utc::now().date_naive();
    let expires_on = today + Duration::days(lifetime_days);
    let token = Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        DELETE FROM security_tokens
        WHERE user_id = $1 AND token_type = $2 AND used = FALSE
        "#,
    )
    .bind(user_id)
    .bind(kind.as_str())
    .execute(&mut **tx)
    .await?;

    let row = sqlx::query(
        r#"
        INSERT INTO security_tokens (user_id, token_type, token, created_on, expires_on, used)
        VALUES ($1, $2, $3, $4, $5, FALSE)
        RETURNING id, user_id, token_type, token, created_on, expires_on, used
        "#,
    )
    .bind(user_id)
    .bind(kind.as_str())
    .bind(&token)
    .bind(today)
    .bind(expires_on)
    .fetch_one(&mut **tx)
    .await?;

    info!("Issued {} token for user {}", kind.as_str(), user_id);
    map_token(&row)
}

/// Map a database row to a SecurityToken
pub(crate) fn map_token(row: &PgRow) -> Result<SecurityToken> {
    let type_str: String = row.get("token_type");
    let kind = TokenKind::parse(&type_str)
        .ok_or_else(|| anyhow::anyhow!("Unknown token type in database: {}", type_str))?;

    Ok(SecurityToken {
        id: row.get("id"),
        user_id: row.get("user_id"),
        kind,
        token: row.get("token"),
        created_on: row.get("created_on"),
        expires_on: row.get("expires_on"),
        used: row.get("used"),
    })
}
