//! Shared helpers for the database-bound integration tests

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use api::MIGRATOR;
use api::jwt::{JwtConfig, JwtService};
use api::mailer::MailSender;
use api::repositories::{SecurityTokenRepository, TokenConfig, UserRepository};
use api::services::AccountService;
use common::database::{DatabaseConfig, init_pool, run_migrations};

/// A mail captured by the recording mailer
#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub template: String,
    pub model: Value,
}

/// Test double for the mail dispatcher: records every call and returns a
/// configured outcome
pub struct RecordingMailer {
    pub outcome: bool,
    pub sent: Mutex<Vec<SentMail>>,
}

impl RecordingMailer {
    pub fn new(outcome: bool) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn last_sent(&self) -> Option<SentMail> {
        self.sent.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl MailSender for RecordingMailer {
    async fn send(&self, to: &str, _subject: &str, template: &str, model: &Value) -> bool {
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            template: template.to_string(),
            model: model.clone(),
        });
        self.outcome
    }
}

/// Connect to the test database and apply migrations
pub async fn test_pool() -> PgPool {
    let config = DatabaseConfig::from_env().expect("database config");
    let pool = init_pool(&config).await.expect("database pool");
    run_migrations(&pool, &MIGRATOR).await.expect("migrations");
    pool
}

/// Token lifetimes used across the tests
pub fn token_config() -> TokenConfig {
    TokenConfig {
        email_confirm_token_days: 15,
        password_reset_token_days: 1,
    }
}

/// Build an account service wired to the given pool and mailer
pub fn account_service(pool: &PgPool, mailer: Arc<RecordingMailer>) -> AccountService {
    let jwt = JwtService::new(&JwtConfig {
        secret: "integration-test-secret".to_string(),
        session_token_expiry: 3600,
    });

    AccountService::new(
        UserRepository::new(pool.clone()),
        SecurityTokenRepository::new(pool.clone(), token_config()),
        mailer,
        jwt,
        "http://localhost:3000".to_string(),
    )
}

/// A unique email address per test run
pub fn unique_email(prefix: &str) -> String {
    format!("{}+{}@example.com", prefix, Uuid::new_v4())
}
