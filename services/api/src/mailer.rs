//! Mail dispatch
//!
//! Notification emails are handed to an HTTP mail relay as a template name
//! plus a JSON model; rendering happens relay-side. Dispatch failures are
//! logged and collapsed to `false`, never propagated and never retried.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{error, info};
use uuid::Uuid;

/// Build the email-confirmation link embedded in account-created mail
pub fn confirm_link(base_url: &str, user_id: Uuid, token: &str) -> String {
    format!("{}/users/{}/email-confirm/{}", base_url, user_id, token)
}

/// Template names understood by the mail relay
pub mod templates {
    pub const PASSWORD_RECOVER_CODE: &str = "password-recover-code";
    pub const PASSWORD_CHANGED: &str = "password-changed";
    pub const ACCOUNT_CREATED: &str = "account-created";
    pub const ACCOUNT_CONFIRMED: &str = "account-confirmed";
}

/// Mailer configuration
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// HTTP endpoint of the mail relay
    pub relay_url: String,
    /// Sender address stamped on outgoing mail
    pub from_address: String,
    /// Public base URL of this service, used to build confirmation links
    pub base_url: String,
    /// Relay request timeout in seconds
    pub timeout: u64,
}

impl MailConfig {
    /// Create a new MailConfig from environment variables
    ///
    /// # Environment Variables
    /// - `MAIL_RELAY_URL`: HTTP endpoint of the mail relay (required)
    /// - `MAIL_FROM_ADDRESS`: sender address (default: "no-reply@hearth.local")
    /// - `APP_BASE_URL`: public base URL for links (default: "http://localhost:3000")
    /// - `MAIL_RELAY_TIMEOUT`: request timeout in seconds (default: 10)
    pub fn from_env() -> anyhow::Result<Self> {
        let relay_url = std::env::var("MAIL_RELAY_URL")
            .map_err(|_| anyhow::anyhow!("MAIL_RELAY_URL environment variable not set"))?;

        let from_address = std::env::var("MAIL_FROM_ADDRESS")
            .unwrap_or_else(|_| "no-reply@hearth.local".to_string());

        let base_url =
            std::env::var("APP_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

        let timeout = std::env::var("MAIL_RELAY_TIMEOUT")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .unwrap_or(10);

        Ok(MailConfig {
            relay_url,
            from_address,
            base_url,
            timeout,
        })
    }
}

/// Mail dispatcher contract
///
/// Returns `true` iff the message was accepted by the transport.
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, template: &str, model: &Value) -> bool;
}

/// Mail dispatcher posting messages to an HTTP mail relay
#[derive(Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    config: MailConfig,
}

impl HttpMailer {
    /// Create a new HTTP mailer
    pub fn new(config: MailConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl MailSender for HttpMailer {
    async fn send(&self, to: &str, subject: &str, template: &str, model: &Value) -> bool {
        let payload = json!({
            "from": self.config.from_address,
            "to": to,
            "subject": subject,
            "template": template,
            "model": model,
        });

        match self.client.post(&self.config.relay_url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {
                info!("Dispatched '{}' mail to {}", template, to);
                true
            }
            Ok(response) => {
                error!(
                    "Mail relay rejected '{}' mail to {}: {}",
                    template,
                    to,
                    response.status()
                );
                false
            }
            Err(e) => {
                error!("Failed to reach mail relay for '{}' mail to {}: {}", template, to, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_confirm_link_shape() {
        let user_id = Uuid::nil();
        let link = confirm_link("https://hearth.example.com", user_id, "tok-123");
        assert_eq!(
            link,
            "https://hearth.example.com/users/00000000-0000-0000-0000-000000000000/email-confirm/tok-123"
        );
    }

    #[test]
    #[serial]
    fn test_mail_config_requires_relay_url() {
        unsafe {
            std::env::remove_var("MAIL_RELAY_URL");
        }
        assert!(MailConfig::from_env().is_err());

        unsafe {
            std::env::set_var("MAIL_RELAY_URL", "http://relay.local/send");
            std::env::remove_var("MAIL_FROM_ADDRESS");
            std::env::remove_var("APP_BASE_URL");
            std::env::remove_var("MAIL_RELAY_TIMEOUT");
        }
        let config = MailConfig::from_env().unwrap();
        assert_eq!(config.relay_url, "http://relay.local/send");
        assert_eq!(config.from_address, "no-reply@hearth.local");
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.timeout, 10);

        unsafe {
            std::env::remove_var("MAIL_RELAY_URL");
        }
    }
}
