//! Account flows: signup, login, password reset and email confirmation
//!
//! Each flow is a request/confirm pair around the security token issuer.
//! Database mutations commit first; the notification mail goes out after
//! commit, and a dispatch failure collapses the operation result to `false`
//! while leaving the committed state in place (the token stays valid, the
//! caller may retry the request).

use anyhow::Result;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AuthError;
use crate::jwt::JwtService;
use crate::mailer::{MailSender, confirm_link, templates};
use crate::models::{AuthenticationData, CreateUserRequest, User};
use crate::repositories::{SecurityTokenRepository, UserRepository};

/// Account service
#[derive(Clone)]
pub struct AccountService {
    users: UserRepository,
    tokens: SecurityTokenRepository,
    mailer: Arc<dyn MailSender>,
    jwt: JwtService,
    base_url: String,
}

impl AccountService {
    /// Create a new account service
    pub fn new(
        users: UserRepository,
        tokens: SecurityTokenRepository,
        mailer: Arc<dyn MailSender>,
        jwt: JwtService,
        base_url: String,
    ) -> Self {
        Self {
            users,
            tokens,
            mailer,
            jwt,
            base_url,
        }
    }

    /// Register a new account and send the confirmation mail
    ///
    /// Returns `None` when the email is already taken. The user row and the
    /// initial confirmation token commit in one transaction; the
    /// account-created mail is best-effort after commit, a dispatch failure
    /// is logged but does not undo the signup, because the confirmation
    /// token can be re-sent.
    pub async fn sign_up(&self, request: &CreateUserRequest) -> Result<Option<User>> {
        let Some((user, token)) = self
            .users
            .create_with_confirm_token(request, self.tokens.config().email_confirm_token_days)
            .await?
        else {
            return Ok(None);
        };

        let sent = self
            .mailer
            .send(
                &user.email,
                "Welcome to Hearth — confirm your email",
                templates::ACCOUNT_CREATED,
                &json!({
                    "name": user.name,
                    "confirm_link": confirm_link(&self.base_url, user.id, &token.token),
                }),
            )
            .await;

        if !sent {
            warn!("Account-created mail not dispatched for user {}", user.id);
        }

        Ok(Some(user))
    }

    /// Authenticate a login attempt and issue a session credential
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthenticationData, AuthError> {
        let Some(user) = self.users.find_by_email(email).await? else {
            return Err(AuthError::UserNotFound);
        };

        if !self.users.verify_password(&user, password) {
            return Err(AuthError::CredentialsIncorrect { user_id: user.id });
        }

        let token = self.jwt.encode_session(user.id)?;
        info!("User {} logged in", user.id);

        Ok(AuthenticationData {
            token,
            user_id: user.id,
        })
    }

    /// Request phase of the password-reset flow
    ///
    /// Unknown email is a silent `false`. Otherwise a fresh reset token is
    /// issued (invalidating any prior live one) and mailed as a recovery
    /// code; the result is the dispatch outcome.
    pub async fn request_reset_password(&self, email: &str) -> Result<bool> {
        let Some(user) = self.users.find_by_email(email).await? else {
            return Ok(false);
        };

        let token = self.tokens.create_password_reset_token(user.id).await?;

        let sent = self
            .mailer
            .send(
                &user.email,
                "Your Hearth password recovery code",
                templates::PASSWORD_RECOVER_CODE,
                &json!({
                    "name": user.name,
                    "recover_code": token.token,
                }),
            )
            .await;

        Ok(sent)
    }

    /// Confirm phase of the password-reset flow
    ///
    /// `true` iff the token was consumed, the password stored and the
    /// password-changed mail dispatched.
    pub async fn reset_password(&self, email: &str, token: &str, new_password: &str) -> Result<bool> {
        if !self.users.reset_password(email, token, new_password).await? {
            return Ok(false);
        }

        let sent = self
            .mailer
            .send(
                email,
                "Your Hearth password was changed",
                templates::PASSWORD_CHANGED,
                &json!({}),
            )
            .await;

        Ok(sent)
    }

    /// Confirm phase of the email-confirmation flow
    pub async fn confirm_email(&self, user_id: Uuid, token: &str) -> Result<bool> {
        if !self.users.confirm_email(user_id, token).await? {
            return Ok(false);
        }

        // Reload for the address; the user exists, confirm_email just updated it.
        let Some(user) = self.users.find_by_id(user_id).await? else {
            return Ok(false);
        };

        let sent = self
            .mailer
            .send(
                &user.email,
                "Your Hearth email is confirmed",
                templates::ACCOUNT_CONFIRMED,
                &json!({ "name": user.name }),
            )
            .await;

        Ok(sent)
    }

    /// Re-send the email-confirmation mail with a fresh token
    ///
    /// Unknown user or already-confirmed email is a `false` with no token
    /// issued and no mail sent.
    pub async fn resend_email_confirm(&self, user_id: Uuid) -> Result<bool> {
        let Some(user) = self.users.find_by_id(user_id).await? else {
            return Ok(false);
        };

        if user.email_confirmed {
            return Ok(false);
        }

        let token = self.tokens.create_email_confirm_token(user.id).await?;

        let sent = self
            .mailer
            .send(
                &user.email,
                "Confirm your Hearth email",
                templates::ACCOUNT_CREATED,
                &json!({
                    "name": user.name,
                    "confirm_link": confirm_link(&self.base_url, user.id, &token.token),
                }),
            )
            .await;

        Ok(sent)
    }
}
