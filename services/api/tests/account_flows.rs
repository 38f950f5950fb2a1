//! Integration tests for the signup, login, password-reset and
//! email-confirmation flows
//!
//! These tests need a provisioned PostgreSQL pointed at by `DATABASE_URL`
//! and are ignored by default; run them with `cargo test -- --ignored`.

mod support;

use chrono::{Duration, Utc};

use api::error::AuthError;
use api::models::{CreateUserRequest, TokenKind};
use api::repositories::{SecurityTokenRepository, UserRepository};
use support::{RecordingMailer, account_service, test_pool, token_config, unique_email};

fn signup_request(email: &str) -> CreateUserRequest {
    CreateUserRequest {
        name: "Test Resident".to_string(),
        email: email.to_string(),
        password: "original-password".to_string(),
    }
}

#[tokio::test]
#[ignore = "requires a provisioned PostgreSQL instance"]
async fn signup_commits_the_user_and_confirmation_token_together() {
    let pool = test_pool().await;
    let mailer = RecordingMailer::new(true);
    let service = account_service(&pool, mailer.clone());
    let tokens = SecurityTokenRepository::new(pool.clone(), token_config());

    let email = unique_email("signup");
    let user = service
        .sign_up(&signup_request(&email))
        .await
        .unwrap()
        .expect("signup");

    // The registration commit carries the initial confirmation token.
    let confirm_tokens: Vec<_> = tokens
        .list_for_user(user.id)
        .await
        .unwrap()
        .into_iter()
        .filter(|t| t.kind == TokenKind::EmailConfirm && !t.used)
        .collect();
    assert_eq!(confirm_tokens.len(), 1);

    let token = &confirm_tokens[0];
    assert_eq!(
        token.expires_on,
        Utc::now().date_naive() + Duration::days(token_config().email_confirm_token_days)
    );

    let mail = mailer.last_sent().expect("account-created mail");
    assert_eq!(mail.to, email);
    assert_eq!(mail.template, "account-created");
    let link = mail.model["confirm_link"].as_str().unwrap();
    assert!(link.ends_with(&format!("/users/{}/email-confirm/{}", user.id, token.token)));
}

#[tokio::test]
#[ignore = "requires a provisioned PostgreSQL instance"]
async fn duplicate_signup_is_a_conflict_not_an_error() {
    let pool = test_pool().await;
    let mailer = RecordingMailer::new(true);
    let service = account_service(&pool, mailer.clone());
    let users = UserRepository::new(pool.clone());
    let tokens = SecurityTokenRepository::new(pool.clone(), token_config());

    let email = unique_email("duplicate");
    let user = service
        .sign_up(&signup_request(&email))
        .await
        .unwrap()
        .expect("first signup");
    let tokens_before = tokens.list_for_user(user.id).await.unwrap().len();

    // The unique index on users.email arbitrates; the loser gets the
    // conflict outcome rather than a database error.
    let second = service.sign_up(&signup_request(&email)).await.unwrap();
    assert!(second.is_none());

    let direct = users.create(&signup_request(&email)).await.unwrap();
    assert!(direct.is_none());

    // The winner's account is untouched by the failed attempts.
    assert_eq!(tokens.list_for_user(user.id).await.unwrap().len(), tokens_before);
    let stored = users.find_by_email(&email).await.unwrap().unwrap();
    assert_eq!(stored.id, user.id);
}

#[tokio::test]
#[ignore = "requires a provisioned PostgreSQL instance"]
async fn reset_request_creates_token_and_mails_the_code() {
    let pool = test_pool().await;
    let mailer = RecordingMailer::new(true);
    let service = account_service(&pool, mailer.clone());
    let tokens = SecurityTokenRepository::new(pool.clone(), token_config());

    let email = unique_email("reset-request");
    let user = service
        .sign_up(&signup_request(&email))
        .await
        .unwrap()
        .expect("signup");

    assert!(service.request_reset_password(&email).await.unwrap());

    let reset_tokens: Vec<_> = tokens
        .list_for_user(user.id)
        .await
        .unwrap()
        .into_iter()
        .filter(|t| t.kind == TokenKind::Reset)
        .collect();
    assert_eq!(reset_tokens.len(), 1);

    let token = &reset_tokens[0];
    assert!(!token.used);
    assert_eq!(
        token.expires_on,
        Utc::now().date_naive() + Duration::days(token_config().password_reset_token_days)
    );

    // The raw token string travels in the recovery-code mail.
    let mail = mailer.last_sent().expect("a mail was dispatched");
    assert_eq!(mail.to, email);
    assert_eq!(mail.template, "password-recover-code");
    assert_eq!(mail.model["recover_code"], token.token.as_str());
}

#[tokio::test]
#[ignore = "requires a provisioned PostgreSQL instance"]
async fn reset_request_for_unknown_email_is_a_silent_false() {
    let pool = test_pool().await;
    let mailer = RecordingMailer::new(true);
    let service = account_service(&pool, mailer.clone());

    assert!(!service
        .request_reset_password(&unique_email("nobody"))
        .await
        .unwrap());
    assert_eq!(mailer.sent_count(), 0);
}

#[tokio::test]
#[ignore = "requires a provisioned PostgreSQL instance"]
async fn reset_token_is_single_use() {
    let pool = test_pool().await;
    let mailer = RecordingMailer::new(true);
    let service = account_service(&pool, mailer.clone());
    let users = UserRepository::new(pool.clone());
    let tokens = SecurityTokenRepository::new(pool.clone(), token_config());

    let email = unique_email("reset-flow");
    let user = service
        .sign_up(&signup_request(&email))
        .await
        .unwrap()
        .expect("signup");

    assert!(service.request_reset_password(&email).await.unwrap());
    let token = tokens
        .list_for_user(user.id)
        .await
        .unwrap()
        .into_iter()
        .find(|t| t.kind == TokenKind::Reset && !t.used)
        .expect("live reset token");

    assert!(service
        .reset_password(&email, &token.token, "brand-new-password")
        .await
        .unwrap());

    // New password in effect, old one rejected.
    let user = users.find_by_email(&email).await.unwrap().unwrap();
    assert!(users.verify_password(&user, "brand-new-password"));
    assert!(!users.verify_password(&user, "original-password"));

    // Consumed token can never satisfy the predicate again.
    assert!(!service
        .reset_password(&email, &token.token, "yet-another-password")
        .await
        .unwrap());
}

#[tokio::test]
#[ignore = "requires a provisioned PostgreSQL instance"]
async fn marking_a_token_used_is_a_one_way_transition() {
    let pool = test_pool().await;
    let mailer = RecordingMailer::new(true);
    let service = account_service(&pool, mailer.clone());
    let tokens = SecurityTokenRepository::new(pool.clone(), token_config());

    let email = unique_email("use-token");
    let user = service
        .sign_up(&signup_request(&email))
        .await
        .unwrap()
        .expect("signup");

    let token = tokens.create_password_reset_token(user.id).await.unwrap();
    assert!(!token.used);

    // Only the first consumer wins the used flip.
    assert!(tokens.use_token(token.id).await.unwrap());
    assert!(!tokens.use_token(token.id).await.unwrap());

    let stored = tokens
        .list_for_user(user.id)
        .await
        .unwrap()
        .into_iter()
        .find(|t| t.id == token.id)
        .unwrap();
    assert!(stored.used);
}

#[tokio::test]
#[ignore = "requires a provisioned PostgreSQL instance"]
async fn issuing_a_reset_token_invalidates_the_previous_one() {
    let pool = test_pool().await;
    let mailer = RecordingMailer::new(true);
    let service = account_service(&pool, mailer.clone());
    let tokens = SecurityTokenRepository::new(pool.clone(), token_config());

    let email = unique_email("reissue");
    let user = service
        .sign_up(&signup_request(&email))
        .await
        .unwrap()
        .expect("signup");

    assert!(service.request_reset_password(&email).await.unwrap());
    assert!(service.request_reset_password(&email).await.unwrap());

    let live: Vec<_> = tokens
        .list_for_user(user.id)
        .await
        .unwrap()
        .into_iter()
        .filter(|t| t.kind == TokenKind::Reset && !t.used)
        .collect();
    assert_eq!(live.len(), 1, "at most one live reset token per user");
}

#[tokio::test]
#[ignore = "requires a provisioned PostgreSQL instance"]
async fn email_confirmation_is_idempotent_in_the_failing_direction() {
    let pool = test_pool().await;
    let mailer = RecordingMailer::new(true);
    let service = account_service(&pool, mailer.clone());
    let users = UserRepository::new(pool.clone());
    let tokens = SecurityTokenRepository::new(pool.clone(), token_config());

    let email = unique_email("confirm");
    let user = service
        .sign_up(&signup_request(&email))
        .await
        .unwrap()
        .expect("signup");

    let token = tokens
        .list_for_user(user.id)
        .await
        .unwrap()
        .into_iter()
        .find(|t| t.kind == TokenKind::EmailConfirm && !t.used)
        .expect("confirmation token issued on signup");

    assert!(service.confirm_email(user.id, &token.token).await.unwrap());
    let user = users.find_by_id(user.id).await.unwrap().unwrap();
    assert!(user.email_confirmed);

    // Second confirmation with the same token fails: token already used.
    assert!(!service.confirm_email(user.id, &token.token).await.unwrap());
}

#[tokio::test]
#[ignore = "requires a provisioned PostgreSQL instance"]
async fn resend_confirm_for_a_confirmed_user_is_a_noop() {
    let pool = test_pool().await;
    let mailer = RecordingMailer::new(true);
    let service = account_service(&pool, mailer.clone());
    let tokens = SecurityTokenRepository::new(pool.clone(), token_config());

    let email = unique_email("resend");
    let user = service
        .sign_up(&signup_request(&email))
        .await
        .unwrap()
        .expect("signup");

    let token = tokens
        .list_for_user(user.id)
        .await
        .unwrap()
        .into_iter()
        .find(|t| t.kind == TokenKind::EmailConfirm && !t.used)
        .unwrap();
    assert!(service.confirm_email(user.id, &token.token).await.unwrap());

    let tokens_before = tokens.list_for_user(user.id).await.unwrap().len();
    let mails_before = mailer.sent_count();

    assert!(!service.resend_email_confirm(user.id).await.unwrap());

    assert_eq!(tokens.list_for_user(user.id).await.unwrap().len(), tokens_before);
    assert_eq!(mailer.sent_count(), mails_before);
}

#[tokio::test]
#[ignore = "requires a provisioned PostgreSQL instance"]
async fn reset_request_reports_mail_dispatch_failure() {
    let pool = test_pool().await;
    let mailer = RecordingMailer::new(false);
    let service = account_service(&pool, mailer.clone());

    let email = unique_email("mail-down");
    service
        .sign_up(&signup_request(&email))
        .await
        .unwrap()
        .expect("signup");

    // Token issuance commits, but the overall operation reports the
    // dispatch failure.
    assert!(!service.request_reset_password(&email).await.unwrap());
    assert!(mailer.sent_count() > 0);
}

#[tokio::test]
#[ignore = "requires a provisioned PostgreSQL instance"]
async fn login_distinguishes_failure_causes_internally() {
    let pool = test_pool().await;
    let mailer = RecordingMailer::new(true);
    let service = account_service(&pool, mailer.clone());

    let email = unique_email("login");
    let user = service
        .sign_up(&signup_request(&email))
        .await
        .unwrap()
        .expect("signup");

    let auth = service.login(&email, "original-password").await.unwrap();
    assert_eq!(auth.user_id, user.id);
    assert!(!auth.token.is_empty());

    match service.login(&unique_email("ghost"), "whatever").await {
        Err(AuthError::UserNotFound) => {}
        other => panic!("expected UserNotFound, got {:?}", other.map(|a| a.user_id)),
    }

    match service.login(&email, "wrong-password").await {
        Err(AuthError::CredentialsIncorrect { user_id }) => assert_eq!(user_id, user.id),
        other => panic!(
            "expected CredentialsIncorrect, got {:?}",
            other.map(|a| a.user_id)
        ),
    }
}
