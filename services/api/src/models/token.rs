//! Security token model
//!
//! A security token is a single-use, typed, time-bound credential owned by
//! exactly one user. Tokens guard the password-reset and email-confirmation
//! actions; an expired or used token must never be accepted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Discriminator distinguishing email-confirmation tokens from
/// password-reset tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    EmailConfirm,
    Reset,
}

impl TokenKind {
    /// Database representation of the token type
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::EmailConfirm => "EMAIL_CONFIRM",
            TokenKind::Reset => "RESET",
        }
    }

    /// Parse the database representation back into a kind
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "EMAIL_CONFIRM" => Some(TokenKind::EmailConfirm),
            "RESET" => Some(TokenKind::Reset),
            _ => None,
        }
    }
}

/// Security token entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: TokenKind,
    pub token: String,
    pub created_on: NaiveDate,
    pub expires_on: NaiveDate,
    pub used: bool,
}

impl SecurityToken {
    /// Confirm-phase predicate: the token is acceptable for the guarded
    /// action iff it is unused, of the expected kind, matches the presented
    /// token string, and expires strictly after `today`.
    pub fn is_usable(&self, kind: TokenKind, presented: &str, today: NaiveDate) -> bool {
        !self.used && self.kind == kind && self.token == presented && self.expires_on > today
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn token(kind: TokenKind, expires_on: NaiveDate, used: bool) -> SecurityToken {
        SecurityToken {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            kind,
            token: "abc123".to_string(),
            created_on: expires_on - Duration::days(1),
            expires_on,
            used,
        }
    }

    fn today() -> NaiveDate {
        chrono::Utc::now().date_naive()
    }

    #[test]
    fn test_valid_token_is_usable() {
        let t = token(TokenKind::Reset, today() + Duration::days(1), false);
        assert!(t.is_usable(TokenKind::Reset, "abc123", today()));
    }

    #[test]
    fn test_used_token_is_rejected() {
        let t = token(TokenKind::Reset, today() + Duration::days(1), true);
        assert!(!t.is_usable(TokenKind::Reset, "abc123", today()));
    }

    #[test]
    fn test_expired_token_is_rejected_regardless_of_used() {
        let yesterday = today() - Duration::days(1);
        let unused = token(TokenKind::Reset, yesterday, false);
        let used = token(TokenKind::Reset, yesterday, true);
        assert!(!unused.is_usable(TokenKind::Reset, "abc123", today()));
        assert!(!used.is_usable(TokenKind::Reset, "abc123", today()));
    }

    #[test]
    fn test_token_expiring_today_is_rejected() {
        // Expiry must be strictly after today.
        let t = token(TokenKind::Reset, today(), false);
        assert!(!t.is_usable(TokenKind::Reset, "abc123", today()));
    }

    #[test]
    fn test_wrong_kind_is_rejected() {
        let t = token(TokenKind::EmailConfirm, today() + Duration::days(1), false);
        assert!(!t.is_usable(TokenKind::Reset, "abc123", today()));
    }

    #[test]
    fn test_wrong_token_string_is_rejected() {
        let t = token(TokenKind::Reset, today() + Duration::days(1), false);
        assert!(!t.is_usable(TokenKind::Reset, "other", today()));
    }

    #[test]
    fn test_kind_round_trips_through_db_representation() {
        assert_eq!(TokenKind::parse("EMAIL_CONFIRM"), Some(TokenKind::EmailConfirm));
        assert_eq!(TokenKind::parse("RESET"), Some(TokenKind::Reset));
        assert_eq!(TokenKind::parse("SOMETHING"), None);
        assert_eq!(TokenKind::EmailConfirm.as_str(), "EMAIL_CONFIRM");
        assert_eq!(TokenKind::Reset.as_str(), "RESET");
    }
}
