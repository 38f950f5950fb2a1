//! Session token codec
//!
//! Encodes the session credential issued on login: an HS256-signed assertion
//! of the authenticated user id with a configured lifetime, signed with the
//! server secret.

use anyhow::Result;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Session token configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret used to sign and verify session tokens
    pub secret: String,
    /// Session token lifetime in seconds (default: 1 hour)
    pub session_token_expiry: u64,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `SESSION_SECRET`: signing secret for session tokens (required)
    /// - `SESSION_TOKEN_EXPIRY`: lifetime in seconds (default: 3600)
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var("SESSION_SECRET")
            .map_err(|_| anyhow::anyhow!("SESSION_SECRET environment variable not set"))?;

        let session_token_expiry = std::env::var("SESSION_TOKEN_EXPIRY")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .unwrap_or(3600);

        Ok(JwtConfig {
            secret,
            session_token_expiry,
        })
    }
}

/// Session token claims: the authenticated user id plus lifetime bounds
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User ID
    pub sub: Uuid,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// Session token service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    session_token_expiry: u64,
}

impl JwtService {
    /// Initialize a new session token service
    pub fn new(config: &JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.validate_exp = true;

        JwtService {
            encoding_key,
            decoding_key,
            validation,
            session_token_expiry: config.session_token_expiry,
        }
    }

    /// Encode a session token for the given user id
    pub fn encode_session(&self, user_id: Uuid) -> Result<String> {
        let now = unix_now()?;
        let claims = SessionClaims {
            sub: user_id,
            iat: now,
            exp: now + self.session_token_expiry,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Validate a session token and return its claims
    pub fn validate_token(&self, token: &str) -> Result<SessionClaims> {
        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }

    /// Get the configured session token lifetime in seconds
    pub fn session_token_expiry(&self) -> u64 {
        self.session_token_expiry
    }
}

fn unix_now() -> Result<u64> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| anyhow::anyhow!("Failed to get current time: {}", e))?
        .as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn service() -> JwtService {
        JwtService::new(&JwtConfig {
            secret: "test-secret".to_string(),
            session_token_expiry: 3600,
        })
    }

    #[test]
    fn test_session_token_round_trip() {
        let service = service();
        let user_id = Uuid::new_v4();

        let token = service.encode_session(user_id).unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.exp, claims.iat + 3600);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let other = JwtService::new(&JwtConfig {
            secret: "other-secret".to_string(),
            session_token_expiry: 3600,
        });

        let token = other.encode_session(Uuid::new_v4()).unwrap();
        assert!(service().validate_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let now = unix_now().unwrap();
        let claims = SessionClaims {
            sub: Uuid::new_v4(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(service().validate_token(&token).is_err());
    }

    #[test]
    #[serial]
    fn test_jwt_config_requires_secret() {
        unsafe {
            std::env::remove_var("SESSION_SECRET");
        }
        assert!(JwtConfig::from_env().is_err());

        unsafe {
            std::env::set_var("SESSION_SECRET", "s3cret");
            std::env::remove_var("SESSION_TOKEN_EXPIRY");
        }
        let config = JwtConfig::from_env().unwrap();
        assert_eq!(config.secret, "s3cret");
        assert_eq!(config.session_token_expiry, 3600);

        unsafe {
            std::env::remove_var("SESSION_SECRET");
        }
    }
}
