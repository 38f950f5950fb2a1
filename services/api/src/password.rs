//! Password hashing helpers
//!
//! Argon2 with a per-password random salt. The digest is never reversible;
//! login and password reset go through `hash`/`verify` only.

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};

/// Hash a plaintext password with a freshly generated salt
pub fn hash(plaintext: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();
    let digest = argon2
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();
    Ok(digest)
}

/// Verify a plaintext password against a stored digest
///
/// A digest that fails to parse counts as a mismatch rather than an error.
pub fn verify(plaintext: &str, digest: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(digest) else {
        return false;
    };
    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_round_trip() {
        let digest = hash("CorrectHorse9!").unwrap();
        assert!(verify("CorrectHorse9!", &digest));
    }

    #[test]
    fn test_wrong_password_is_rejected() {
        let digest = hash("CorrectHorse9!").unwrap();
        assert!(!verify("WrongHorse9!", &digest));
    }

    #[test]
    fn test_same_password_hashes_differently() {
        // Salted: two digests of the same plaintext must differ.
        let a = hash("CorrectHorse9!").unwrap();
        let b = hash("CorrectHorse9!").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_garbage_digest_is_a_mismatch() {
        assert!(!verify("CorrectHorse9!", "not-a-phc-string"));
    }
}
