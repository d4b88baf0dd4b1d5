//! Password hashing and auth tokens.
//!
//! Stored hashes are `salt || hex(sha256(salt || password))` where `salt` is
//! 64 random bytes, hex-encoded. Tokens are a keyed digest over the username
//! and expiry; checking one is a single hash comparison plus an expiry check.
//!
//! [`verify_token`] is exported for services that accept these tokens. No
//! route in this workspace requires one; login only issues them.

use chrono::{DateTime, Duration, Utc};
use rand::TryRngCore;
use rand::rngs::OsRng;
use serde::Serialize;
use sha2::{Digest, Sha256};
use wayfarer_core::clock::Clock;
use wayfarer_core::codec::TokenWriter;
use wayfarer_core::error::DomainError;

const SALT_BYTES: usize = 64;
const SALT_HEX_LEN: usize = SALT_BYTES * 2;

/// Settings for token issuance.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// Key mixed into every token digest.
    pub secret: String,
    /// How long an issued token stays valid.
    pub token_ttl: Duration,
}

/// Hashes `password` under a fresh random salt.
///
/// # Errors
///
/// Returns `DomainError::Internal` if the OS random source fails.
pub fn hash_password(password: &str) -> Result<String, DomainError> {
    let mut salt = [0u8; SALT_BYTES];
    OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|e| DomainError::Internal(format!("failed to generate salt: {e}")))?;
    Ok(salted_digest(&hex::encode(salt), password))
}

/// Whether `password` matches a hash produced by [`hash_password`].
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.get(..SALT_HEX_LEN) {
        Some(salt) => salted_digest(salt, password) == stored,
        None => false,
    }
}

fn salted_digest(salt_hex: &str, password: &str) -> String {
    let digest = Sha256::digest(format!("{salt_hex}{password}").as_bytes());
    format!("{salt_hex}{}", hex::encode(digest))
}

/// A bearer token issued by `AuthPlayer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthToken {
    /// Who the token was issued to.
    pub username: String,
    /// Issue time.
    pub issued_at: DateTime<Utc>,
    /// Expiry time.
    pub expires_at: DateTime<Utc>,
    /// Hex digest binding username and expiry to the server secret.
    pub token: String,
}

impl AuthToken {
    /// Issues a token for `username` valid for the configured lifetime.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Internal` if the expiry overflows the calendar.
    pub fn issue(
        username: &str,
        settings: &AuthSettings,
        clock: &dyn Clock,
    ) -> Result<Self, DomainError> {
        let issued_at = clock.now();
        let expires_at = clock.after(settings.token_ttl)?;
        Ok(Self {
            username: username.to_owned(),
            issued_at,
            expires_at,
            token: token_digest(&settings.secret, username, expires_at),
        })
    }
}

/// Checks a token presented back by a client.
///
/// # Errors
///
/// Returns `DomainError::AuthFailure` if the token has expired or its digest
/// does not match.
pub fn verify_token(
    username: &str,
    token: &str,
    expires_at: DateTime<Utc>,
    settings: &AuthSettings,
    clock: &dyn Clock,
) -> Result<(), DomainError> {
    if clock.now() >= expires_at {
        return Err(DomainError::AuthFailure);
    }
    if token_digest(&settings.secret, username, expires_at) != token {
        return Err(DomainError::AuthFailure);
    }
    Ok(())
}

fn token_digest(secret: &str, username: &str, expires_at: DateTime<Utc>) -> String {
    let material = TokenWriter::new()
        .text(secret)
        .text(username)
        .text(&expires_at.timestamp().to_string())
        .finish();
    hex::encode(Sha256::digest(material.as_bytes()))
}

#[cfg(test)]
mod tests {
    use wayfarer_test_support::FixedClock;

    use super::*;

    fn settings() -> AuthSettings {
        AuthSettings {
            secret: "s3cret".to_owned(),
            token_ttl: Duration::hours(1),
        }
    }

    #[test]
    fn test_hash_has_salt_prefix_and_sha256_suffix() {
        let hash = hash_password("hunter2").unwrap();
        assert_eq!(hash.len(), SALT_HEX_LEN + 64);
        assert!(hash.bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn test_same_password_hashes_differently() {
        assert_ne!(
            hash_password("hunter2").unwrap(),
            hash_password("hunter2").unwrap()
        );
    }

    #[test]
    fn test_verify_password_accepts_only_the_original() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
        assert!(!verify_password("hunter2", "short"));
    }

    #[test]
    fn test_issued_token_verifies_until_expiry() {
        let clock = FixedClock::default_instant();
        let token = AuthToken::issue("alice", &settings(), &clock).unwrap();

        assert_eq!(token.expires_at - token.issued_at, Duration::hours(1));
        assert!(
            verify_token("alice", &token.token, token.expires_at, &settings(), &clock).is_ok()
        );

        let later = FixedClock(token.expires_at);
        match verify_token("alice", &token.token, token.expires_at, &settings(), &later) {
            Err(DomainError::AuthFailure) => {}
            other => panic!("expected AuthFailure, got {other:?}"),
        }
    }

    #[test]
    fn test_token_is_bound_to_username_and_secret() {
        let clock = FixedClock::default_instant();
        let token = AuthToken::issue("alice", &settings(), &clock).unwrap();

        assert!(verify_token("bob", &token.token, token.expires_at, &settings(), &clock).is_err());

        let other = AuthSettings {
            secret: "different".to_owned(),
            ..settings()
        };
        assert!(verify_token("alice", &token.token, token.expires_at, &other, &clock).is_err());
    }

    #[test]
    fn test_issue_with_unrepresentable_expiry_is_internal() {
        let clock = FixedClock::default_instant();
        let settings = AuthSettings {
            token_ttl: Duration::seconds(10_000_000_000_000),
            ..settings()
        };

        let result = AuthToken::issue("alice", &settings, &clock);

        assert!(matches!(result, Err(DomainError::Internal(_))));
    }
}
