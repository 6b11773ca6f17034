//! Password hashing and strength policy.
//!
//! Argon2id with per-hash random salts; no length ceiling quirks like bcrypt.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::error::AuthError;

/// Special characters accepted by the password policy.
pub const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

const MIN_PASSWORD_LEN: usize = 8;
const MAX_PASSWORD_LEN: usize = 128;

/// Validate a candidate password against the policy: length 8–128, at least
/// one digit, at least one special character from [`SPECIAL_CHARS`].
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::WeakPassword("password must be at least 8 characters"));
    }
    if password.chars().count() > MAX_PASSWORD_LEN {
        return Err(AuthError::WeakPassword("password must be at most 128 characters"));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AuthError::WeakPassword("password must contain at least one number"));
    }
    if !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        return Err(AuthError::WeakPassword(
            "password must contain at least one special character",
        ));
    }
    Ok(())
}

/// Hash a password (or reset token) with argon2id and a fresh salt.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Verify a password against a stored argon2 hash.
///
/// Returns `false` on mismatch or on an unparseable stored hash (identity
/// accounts store an empty hash and can never pass password login).
#[must_use]
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok()
}

/// Generate an opaque URL-safe reset token. Only its hash is persisted.
#[must_use]
pub fn generate_reset_token() -> String {
    rand::thread_rng().sample_iter(&Alphanumeric).take(43).map(char::from).collect()
}
