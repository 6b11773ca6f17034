//! Typed error enum for the credential layer.

use thiserror::Error;

/// Errors from password and token operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email/password pair did not match a usable account.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Token failed signature, expiry, or structural checks.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// Token is valid but of the wrong kind (refresh where access expected, etc.).
    #[error("invalid token type")]
    WrongTokenType,

    /// Password rejected by the strength policy.
    #[error("weak password: {0}")]
    WeakPassword(&'static str),

    /// Hashing backend failure.
    #[error("password hashing failed: {0}")]
    Hashing(String),

    /// JWKS document could not be fetched or parsed.
    #[error("jwks error: {0}")]
    Jwks(String),

    /// Account exists but is deactivated.
    #[error("user account is deactivated")]
    Inactive,
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::InvalidToken(err.to_string())
    }
}
