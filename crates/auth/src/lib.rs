//! Credential and identity layer for the Quento backend.
//!
//! Password hashing and policy, internal HS256 token issuance, and RS256
//! verification of external identity-provider tokens.

mod error;
mod jwks;
mod password;
mod tokens;

pub use error::AuthError;
pub use jwks::{IdentityClaims, IdentityVerifier};
pub use password::{
    generate_reset_token, hash_password, validate_password, verify_password, SPECIAL_CHARS,
};
pub use tokens::{Claims, TokenIssuer, TokenKind, TokenPair};
