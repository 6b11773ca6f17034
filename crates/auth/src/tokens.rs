//! Internal HS256 access/refresh token issuance and verification.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthError;

/// Distinguishes the two internal token kinds carried in the `type` claim.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claims carried by internal tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Owning user id.
    pub sub: Uuid,
    pub exp: i64,
    pub iat: i64,
    #[serde(rename = "type")]
    pub kind: TokenKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Access + refresh token pair returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access-token lifetime in seconds.
    pub expires_in: i64,
}

/// Issues and verifies internal HS256 tokens.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    #[must_use]
    pub fn new(secret: &str, access_minutes: i64, refresh_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl: Duration::minutes(access_minutes),
            refresh_ttl: Duration::days(refresh_days),
        }
    }

    /// Issue an access + refresh pair for the user.
    pub fn issue_pair(&self, user_id: Uuid, email: &str) -> Result<TokenPair, AuthError> {
        let access = self.issue(user_id, TokenKind::Access, Some(email.to_owned()))?;
        let refresh = self.issue(user_id, TokenKind::Refresh, None)?;
        Ok(TokenPair {
            access_token: access,
            refresh_token: refresh,
            token_type: "bearer".to_owned(),
            expires_in: self.access_ttl.num_seconds(),
        })
    }

    fn issue(
        &self,
        user_id: Uuid,
        kind: TokenKind,
        email: Option<String>,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let claims = Claims {
            sub: user_id,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            kind,
            email,
        };
        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    /// Decode and verify a token, requiring the expected kind.
    pub fn decode(&self, token: &str, expected: TokenKind) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        validation.validate_exp = true;
        let data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        if data.claims.kind != expected {
            return Err(AuthError::WrongTokenType);
        }
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("unit-test-secret", 15, 7)
    }

    #[test]
    fn access_token_round_trips() {
        let issuer = issuer();
        let user_id = Uuid::new_v4();
        let pair = issuer.issue_pair(user_id, "a@b.com").unwrap();

        let claims = issuer.decode(&pair.access_token, TokenKind::Access).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email.as_deref(), Some("a@b.com"));
        assert_eq!(pair.token_type, "bearer");
        assert_eq!(pair.expires_in, 15 * 60);
    }

    #[test]
    fn refresh_token_rejected_where_access_expected() {
        let issuer = issuer();
        let pair = issuer.issue_pair(Uuid::new_v4(), "a@b.com").unwrap();
        let err = issuer.decode(&pair.refresh_token, TokenKind::Access).unwrap_err();
        assert!(matches!(err, AuthError::WrongTokenType));
    }

    #[test]
    fn refresh_token_carries_no_email() {
        let issuer = issuer();
        let pair = issuer.issue_pair(Uuid::new_v4(), "a@b.com").unwrap();
        let claims = issuer.decode(&pair.refresh_token, TokenKind::Refresh).unwrap();
        assert!(claims.email.is_none());
    }

    #[test]
    fn garbage_token_is_rejected() {
        let issuer = issuer();
        assert!(issuer.decode("not-a-token", TokenKind::Access).is_err());
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let pair = TokenIssuer::new("other-secret", 15, 7)
            .issue_pair(Uuid::new_v4(), "a@b.com")
            .unwrap();
        assert!(issuer().decode(&pair.access_token, TokenKind::Access).is_err());
    }
}
