//! RS256 verification of identity-provider tokens against a JWKS document.
//!
//! The key set is fetched lazily and cached; an unknown `kid` forces one
//! refetch before the token is rejected (key rotation).

use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::error::AuthError;

#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: String,
    n: String,
    e: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

/// Claims extracted from a verified identity-provider token.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityClaims {
    pub sub: String,
    #[allow(dead_code)]
    exp: i64,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl IdentityClaims {
    /// "First Last" from the name claims, if either is present.
    #[must_use]
    pub fn full_name(&self) -> Option<String> {
        let joined = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        );
        let trimmed = joined.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    }
}

/// Verifies provider-issued RS256 tokens against a cached JWKS document.
pub struct IdentityVerifier {
    client: reqwest::Client,
    jwks_url: String,
    cache: RwLock<JwkSet>,
}

impl std::fmt::Debug for IdentityVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityVerifier").field("jwks_url", &self.jwks_url).finish_non_exhaustive()
    }
}

impl IdentityVerifier {
    #[must_use]
    pub fn new(client: reqwest::Client, jwks_url: String) -> Self {
        Self { client, jwks_url, cache: RwLock::new(JwkSet::default()) }
    }

    /// Verify the token signature and expiry, returning its claims.
    pub async fn verify(&self, token: &str) -> Result<IdentityClaims, AuthError> {
        let header = decode_header(token)?;
        let kid = header.kid.ok_or_else(|| AuthError::InvalidToken("missing kid".to_owned()))?;

        let jwk = match self.cached_key(&kid).await {
            Some(jwk) => jwk,
            None => {
                self.refresh_keys().await?;
                self.cached_key(&kid)
                    .await
                    .ok_or_else(|| AuthError::InvalidToken(format!("unknown kid {kid}")))?
            },
        };

        let decoding_key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e)?;
        let mut validation = Validation::new(Algorithm::RS256);
        // The provider does not consistently set an audience.
        validation.validate_aud = false;
        let data = decode::<IdentityClaims>(token, &decoding_key, &validation)?;
        Ok(data.claims)
    }

    async fn cached_key(&self, kid: &str) -> Option<Jwk> {
        self.cache.read().await.keys.iter().find(|k| k.kid == kid).cloned()
    }

    async fn refresh_keys(&self) -> Result<(), AuthError> {
        let set: JwkSet = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| AuthError::Jwks(e.to_string()))?
            .error_for_status()
            .map_err(|e| AuthError::Jwks(e.to_string()))?
            .json()
            .await
            .map_err(|e| AuthError::Jwks(e.to_string()))?;
        tracing::debug!(keys = set.keys.len(), "refreshed identity JWKS");
        *self.cache.write().await = set;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn rejects_token_without_kid() {
        let verifier =
            IdentityVerifier::new(reqwest::Client::new(), "http://localhost:1/jwks".to_owned());
        // HS256 token without a kid header.
        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &serde_json::json!({"sub": "user_1", "exp": 4_102_444_800_i64}),
            &jsonwebtoken::EncodingKey::from_secret(b"x"),
        )
        .unwrap();
        let err = verifier.verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn unknown_kid_is_rejected_after_refetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/jwks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "keys": []
            })))
            .mount(&server)
            .await;

        let verifier =
            IdentityVerifier::new(reqwest::Client::new(), format!("{}/jwks", server.uri()));
        let mut header = jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256);
        header.kid = Some("rotated-away".to_owned());
        let token = jsonwebtoken::encode(
            &header,
            &serde_json::json!({"sub": "user_1", "exp": 4_102_444_800_i64}),
            &jsonwebtoken::EncodingKey::from_secret(b"x"),
        )
        .unwrap();

        let err = verifier.verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn unreachable_jwks_surfaces_jwks_error() {
        let verifier =
            IdentityVerifier::new(reqwest::Client::new(), "http://127.0.0.1:9/jwks".to_owned());
        let mut header = jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256);
        header.kid = Some("any".to_owned());
        let token = jsonwebtoken::encode(
            &header,
            &serde_json::json!({"sub": "user_1", "exp": 4_102_444_800_i64}),
            &jsonwebtoken::EncodingKey::from_secret(b"x"),
        )
        .unwrap();

        let err = verifier.verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::Jwks(_)));
    }
}
