//! Account registration, login, token refresh, and password reset.

use std::sync::Arc;

use chrono::{Duration, Utc};
use quento_auth::{
    generate_reset_token, hash_password, validate_password, verify_password, AuthError,
    IdentityClaims, IdentityVerifier, TokenIssuer, TokenKind, TokenPair,
};
use quento_core::{User, PASSWORD_RESET_TTL_HOURS};
use quento_storage::traits::UserStore;
use quento_storage::PgStorage;

use crate::error::ServiceError;

/// Registration input.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub company_name: Option<String>,
}

/// User plus freshly issued tokens, returned by register and login.
#[derive(Debug, Clone)]
pub struct AuthPayload {
    pub user: User,
    pub tokens: TokenPair,
}

pub struct AuthService {
    storage: Arc<PgStorage>,
    tokens: TokenIssuer,
    identity: Option<Arc<IdentityVerifier>>,
}

impl AuthService {
    #[must_use]
    pub fn new(
        storage: Arc<PgStorage>,
        tokens: TokenIssuer,
        identity: Option<Arc<IdentityVerifier>>,
    ) -> Self {
        Self { storage, tokens, identity }
    }

    /// Register a new local-credential account and issue tokens.
    pub async fn register(&self, input: RegisterInput) -> Result<AuthPayload, ServiceError> {
        let email = normalize_email(&input.email)?;
        validate_password(&input.password)?;

        if self.storage.get_user_by_email(&email).await?.is_some() {
            return Err(ServiceError::UserExists(email));
        }

        let user = User::new(
            email,
            hash_password(&input.password)?,
            input.full_name,
            input.company_name,
        );
        self.storage.create_user(&user).await?;
        tracing::info!(user_id = %user.id, "user registered");

        let tokens = self.tokens.issue_pair(user.id, &user.email)?;
        Ok(AuthPayload { user, tokens })
    }

    /// Authenticate with email and password.
    ///
    /// Missing user and wrong password are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthPayload, ServiceError> {
        let email = normalize_email(email)?;
        let Some(mut user) = self.storage.get_user_by_email(&email).await? else {
            return Err(AuthError::InvalidCredentials.into());
        };
        if !verify_password(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials.into());
        }
        if !user.is_active {
            return Err(AuthError::Inactive.into());
        }

        self.storage.touch_last_login(user.id).await?;
        user.last_login = Some(Utc::now());

        let tokens = self.tokens.issue_pair(user.id, &user.email)?;
        Ok(AuthPayload { user, tokens })
    }

    /// Exchange a refresh token for a fresh pair.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, ServiceError> {
        let claims = self.tokens.decode(refresh_token, TokenKind::Refresh)?;
        let Some(user) = self.storage.get_user_by_id(claims.sub).await? else {
            return Err(AuthError::InvalidToken("user not found".to_owned()).into());
        };
        if !user.is_active {
            return Err(AuthError::Inactive.into());
        }
        Ok(self.tokens.issue_pair(user.id, &user.email)?)
    }

    /// Resolve a bearer token to an active user.
    ///
    /// Identity-provider tokens are tried first when a verifier is
    /// configured; internal access tokens are the fallback.
    pub async fn authenticate(&self, token: &str) -> Result<User, ServiceError> {
        if let Some(verifier) = &self.identity {
            match verifier.verify(token).await {
                Ok(claims) => return self.get_or_create_identity_user(&claims).await,
                Err(err) => {
                    tracing::debug!(%err, "not an identity token, trying internal");
                },
            }
        }

        let claims = self.tokens.decode(token, TokenKind::Access)?;
        let Some(user) = self.storage.get_user_by_id(claims.sub).await? else {
            return Err(AuthError::InvalidToken("user not found".to_owned()).into());
        };
        if !user.is_active {
            return Err(AuthError::Inactive.into());
        }
        Ok(user)
    }

    /// Find or provision the local account for a verified identity token.
    ///
    /// Matches by identity subject first, then by email (linking existing
    /// accounts), and finally creates a passwordless account.
    pub async fn get_or_create_identity_user(
        &self,
        claims: &IdentityClaims,
    ) -> Result<User, ServiceError> {
        if let Some(user) = self.storage.get_user_by_identity_id(&claims.sub).await? {
            return Ok(user);
        }

        if let Some(email) = &claims.email {
            if let Some(mut user) = self.storage.get_user_by_email(email).await? {
                self.storage.link_identity(user.id, &claims.sub).await?;
                user.identity_id = Some(claims.sub.clone());
                return Ok(user);
            }
        }

        let email = claims
            .email
            .clone()
            .unwrap_or_else(|| format!("{}@identity.quento.co", claims.sub));
        let mut user = User::new(email, String::new(), claims.full_name(), None);
        user.identity_id = Some(claims.sub.clone());
        self.storage.create_user(&user).await?;
        tracing::info!(user_id = %user.id, "identity user provisioned");
        Ok(user)
    }

    /// Begin a password reset. Returns the plaintext token when the account
    /// exists; callers must not reveal which case occurred.
    pub async fn request_password_reset(
        &self,
        email: &str,
    ) -> Result<Option<String>, ServiceError> {
        let email = normalize_email(email)?;
        let Some(user) = self.storage.get_user_by_email(&email).await? else {
            return Ok(None);
        };

        let token = generate_reset_token();
        let token_hash = hash_password(&token)?;
        let expires = Utc::now() + Duration::hours(PASSWORD_RESET_TTL_HOURS);
        self.storage.set_password_reset(user.id, &token_hash, expires).await?;
        Ok(Some(token))
    }

    /// Complete a password reset with the token from the email.
    pub async fn confirm_password_reset(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<(), ServiceError> {
        validate_password(new_password)?;

        let candidates = self.storage.users_with_active_reset_tokens(Utc::now()).await?;
        let matched = candidates.into_iter().find(|user| {
            user.password_reset_token
                .as_deref()
                .is_some_and(|hash| verify_password(token, hash))
        });

        let Some(user) = matched else {
            return Err(
                AuthError::InvalidToken("invalid or expired reset token".to_owned()).into()
            );
        };

        let new_hash = hash_password(new_password)?;
        self.storage.update_password(user.id, &new_hash).await?;
        tracing::info!(user_id = %user.id, "password reset completed");
        Ok(())
    }
}

/// Lowercase and minimally validate an email address.
fn normalize_email(email: &str) -> Result<String, ServiceError> {
    let email = email.trim().to_lowercase();
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        return Err(ServiceError::InvalidInput(format!("invalid email address: {email}")));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_normalization() {
        assert_eq!(normalize_email(" A@B.com ").unwrap(), "a@b.com");
        assert!(normalize_email("not-an-email").is_err());
        assert!(normalize_email("@example.com").is_err());
        assert!(normalize_email("a@nodot").is_err());
    }
}
