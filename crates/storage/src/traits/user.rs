use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quento_core::User;
use uuid::Uuid;

use crate::error::StorageError;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. Fails with `Duplicate` on an existing email.
    async fn create_user(&self, user: &User) -> Result<(), StorageError>;

    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>, StorageError>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError>;

    async fn get_user_by_identity_id(
        &self,
        identity_id: &str,
    ) -> Result<Option<User>, StorageError>;

    async fn touch_last_login(&self, id: Uuid) -> Result<(), StorageError>;

    /// Link an existing account to an external identity subject.
    async fn link_identity(&self, id: Uuid, identity_id: &str) -> Result<(), StorageError>;

    /// Store a hashed password-reset token and its expiry.
    async fn set_password_reset(
        &self,
        id: Uuid,
        token_hash: &str,
        expires: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    /// Users holding an unexpired reset token as of `now`.
    async fn users_with_active_reset_tokens(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<User>, StorageError>;

    /// Replace the password hash and clear any reset token.
    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), StorageError>;
}
