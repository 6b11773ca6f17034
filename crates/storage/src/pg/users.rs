//! UserStore implementation for PgStorage.

use super::*;

use crate::traits::UserStore;
use async_trait::async_trait;

#[async_trait]
impl UserStore for PgStorage {
    async fn create_user(&self, user: &User) -> Result<(), StorageError> {
        sqlx::query(&format!(
            "INSERT INTO users ({USER_COLUMNS})
             VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13)"
        ))
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(&user.company_name)
        .bind(&user.identity_id)
        .bind(user.current_ring)
        .bind(user.is_active)
        .bind(&user.password_reset_token)
        .bind(user.password_reset_expires)
        .bind(user.created_at)
        .bind(user.updated_at)
        .bind(user.last_login)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>, StorageError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        row.map(|r| row_to_user(&r)).transpose()
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(self.pool())
            .await?;
        row.map(|r| row_to_user(&r)).transpose()
    }

    async fn get_user_by_identity_id(
        &self,
        identity_id: &str,
    ) -> Result<Option<User>, StorageError> {
        let row =
            sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE identity_id = $1"))
                .bind(identity_id)
                .fetch_optional(self.pool())
                .await?;
        row.map(|r| row_to_user(&r)).transpose()
    }

    async fn touch_last_login(&self, id: Uuid) -> Result<(), StorageError> {
        sqlx::query("UPDATE users SET last_login = $1, updated_at = $1 WHERE id = $2")
            .bind(now())
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    async fn link_identity(&self, id: Uuid, identity_id: &str) -> Result<(), StorageError> {
        sqlx::query("UPDATE users SET identity_id = $1, updated_at = $2 WHERE id = $3")
            .bind(identity_id)
            .bind(now())
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    async fn set_password_reset(
        &self,
        id: Uuid,
        token_hash: &str,
        expires: chrono::DateTime<Utc>,
    ) -> Result<(), StorageError> {
        sqlx::query(
            "UPDATE users SET password_reset_token = $1, password_reset_expires = $2,
             updated_at = $3 WHERE id = $4",
        )
        .bind(token_hash)
        .bind(expires)
        .bind(now())
        .bind(id)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn users_with_active_reset_tokens(
        &self,
        now: chrono::DateTime<Utc>,
    ) -> Result<Vec<User>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE password_reset_token IS NOT NULL AND password_reset_expires > $1"
        ))
        .bind(now)
        .fetch_all(self.pool())
        .await?;
        rows.iter().map(row_to_user).collect()
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), StorageError> {
        sqlx::query(
            "UPDATE users SET password_hash = $1, password_reset_token = NULL,
             password_reset_expires = NULL, updated_at = $2 WHERE id = $3",
        )
        .bind(password_hash)
        .bind(now())
        .bind(id)
        .execute(self.pool())
        .await?;
        Ok(())
    }
}
