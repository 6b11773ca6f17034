use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User account.
///
/// `password_hash` is empty for accounts provisioned through the external
/// identity provider; those users authenticate with provider tokens only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: Option<String>,
    pub company_name: Option<String>,
    /// Subject claim from the external identity provider, when linked.
    pub identity_id: Option<String>,
    pub current_ring: i32,
    pub is_active: bool,
    #[serde(skip_serializing)]
    pub password_reset_token: Option<String>,
    #[serde(skip_serializing)]
    pub password_reset_expires: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// New local-credential user with defaults matching a freshly registered account.
    #[must_use]
    pub fn new(
        email: String,
        password_hash: String,
        full_name: Option<String>,
        company_name: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            full_name,
            company_name,
            identity_id: None,
            current_ring: 1,
            is_active: true,
            password_reset_token: None,
            password_reset_expires: None,
            created_at: now,
            updated_at: now,
            last_login: None,
        }
    }
}
