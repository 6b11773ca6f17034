//! PostgreSQL storage backend using sqlx.
//!
//! Split into modular files by domain concern.

mod analyses;
mod conversations;
mod strategies;
mod users;

use chrono::{DateTime, Utc};
use quento_core::{
    ActionItem, Analysis, AnalysisResults, AnalysisStatus, Conversation, ConversationStatus,
    Message, MessageMetadata, MessageRole, Recommendation, RingPhase, Strategy, StrategyStatus,
    User, PG_POOL_ACQUIRE_TIMEOUT_SECS, PG_POOL_IDLE_TIMEOUT_SECS, PG_POOL_MAX_CONNECTIONS,
};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::error::StorageError;
use crate::migrations::run_migrations;

pub(crate) const USER_COLUMNS: &str = "id, email, password_hash, full_name, company_name, \
     identity_id, current_ring, is_active, password_reset_token, password_reset_expires, \
     created_at, updated_at, last_login";

pub(crate) const CONVERSATION_COLUMNS: &str =
    "id, user_id, title, ring_phase, status, business_context, created_at, updated_at";

pub(crate) const MESSAGE_COLUMNS: &str =
    "id, conversation_id, role, content, metadata, created_at";

pub(crate) const ANALYSIS_COLUMNS: &str = "id, user_id, website_url, status, progress, \
     include_competitors, include_social, results, error_message, started_at, completed_at, \
     created_at";

pub(crate) const STRATEGY_COLUMNS: &str = "id, user_id, analysis_id, title, status, \
     executive_summary, vision_statement, key_strengths, critical_gaps, recommendations, \
     ninety_day_priorities, created_at, updated_at";

pub(crate) const ACTION_ITEM_COLUMNS: &str = "id, strategy_id, title, description, priority, \
     effort, category, status, due_date, completed_at, notes, created_at";

#[derive(Clone, Debug)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    /// Connect, configure the pool, and run migrations.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(PG_POOL_MAX_CONNECTIONS)
            .acquire_timeout(std::time::Duration::from_secs(PG_POOL_ACQUIRE_TIMEOUT_SECS))
            .idle_timeout(std::time::Duration::from_secs(PG_POOL_IDLE_TIMEOUT_SECS))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;
        run_migrations(&pool).await.map_err(|e| StorageError::Migration(e.to_string()))?;
        tracing::info!("PgStorage initialized");
        Ok(Self { pool })
    }

    pub(crate) const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Convert `usize` to `i64` for SQL LIMIT/OFFSET binds.
pub(crate) fn usize_to_i64(val: usize) -> i64 {
    i64::try_from(val).unwrap_or(i64::MAX)
}

/// Parse a JSONB column into an optional typed document.
pub(crate) fn parse_json_column<T: serde::de::DeserializeOwned>(
    value: Option<serde_json::Value>,
    context: &str,
) -> Result<Option<T>, StorageError> {
    value
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| StorageError::DataCorruption { context: context.to_owned(), source: Box::new(e) })
}

/// Parse a JSONB array column, tolerating NULL as empty.
pub(crate) fn parse_json_list<T: serde::de::DeserializeOwned>(
    value: Option<serde_json::Value>,
    context: &str,
) -> Result<Vec<T>, StorageError> {
    Ok(parse_json_column(value, context)?.unwrap_or_default())
}

pub(crate) fn row_to_user(row: &PgRow) -> Result<User, StorageError> {
    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        full_name: row.try_get("full_name")?,
        company_name: row.try_get("company_name")?,
        identity_id: row.try_get("identity_id")?,
        current_ring: row.try_get("current_ring")?,
        is_active: row.try_get("is_active")?,
        password_reset_token: row.try_get("password_reset_token")?,
        password_reset_expires: row.try_get("password_reset_expires")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        last_login: row.try_get("last_login")?,
    })
}

pub(crate) fn row_to_conversation(row: &PgRow) -> Result<Conversation, StorageError> {
    let ring_phase: RingPhase = row.try_get::<String, _>("ring_phase")?.parse()?;
    let status: ConversationStatus = row.try_get::<String, _>("status")?.parse()?;
    Ok(Conversation {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        title: row.try_get("title")?,
        ring_phase,
        status,
        business_context: row.try_get("business_context")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub(crate) fn row_to_message(row: &PgRow) -> Result<Message, StorageError> {
    let role: MessageRole = row.try_get::<String, _>("role")?.parse()?;
    let metadata: Option<MessageMetadata> =
        parse_json_column(row.try_get("metadata")?, "message metadata")?;
    Ok(Message {
        id: row.try_get("id")?,
        conversation_id: row.try_get("conversation_id")?,
        role,
        content: row.try_get("content")?,
        metadata,
        created_at: row.try_get("created_at")?,
    })
}

pub(crate) fn row_to_analysis(row: &PgRow) -> Result<Analysis, StorageError> {
    let status: AnalysisStatus = row.try_get::<String, _>("status")?.parse()?;
    let results: Option<AnalysisResults> =
        parse_json_column(row.try_get("results")?, "analysis results")?;
    Ok(Analysis {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        website_url: row.try_get("website_url")?,
        status,
        progress: row.try_get("progress")?,
        include_competitors: row.try_get("include_competitors")?,
        include_social: row.try_get("include_social")?,
        results,
        error_message: row.try_get("error_message")?,
        started_at: row.try_get("started_at")?,
        completed_at: row.try_get("completed_at")?,
        created_at: row.try_get("created_at")?,
    })
}

pub(crate) fn row_to_strategy(row: &PgRow) -> Result<Strategy, StorageError> {
    let status: StrategyStatus = row.try_get::<String, _>("status")?.parse()?;
    let key_strengths: Vec<String> =
        parse_json_list(row.try_get("key_strengths")?, "strategy key_strengths")?;
    let critical_gaps: Vec<String> =
        parse_json_list(row.try_get("critical_gaps")?, "strategy critical_gaps")?;
    let recommendations: Vec<Recommendation> =
        parse_json_list(row.try_get("recommendations")?, "strategy recommendations")?;
    let ninety_day_priorities: Vec<String> =
        parse_json_list(row.try_get("ninety_day_priorities")?, "strategy priorities")?;
    Ok(Strategy {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        analysis_id: row.try_get("analysis_id")?,
        title: row.try_get("title")?,
        status,
        executive_summary: row.try_get("executive_summary")?,
        vision_statement: row.try_get("vision_statement")?,
        key_strengths,
        critical_gaps,
        recommendations,
        ninety_day_priorities,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub(crate) fn row_to_action_item(row: &PgRow) -> Result<ActionItem, StorageError> {
    Ok(ActionItem {
        id: row.try_get("id")?,
        strategy_id: row.try_get("strategy_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        priority: row.try_get::<String, _>("priority")?.parse()?,
        effort: row.try_get::<String, _>("effort")?.parse()?,
        category: row.try_get("category")?,
        status: row.try_get::<String, _>("status")?.parse()?,
        due_date: row.try_get("due_date")?,
        completed_at: row.try_get("completed_at")?,
        notes: row.try_get("notes")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Count rows for a user in the named table.
pub(crate) async fn count_for_user(
    pool: &PgPool,
    table: &str,
    user_id: Uuid,
) -> Result<usize, StorageError> {
    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table} WHERE user_id = $1"))
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    Ok(usize::try_from(count).unwrap_or(0))
}

pub(crate) fn now() -> DateTime<Utc> {
    Utc::now()
}
