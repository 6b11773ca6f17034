//! Shared constants for the Quento backend.
//!
//! Centralizes magic numbers that would otherwise be duplicated across crates.

/// Maximum number of results for any paginated query (DoS protection).
pub const MAX_PAGE_LIMIT: usize = 100;

/// Default number of results when limit is not specified by the caller.
pub const DEFAULT_PAGE_LIMIT: usize = 20;

/// PostgreSQL connection pool: maximum connections.
pub const PG_POOL_MAX_CONNECTIONS: u32 = 20;

/// PostgreSQL connection pool: acquire timeout in seconds.
pub const PG_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// PostgreSQL connection pool: idle timeout in seconds.
pub const PG_POOL_IDLE_TIMEOUT_SECS: u64 = 300;

/// Number of trailing conversation messages sent to the model.
pub const CHAT_HISTORY_WINDOW: usize = 10;

/// Maximum length of an inbound chat message in characters.
pub const MAX_MESSAGE_LEN: usize = 10_000;

/// Progress checkpoints committed by the analysis worker, in order.
pub const ANALYSIS_PROGRESS_CHECKPOINTS: [i32; 7] = [10, 20, 40, 60, 80, 90, 100];

/// Website fetch timeout in seconds.
pub const ANALYSIS_FETCH_TIMEOUT_SECS: u64 = 30;

/// User agent sent when fetching a website for analysis.
pub const ANALYSIS_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; QuentoBot/1.0; +https://quento.co)";

/// Upper bound on the analysis context block appended to a system prompt,
/// in characters.
pub const MAX_CONTEXT_BLOCK_LEN: usize = 4000;

/// Password reset tokens expire after this many hours.
pub const PASSWORD_RESET_TTL_HOURS: i64 = 1;
