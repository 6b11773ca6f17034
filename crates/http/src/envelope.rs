//! Response envelopes.
//!
//! Every success body is `{success, data, meta}`; list endpoints add a
//! `pagination` object.

use chrono::{DateTime, Utc};
use quento_core::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Response metadata attached to every envelope.
#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    pub timestamp: DateTime<Utc>,
    pub request_id: Uuid,
}

impl Default for Meta {
    fn default() -> Self {
        Self { timestamp: Utc::now(), request_id: Uuid::new_v4() }
    }
}

/// Standard success envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub meta: Meta,
}

impl<T: Serialize> ApiResponse<T> {
    #[must_use]
    pub fn new(data: T) -> Self {
        Self { success: true, data, meta: Meta::default() }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Pagination {
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    pub has_more: bool,
}

/// Paginated success envelope.
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    pub success: bool,
    pub data: Vec<T>,
    pub pagination: Pagination,
    pub meta: Meta,
}

impl<T: Serialize> PaginatedResponse<T> {
    #[must_use]
    pub fn new(data: Vec<T>, total: usize, limit: usize, offset: usize) -> Self {
        let has_more = offset + data.len() < total;
        Self {
            success: true,
            data,
            pagination: Pagination { total, limit, offset, has_more },
            meta: Meta::default(),
        }
    }
}

/// Common `?limit=&offset=` query parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

const fn default_limit() -> usize {
    DEFAULT_PAGE_LIMIT
}

impl PageQuery {
    /// Clamp limit to [1, MAX_PAGE_LIMIT] to bound query cost.
    #[must_use]
    pub fn capped_limit(&self) -> usize {
        self.limit.clamp(1, MAX_PAGE_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_shape() {
        let body = serde_json::to_value(ApiResponse::new(serde_json::json!({"x": 1}))).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["x"], 1);
        assert!(body["meta"]["timestamp"].is_string());
        assert!(body["meta"]["request_id"].is_string());
    }

    #[test]
    fn pagination_has_more() {
        let page = PaginatedResponse::new(vec![1, 2, 3], 10, 3, 0);
        assert!(page.pagination.has_more);
        let last_page = PaginatedResponse::new(vec![1], 10, 3, 9);
        assert!(!last_page.pagination.has_more);
    }

    #[test]
    fn limit_is_clamped() {
        let query = PageQuery { limit: 10_000, offset: 0 };
        assert_eq!(query.capped_limit(), MAX_PAGE_LIMIT);
        let zero = PageQuery { limit: 0, offset: 0 };
        assert_eq!(zero.capped_limit(), 1);
    }
}
