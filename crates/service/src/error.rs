//! Typed error enum for the service layer.
//!
//! Unifies storage, auth, LLM, and analyzer failures into a single error
//! type so HTTP handlers can map each failure mode to a stable API code.

use quento_auth::AuthError;
use quento_analyzer::AnalyzerError;
use quento_llm::LlmError;
use quento_storage::StorageError;
use thiserror::Error;

/// Service-layer error unifying the lower layers' failure modes.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage operation failed (DB, duplicate, corruption).
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// Credential or token failure.
    #[error("auth: {0}")]
    Auth(#[from] AuthError),

    /// LLM API call failed (normally absorbed by the chat fallback).
    #[error("llm: {0}")]
    Llm(#[from] LlmError),

    /// Website fetch/validation failure.
    #[error("analyzer: {0}")]
    Analyzer(#[from] AnalyzerError),

    /// Caller provided invalid input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Scoped lookup found nothing for this caller.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// Registration attempted with an email that is already taken.
    #[error("user with email {0} already exists")]
    UserExists(String),

    /// Serialization failed in the service layer.
    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ServiceError {
    pub(crate) fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound { entity, id: id.to_string() }
    }

    /// Whether this error represents a not-found condition.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
            || matches!(self, Self::Storage(StorageError::NotFound { .. }))
    }
}
