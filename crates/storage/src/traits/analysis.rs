use async_trait::async_trait;
use quento_core::{Analysis, AnalysisResults};
use uuid::Uuid;

use crate::error::StorageError;

#[async_trait]
pub trait AnalysisStore: Send + Sync {
    async fn create_analysis(&self, analysis: &Analysis) -> Result<(), StorageError>;

    /// User-scoped lookup for API reads.
    async fn get_analysis(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Analysis>, StorageError>;

    /// Unscoped lookup for the background worker, which owns the row.
    async fn get_analysis_unscoped(&self, id: Uuid) -> Result<Option<Analysis>, StorageError>;

    async fn list_analyses(
        &self,
        user_id: Uuid,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Analysis>, StorageError>;

    async fn count_analyses(&self, user_id: Uuid) -> Result<usize, StorageError>;

    /// Transition to `processing` and stamp `started_at`.
    async fn mark_analysis_processing(&self, id: Uuid) -> Result<(), StorageError>;

    /// Commit a progress checkpoint. Never moves progress backwards.
    async fn set_analysis_progress(&self, id: Uuid, progress: i32) -> Result<(), StorageError>;

    async fn complete_analysis(
        &self,
        id: Uuid,
        results: &AnalysisResults,
    ) -> Result<(), StorageError>;

    async fn fail_analysis(&self, id: Uuid, error_message: &str) -> Result<(), StorageError>;

    /// Most recently completed analysis for the user, by completion time.
    async fn latest_completed_analysis(
        &self,
        user_id: Uuid,
    ) -> Result<Option<Analysis>, StorageError>;
}
