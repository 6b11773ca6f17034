//! AnalysisStore implementation for PgStorage.

use super::*;

use crate::traits::AnalysisStore;
use async_trait::async_trait;

#[async_trait]
impl AnalysisStore for PgStorage {
    async fn create_analysis(&self, analysis: &Analysis) -> Result<(), StorageError> {
        let results = analysis.results.as_ref().map(serde_json::to_value).transpose()?;
        sqlx::query(&format!(
            "INSERT INTO analyses ({ANALYSIS_COLUMNS})
             VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12)"
        ))
        .bind(analysis.id)
        .bind(analysis.user_id)
        .bind(&analysis.website_url)
        .bind(analysis.status.as_str())
        .bind(analysis.progress)
        .bind(analysis.include_competitors)
        .bind(analysis.include_social)
        .bind(results)
        .bind(&analysis.error_message)
        .bind(analysis.started_at)
        .bind(analysis.completed_at)
        .bind(analysis.created_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn get_analysis(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Analysis>, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {ANALYSIS_COLUMNS} FROM analyses WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?;
        row.map(|r| row_to_analysis(&r)).transpose()
    }

    async fn get_analysis_unscoped(&self, id: Uuid) -> Result<Option<Analysis>, StorageError> {
        let row = sqlx::query(&format!("SELECT {ANALYSIS_COLUMNS} FROM analyses WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        row.map(|r| row_to_analysis(&r)).transpose()
    }

    async fn list_analyses(
        &self,
        user_id: Uuid,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Analysis>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {ANALYSIS_COLUMNS} FROM analyses
             WHERE user_id = $1
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        ))
        .bind(user_id)
        .bind(usize_to_i64(limit))
        .bind(usize_to_i64(offset))
        .fetch_all(self.pool())
        .await?;
        rows.iter().map(row_to_analysis).collect()
    }

    async fn count_analyses(&self, user_id: Uuid) -> Result<usize, StorageError> {
        count_for_user(self.pool(), "analyses", user_id).await
    }

    async fn mark_analysis_processing(&self, id: Uuid) -> Result<(), StorageError> {
        sqlx::query(
            "UPDATE analyses SET status = $1, started_at = $2 WHERE id = $3",
        )
        .bind(quento_core::AnalysisStatus::Processing.as_str())
        .bind(now())
        .bind(id)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn set_analysis_progress(&self, id: Uuid, progress: i32) -> Result<(), StorageError> {
        // GREATEST keeps the stored value monotone even on a stray late write.
        sqlx::query("UPDATE analyses SET progress = GREATEST(progress, $1) WHERE id = $2")
            .bind(progress)
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    async fn complete_analysis(
        &self,
        id: Uuid,
        results: &AnalysisResults,
    ) -> Result<(), StorageError> {
        let results = serde_json::to_value(results)?;
        sqlx::query(
            "UPDATE analyses SET status = $1, progress = 100, results = $2,
             completed_at = $3 WHERE id = $4",
        )
        .bind(quento_core::AnalysisStatus::Completed.as_str())
        .bind(results)
        .bind(now())
        .bind(id)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn fail_analysis(&self, id: Uuid, error_message: &str) -> Result<(), StorageError> {
        sqlx::query(
            "UPDATE analyses SET status = $1, error_message = $2, completed_at = $3
             WHERE id = $4",
        )
        .bind(quento_core::AnalysisStatus::Failed.as_str())
        .bind(error_message)
        .bind(now())
        .bind(id)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn latest_completed_analysis(
        &self,
        user_id: Uuid,
    ) -> Result<Option<Analysis>, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {ANALYSIS_COLUMNS} FROM analyses
             WHERE user_id = $1 AND status = $2
             ORDER BY completed_at DESC
             LIMIT 1"
        ))
        .bind(user_id)
        .bind(quento_core::AnalysisStatus::Completed.as_str())
        .fetch_optional(self.pool())
        .await?;
        row.map(|r| row_to_analysis(&r)).transpose()
    }
}
