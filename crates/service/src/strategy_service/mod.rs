//! Strategy generation and action-item management.

mod generator;

use std::sync::Arc;

use chrono::Utc;
use quento_core::{ActionItem, ActionStatus, Strategy, StrategyStatus};
use quento_storage::traits::{AnalysisStore, StrategyStore};
use quento_storage::PgStorage;
use serde::Serialize;
use uuid::Uuid;

use crate::error::ServiceError;
use crate::jobs::{Job, JobQueue};

pub use generator::{build_strategy_document, GeneratedStrategy};

/// Formats accepted by the export stub.
const EXPORT_FORMATS: [&str; 4] = ["pdf", "markdown", "notion", "trello"];

/// One action-item update, standalone or inside a batch.
#[derive(Debug, Clone)]
pub struct ActionItemUpdate {
    pub action_id: Uuid,
    pub status: ActionStatus,
    pub notes: Option<String>,
}

/// Receipt returned by the export stub; no rendering happens.
#[derive(Debug, Clone, Serialize)]
pub struct ExportReceipt {
    pub format: String,
    pub status: &'static str,
    pub download_url: String,
    pub message: String,
}

pub struct StrategyService {
    storage: Arc<PgStorage>,
    jobs: JobQueue,
}

impl StrategyService {
    #[must_use]
    pub fn new(storage: Arc<PgStorage>, jobs: JobQueue) -> Self {
        Self { storage, jobs }
    }

    /// Create a `generating` strategy row from a completed analysis and
    /// dispatch the background generation job.
    pub async fn generate_strategy(
        &self,
        user_id: Uuid,
        analysis_id: Uuid,
    ) -> Result<Strategy, ServiceError> {
        let analysis = self
            .storage
            .get_analysis(analysis_id, user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("analysis", analysis_id))?;
        if analysis.results.is_none() {
            return Err(ServiceError::InvalidInput("analysis not yet completed".to_owned()));
        }

        let strategy = Strategy::new(
            user_id,
            Some(analysis_id),
            Some(format!("Growth Strategy for {}", analysis.website_url)),
        );
        self.storage.create_strategy(&strategy).await?;
        self.jobs.enqueue(Job::GenerateStrategy(strategy.id));
        tracing::info!(strategy_id = %strategy.id, %analysis_id, "strategy generation dispatched");

        Ok(strategy)
    }

    pub async fn get_strategy_detail(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<(Strategy, Vec<ActionItem>), ServiceError> {
        let strategy = self
            .storage
            .get_strategy(id, user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("strategy", id))?;
        let items = self.storage.get_action_items(id).await?;
        Ok((strategy, items))
    }

    pub async fn list_strategies(
        &self,
        user_id: Uuid,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<(Strategy, Vec<ActionItem>)>, usize), ServiceError> {
        let strategies = self.storage.list_strategies(user_id, limit, offset).await?;
        let total = self.storage.count_strategies(user_id).await?;
        let mut detailed = Vec::with_capacity(strategies.len());
        for strategy in strategies {
            let items = self.storage.get_action_items(strategy.id).await?;
            detailed.push((strategy, items));
        }
        Ok((detailed, total))
    }

    /// Update one action item's status/notes, stamping `completed_at` on
    /// completion.
    pub async fn update_action_item(
        &self,
        user_id: Uuid,
        update: ActionItemUpdate,
    ) -> Result<ActionItem, ServiceError> {
        let mut item = self
            .storage
            .get_action_item(update.action_id, user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("action item", update.action_id))?;

        item.status = update.status;
        if update.notes.is_some() {
            item.notes = update.notes;
        }
        item.completed_at = (update.status == ActionStatus::Completed).then(Utc::now);

        self.storage.update_action_item(&item).await?;
        Ok(item)
    }

    /// Batch update; items not found for this user are skipped.
    pub async fn batch_update_action_items(
        &self,
        user_id: Uuid,
        updates: Vec<ActionItemUpdate>,
    ) -> Result<Vec<ActionItem>, ServiceError> {
        let mut updated = Vec::new();
        for update in updates {
            match self.update_action_item(user_id, update).await {
                Ok(item) => updated.push(item),
                Err(err) if err.is_not_found() => continue,
                Err(err) => return Err(err),
            }
        }
        Ok(updated)
    }

    /// Export stub: validates the format and returns a processing receipt.
    pub async fn export_strategy(
        &self,
        id: Uuid,
        user_id: Uuid,
        format: &str,
    ) -> Result<ExportReceipt, ServiceError> {
        if !EXPORT_FORMATS.contains(&format) {
            return Err(ServiceError::InvalidInput(format!(
                "unsupported export format '{format}'"
            )));
        }
        // Ownership check only; rendering is out of scope.
        self.storage
            .get_strategy(id, user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("strategy", id))?;

        Ok(ExportReceipt {
            format: format.to_owned(),
            status: "processing",
            download_url: format!("/exports/strategy-{id}.{format}"),
            message: format!(
                "Export to {format} initiated. Download will be available shortly."
            ),
        })
    }
}

/// Background generation entry point. Failure flips the row to `failed`.
pub(crate) async fn run_strategy_generation(storage: &PgStorage, strategy_id: Uuid) {
    if let Err(err) = generate_content(storage, strategy_id).await {
        tracing::warn!(%strategy_id, %err, "strategy generation failed");
        if let Err(db_err) = storage.fail_strategy(strategy_id).await {
            tracing::error!(%strategy_id, %db_err, "could not record strategy failure");
        }
    }
}

async fn generate_content(storage: &PgStorage, strategy_id: Uuid) -> Result<(), ServiceError> {
    let Some(mut strategy) = storage.get_strategy_unscoped(strategy_id).await? else {
        tracing::warn!(%strategy_id, "strategy row disappeared before generation");
        return Ok(());
    };
    let analysis_id = strategy
        .analysis_id
        .ok_or_else(|| ServiceError::InvalidInput("strategy has no analysis".to_owned()))?;
    let analysis = storage
        .get_analysis_unscoped(analysis_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("analysis", analysis_id))?;
    let results = analysis
        .results
        .ok_or_else(|| ServiceError::InvalidInput("analysis has no results".to_owned()))?;

    let document = build_strategy_document(
        strategy_id,
        &analysis.website_url,
        &results,
        Utc::now().date_naive(),
    );

    strategy.status = StrategyStatus::Ready;
    strategy.executive_summary = Some(document.executive_summary);
    strategy.vision_statement = Some(document.vision_statement);
    strategy.key_strengths = document.key_strengths;
    strategy.critical_gaps = document.critical_gaps;
    strategy.recommendations = document.recommendations;
    strategy.ninety_day_priorities = document.ninety_day_priorities;

    storage.update_strategy_content(&strategy).await?;
    storage.insert_action_items(&document.action_items).await?;
    tracing::info!(%strategy_id, items = document.action_items.len(), "strategy ready");
    Ok(())
}
