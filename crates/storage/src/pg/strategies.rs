//! StrategyStore implementation for PgStorage.

use super::*;

use crate::traits::StrategyStore;
use async_trait::async_trait;

#[async_trait]
impl StrategyStore for PgStorage {
    async fn create_strategy(&self, strategy: &Strategy) -> Result<(), StorageError> {
        sqlx::query(&format!(
            "INSERT INTO strategies ({STRATEGY_COLUMNS})
             VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13)"
        ))
        .bind(strategy.id)
        .bind(strategy.user_id)
        .bind(strategy.analysis_id)
        .bind(&strategy.title)
        .bind(strategy.status.as_str())
        .bind(&strategy.executive_summary)
        .bind(&strategy.vision_statement)
        .bind(serde_json::to_value(&strategy.key_strengths)?)
        .bind(serde_json::to_value(&strategy.critical_gaps)?)
        .bind(serde_json::to_value(&strategy.recommendations)?)
        .bind(serde_json::to_value(&strategy.ninety_day_priorities)?)
        .bind(strategy.created_at)
        .bind(strategy.updated_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn get_strategy(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Strategy>, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {STRATEGY_COLUMNS} FROM strategies WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?;
        row.map(|r| row_to_strategy(&r)).transpose()
    }

    async fn get_strategy_unscoped(&self, id: Uuid) -> Result<Option<Strategy>, StorageError> {
        let row =
            sqlx::query(&format!("SELECT {STRATEGY_COLUMNS} FROM strategies WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool())
                .await?;
        row.map(|r| row_to_strategy(&r)).transpose()
    }

    async fn list_strategies(
        &self,
        user_id: Uuid,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Strategy>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {STRATEGY_COLUMNS} FROM strategies
             WHERE user_id = $1
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        ))
        .bind(user_id)
        .bind(usize_to_i64(limit))
        .bind(usize_to_i64(offset))
        .fetch_all(self.pool())
        .await?;
        rows.iter().map(row_to_strategy).collect()
    }

    async fn count_strategies(&self, user_id: Uuid) -> Result<usize, StorageError> {
        count_for_user(self.pool(), "strategies", user_id).await
    }

    async fn update_strategy_content(&self, strategy: &Strategy) -> Result<(), StorageError> {
        sqlx::query(
            "UPDATE strategies SET status = $1, executive_summary = $2, vision_statement = $3,
             key_strengths = $4, critical_gaps = $5, recommendations = $6,
             ninety_day_priorities = $7, updated_at = $8
             WHERE id = $9",
        )
        .bind(strategy.status.as_str())
        .bind(&strategy.executive_summary)
        .bind(&strategy.vision_statement)
        .bind(serde_json::to_value(&strategy.key_strengths)?)
        .bind(serde_json::to_value(&strategy.critical_gaps)?)
        .bind(serde_json::to_value(&strategy.recommendations)?)
        .bind(serde_json::to_value(&strategy.ninety_day_priorities)?)
        .bind(now())
        .bind(strategy.id)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn fail_strategy(&self, id: Uuid) -> Result<(), StorageError> {
        sqlx::query("UPDATE strategies SET status = $1, updated_at = $2 WHERE id = $3")
            .bind(StrategyStatus::Failed.as_str())
            .bind(now())
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    async fn insert_action_items(&self, items: &[ActionItem]) -> Result<(), StorageError> {
        for item in items {
            sqlx::query(&format!(
                "INSERT INTO action_items ({ACTION_ITEM_COLUMNS})
                 VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12)"
            ))
            .bind(item.id)
            .bind(item.strategy_id)
            .bind(&item.title)
            .bind(&item.description)
            .bind(item.priority.as_str())
            .bind(item.effort.as_str())
            .bind(&item.category)
            .bind(item.status.as_str())
            .bind(item.due_date)
            .bind(item.completed_at)
            .bind(&item.notes)
            .bind(item.created_at)
            .execute(self.pool())
            .await?;
        }
        Ok(())
    }

    async fn get_action_items(
        &self,
        strategy_id: Uuid,
    ) -> Result<Vec<ActionItem>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {ACTION_ITEM_COLUMNS} FROM action_items
             WHERE strategy_id = $1
             ORDER BY created_at ASC, id ASC"
        ))
        .bind(strategy_id)
        .fetch_all(self.pool())
        .await?;
        rows.iter().map(row_to_action_item).collect()
    }

    async fn get_action_item(
        &self,
        action_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ActionItem>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {cols} FROM action_items a
             JOIN strategies s ON s.id = a.strategy_id
             WHERE a.id = $1 AND s.user_id = $2",
            cols = ACTION_ITEM_COLUMNS
                .split(", ")
                .map(|c| format!("a.{c}"))
                .collect::<Vec<_>>()
                .join(", "),
        ))
        .bind(action_id)
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?;
        rows.map(|r| row_to_action_item(&r)).transpose()
    }

    async fn update_action_item(&self, item: &ActionItem) -> Result<(), StorageError> {
        sqlx::query(
            "UPDATE action_items SET status = $1, notes = $2, completed_at = $3 WHERE id = $4",
        )
        .bind(item.status.as_str())
        .bind(&item.notes)
        .bind(item.completed_at)
        .bind(item.id)
        .execute(self.pool())
        .await?;
        Ok(())
    }
}
