use async_trait::async_trait;
use quento_core::{ActionItem, Strategy};
use uuid::Uuid;

use crate::error::StorageError;

#[async_trait]
pub trait StrategyStore: Send + Sync {
    async fn create_strategy(&self, strategy: &Strategy) -> Result<(), StorageError>;

    async fn get_strategy(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Strategy>, StorageError>;

    /// Unscoped lookup for the background generator.
    async fn get_strategy_unscoped(&self, id: Uuid) -> Result<Option<Strategy>, StorageError>;

    async fn list_strategies(
        &self,
        user_id: Uuid,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Strategy>, StorageError>;

    async fn count_strategies(&self, user_id: Uuid) -> Result<usize, StorageError>;

    /// Persist the generated document fields and status.
    async fn update_strategy_content(&self, strategy: &Strategy) -> Result<(), StorageError>;

    async fn fail_strategy(&self, id: Uuid) -> Result<(), StorageError>;

    async fn insert_action_items(&self, items: &[ActionItem]) -> Result<(), StorageError>;

    /// Action items for a strategy, in creation order.
    async fn get_action_items(&self, strategy_id: Uuid)
        -> Result<Vec<ActionItem>, StorageError>;

    /// Action item lookup scoped through the owning strategy's user.
    async fn get_action_item(
        &self,
        action_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ActionItem>, StorageError>;

    async fn update_action_item(&self, item: &ActionItem) -> Result<(), StorageError>;
}
