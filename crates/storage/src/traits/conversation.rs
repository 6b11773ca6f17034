use async_trait::async_trait;
use quento_core::{Conversation, Message, RingPhase};
use uuid::Uuid;

use crate::error::StorageError;

#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn create_conversation(&self, conversation: &Conversation)
        -> Result<(), StorageError>;

    /// Lookup scoped to the owning user; another user's conversation is
    /// indistinguishable from a missing one.
    async fn get_conversation(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Conversation>, StorageError>;

    /// Conversations most recently updated first, with message counts.
    async fn list_conversations(
        &self,
        user_id: Uuid,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<(Conversation, usize)>, StorageError>;

    async fn count_conversations(&self, user_id: Uuid) -> Result<usize, StorageError>;

    async fn update_conversation_phase(
        &self,
        id: Uuid,
        phase: RingPhase,
    ) -> Result<(), StorageError>;

    /// Bump `updated_at` after a message exchange.
    async fn touch_conversation(&self, id: Uuid) -> Result<(), StorageError>;

    /// Returns whether a row was deleted; messages cascade.
    async fn delete_conversation(&self, id: Uuid) -> Result<bool, StorageError>;

    async fn add_message(&self, message: &Message) -> Result<(), StorageError>;

    /// All messages in chronological order.
    async fn get_messages(&self, conversation_id: Uuid) -> Result<Vec<Message>, StorageError>;

    async fn count_messages(&self, conversation_id: Uuid) -> Result<usize, StorageError>;
}
