//! ConversationStore implementation for PgStorage.

use super::*;

use crate::traits::ConversationStore;
use async_trait::async_trait;

#[async_trait]
impl ConversationStore for PgStorage {
    async fn create_conversation(
        &self,
        conversation: &Conversation,
    ) -> Result<(), StorageError> {
        sqlx::query(&format!(
            "INSERT INTO conversations ({CONVERSATION_COLUMNS})
             VALUES ($1,$2,$3,$4,$5,$6,$7,$8)"
        ))
        .bind(conversation.id)
        .bind(conversation.user_id)
        .bind(&conversation.title)
        .bind(conversation.ring_phase.as_str())
        .bind(conversation.status.as_str())
        .bind(&conversation.business_context)
        .bind(conversation.created_at)
        .bind(conversation.updated_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn get_conversation(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Conversation>, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {CONVERSATION_COLUMNS} FROM conversations WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?;
        row.map(|r| row_to_conversation(&r)).transpose()
    }

    async fn list_conversations(
        &self,
        user_id: Uuid,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<(Conversation, usize)>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {CONVERSATION_COLUMNS},
                    (SELECT COUNT(*) FROM messages m WHERE m.conversation_id = conversations.id)
                        AS message_count
             FROM conversations
             WHERE user_id = $1
             ORDER BY updated_at DESC
             LIMIT $2 OFFSET $3"
        ))
        .bind(user_id)
        .bind(usize_to_i64(limit))
        .bind(usize_to_i64(offset))
        .fetch_all(self.pool())
        .await?;
        rows.iter()
            .map(|r| {
                let conversation = row_to_conversation(r)?;
                let count: i64 = r.try_get("message_count")?;
                Ok((conversation, usize::try_from(count).unwrap_or(0)))
            })
            .collect()
    }

    async fn count_conversations(&self, user_id: Uuid) -> Result<usize, StorageError> {
        count_for_user(self.pool(), "conversations", user_id).await
    }

    async fn update_conversation_phase(
        &self,
        id: Uuid,
        phase: RingPhase,
    ) -> Result<(), StorageError> {
        sqlx::query("UPDATE conversations SET ring_phase = $1, updated_at = $2 WHERE id = $3")
            .bind(phase.as_str())
            .bind(now())
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    async fn touch_conversation(&self, id: Uuid) -> Result<(), StorageError> {
        sqlx::query("UPDATE conversations SET updated_at = $1 WHERE id = $2")
            .bind(now())
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    async fn delete_conversation(&self, id: Uuid) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM conversations WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn add_message(&self, message: &Message) -> Result<(), StorageError> {
        let metadata = message
            .metadata
            .as_ref()
            .map(serde_json::to_value)
            .transpose()?;
        sqlx::query(&format!(
            "INSERT INTO messages ({MESSAGE_COLUMNS}) VALUES ($1,$2,$3,$4,$5,$6)"
        ))
        .bind(message.id)
        .bind(message.conversation_id)
        .bind(message.role.as_str())
        .bind(&message.content)
        .bind(metadata)
        .bind(message.created_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn get_messages(
        &self,
        conversation_id: Uuid,
    ) -> Result<Vec<Message>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages
             WHERE conversation_id = $1
             ORDER BY created_at ASC, id ASC"
        ))
        .bind(conversation_id)
        .fetch_all(self.pool())
        .await?;
        rows.iter().map(row_to_message).collect()
    }

    async fn count_messages(&self, conversation_id: Uuid) -> Result<usize, StorageError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM messages WHERE conversation_id = $1")
                .bind(conversation_id)
                .fetch_one(self.pool())
                .await?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}
