//! WebSocket connection registry.
//!
//! Injected service guarded by explicit mutual exclusion; never ambient
//! global state. Each connection registers an outbound channel; broadcast
//! fans a serialized frame out to every socket on the conversation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Handle identifying one registered connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionId(u64);

#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: Mutex<HashMap<Uuid, Vec<(u64, mpsc::UnboundedSender<String>)>>>,
    next_id: AtomicU64,
}

impl ConnectionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection on a conversation; frames broadcast to the
    /// conversation arrive on the returned receiver.
    pub async fn join(
        &self,
        conversation_id: Uuid,
    ) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.connections.lock().await.entry(conversation_id).or_default().push((id, tx));
        (ConnectionId(id), rx)
    }

    /// Remove a connection, dropping the conversation entry when empty.
    pub async fn leave(&self, conversation_id: Uuid, connection: ConnectionId) {
        let mut connections = self.connections.lock().await;
        if let Some(sockets) = connections.get_mut(&conversation_id) {
            sockets.retain(|(id, _)| *id != connection.0);
            if sockets.is_empty() {
                connections.remove(&conversation_id);
            }
        }
    }

    /// Serialize a frame once and send it to every connection on the
    /// conversation. Dead channels are pruned on the way.
    pub async fn broadcast<T: Serialize>(&self, conversation_id: Uuid, frame: &T) {
        let payload = match serde_json::to_string(frame) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::error!(%err, "failed to serialize websocket frame");
                return;
            },
        };
        let mut connections = self.connections.lock().await;
        if let Some(sockets) = connections.get_mut(&conversation_id) {
            sockets.retain(|(_, tx)| tx.send(payload.clone()).is_ok());
            if sockets.is_empty() {
                connections.remove(&conversation_id);
            }
        }
    }

    /// Number of live connections for a conversation.
    pub async fn connection_count(&self, conversation_id: Uuid) -> usize {
        self.connections.lock().await.get(&conversation_id).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn broadcast_reaches_all_members() {
        let registry = ConnectionRegistry::new();
        let conversation = Uuid::new_v4();
        let (_a, mut rx_a) = registry.join(conversation).await;
        let (_b, mut rx_b) = registry.join(conversation).await;

        registry.broadcast(conversation, &serde_json::json!({"type": "typing"})).await;

        assert!(rx_a.recv().await.unwrap().contains("typing"));
        assert!(rx_b.recv().await.unwrap().contains("typing"));
    }

    #[tokio::test]
    async fn leave_removes_connection() {
        let registry = ConnectionRegistry::new();
        let conversation = Uuid::new_v4();
        let (id, _rx) = registry.join(conversation).await;
        assert_eq!(registry.connection_count(conversation).await, 1);
        registry.leave(conversation, id).await;
        assert_eq!(registry.connection_count(conversation).await, 0);
    }

    #[tokio::test]
    async fn dropped_receivers_are_pruned_on_broadcast() {
        let registry = ConnectionRegistry::new();
        let conversation = Uuid::new_v4();
        let (_id, rx) = registry.join(conversation).await;
        drop(rx);
        registry.broadcast(conversation, &serde_json::json!({"type": "typing"})).await;
        assert_eq!(registry.connection_count(conversation).await, 0);
    }
}
