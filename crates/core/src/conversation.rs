use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::ParseEnumError;

/// Coaching dialogue stage. Conversations start at `Core` and only move
/// forward through the sequence; the advancement heuristic is advisory and
/// the stored phase changes only through the explicit update operation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RingPhase {
    Core,
    Discover,
    Plan,
    Execute,
    Optimize,
}

impl RingPhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Discover => "discover",
            Self::Plan => "plan",
            Self::Execute => "execute",
            Self::Optimize => "optimize",
        }
    }

    /// Next phase in the fixed sequence, or `None` at `Optimize`.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Core => Some(Self::Discover),
            Self::Discover => Some(Self::Plan),
            Self::Plan => Some(Self::Execute),
            Self::Execute => Some(Self::Optimize),
            Self::Optimize => None,
        }
    }
}

impl std::str::FromStr for RingPhase {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "core" => Ok(Self::Core),
            "discover" => Ok(Self::Discover),
            "plan" => Ok(Self::Plan),
            "execute" => Ok(Self::Execute),
            "optimize" => Ok(Self::Optimize),
            _ => Err(ParseEnumError::new("ring phase", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConversationStatus {
    Active,
    Archived,
}

impl ConversationStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archived => "archived",
        }
    }
}

impl std::str::FromStr for ConversationStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "archived" => Ok(Self::Archived),
            _ => Err(ParseEnumError::new("conversation status", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

impl MessageRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }
}

impl std::str::FromStr for MessageRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            "system" => Ok(Self::System),
            _ => Err(ParseEnumError::new("message role", s)),
        }
    }
}

/// Coaching conversation session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: Option<String>,
    pub ring_phase: RingPhase,
    pub status: ConversationStatus,
    /// Free-form business context supplied at creation (analysis summary,
    /// business name, goals). Surfaced verbatim in the system prompt.
    pub business_context: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    #[must_use]
    pub fn new(user_id: Uuid, title: Option<String>, business_context: Option<Value>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title,
            ring_phase: RingPhase::Core,
            status: ConversationStatus::Active,
            business_context,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Structured metadata attached to a message (replaces the untyped JSON bag
/// of the earlier design).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MessageMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,
}

impl MessageMetadata {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.intent.is_none() && self.sentiment.is_none() && self.attachments.is_empty()
    }
}

/// Single chat message. Insertion order is chronological order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub role: MessageRole,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MessageMetadata>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    #[must_use]
    pub fn new(
        conversation_id: Uuid,
        role: MessageRole,
        content: String,
        metadata: Option<MessageMetadata>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            conversation_id,
            role,
            content,
            metadata,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_phase_sequence_is_linear_and_terminal() {
        assert_eq!(RingPhase::Core.next(), Some(RingPhase::Discover));
        assert_eq!(RingPhase::Discover.next(), Some(RingPhase::Plan));
        assert_eq!(RingPhase::Plan.next(), Some(RingPhase::Execute));
        assert_eq!(RingPhase::Execute.next(), Some(RingPhase::Optimize));
        assert_eq!(RingPhase::Optimize.next(), None);
    }

    #[test]
    fn ring_phase_round_trips_through_str() {
        for phase in [
            RingPhase::Core,
            RingPhase::Discover,
            RingPhase::Plan,
            RingPhase::Execute,
            RingPhase::Optimize,
        ] {
            assert_eq!(phase.as_str().parse::<RingPhase>().unwrap(), phase);
        }
        assert!("orbit".parse::<RingPhase>().is_err());
    }

    #[test]
    fn new_conversation_starts_at_core() {
        let conversation = Conversation::new(Uuid::new_v4(), None, None);
        assert_eq!(conversation.ring_phase, RingPhase::Core);
        assert_eq!(conversation.status, ConversationStatus::Active);
    }
}
