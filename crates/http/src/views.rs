//! Response body types (Serialize).

use chrono::{DateTime, Utc};
use quento_auth::TokenPair;
use quento_core::{
    ActionItem, Analysis, AnalysisResults, AnalysisStatus, Conversation, ConversationStatus,
    Message, Recommendation, RingPhase, Strategy, StrategyStatus, User,
};
use quento_service::SessionUpdate;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub company_name: Option<String>,
    pub current_ring: i32,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            company_name: user.company_name,
            current_ring: user.current_ring,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthView {
    pub user: UserView,
    pub tokens: TokenPair,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageSentView {
    pub message: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversationView {
    pub id: Uuid,
    pub title: Option<String>,
    pub ring_phase: RingPhase,
    pub status: ConversationStatus,
    pub message_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationView {
    #[must_use]
    pub fn from_conversation(conversation: Conversation, message_count: usize) -> Self {
        Self {
            id: conversation.id,
            title: conversation.title,
            ring_phase: conversation.ring_phase,
            status: conversation.status,
            message_count,
            created_at: conversation.created_at,
            updated_at: conversation.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversationDetailView {
    pub id: Uuid,
    pub title: Option<String>,
    pub ring_phase: RingPhase,
    pub status: ConversationStatus,
    pub business_context: Option<Value>,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationDetailView {
    #[must_use]
    pub fn from_parts(conversation: Conversation, messages: Vec<Message>) -> Self {
        Self {
            id: conversation.id,
            title: conversation.title,
            ring_phase: conversation.ring_phase,
            status: conversation.status,
            business_context: conversation.business_context,
            messages,
            created_at: conversation.created_at,
            updated_at: conversation.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SendMessageView {
    pub user_message: Message,
    pub assistant_message: Message,
    pub session_update: SessionUpdate,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisView {
    pub id: Uuid,
    pub website_url: String,
    pub status: AnalysisStatus,
    pub progress: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_time_seconds: Option<u32>,
    pub created_at: DateTime<Utc>,
}

impl AnalysisView {
    #[must_use]
    pub fn from_analysis(analysis: &Analysis, estimated_time_seconds: Option<u32>) -> Self {
        Self {
            id: analysis.id,
            website_url: analysis.website_url.clone(),
            status: analysis.status,
            progress: analysis.progress,
            estimated_time_seconds,
            created_at: analysis.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResultsView {
    pub id: Uuid,
    pub website_url: String,
    pub status: AnalysisStatus,
    pub progress: i32,
    pub results: Option<AnalysisResults>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<Analysis> for AnalysisResultsView {
    fn from(analysis: Analysis) -> Self {
        Self {
            id: analysis.id,
            website_url: analysis.website_url,
            status: analysis.status,
            progress: analysis.progress,
            results: analysis.results,
            error_message: analysis.error_message,
            created_at: analysis.created_at,
            completed_at: analysis.completed_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StrategyView {
    pub id: Uuid,
    pub title: Option<String>,
    pub status: StrategyStatus,
    pub executive_summary: Option<String>,
    pub vision_statement: Option<String>,
    pub key_strengths: Vec<String>,
    pub critical_gaps: Vec<String>,
    pub recommendations: Vec<Recommendation>,
    pub action_items: Vec<ActionItem>,
    pub ninety_day_priorities: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StrategyView {
    #[must_use]
    pub fn from_parts(strategy: Strategy, action_items: Vec<ActionItem>) -> Self {
        Self {
            id: strategy.id,
            title: strategy.title,
            status: strategy.status,
            executive_summary: strategy.executive_summary,
            vision_statement: strategy.vision_statement,
            key_strengths: strategy.key_strengths,
            critical_gaps: strategy.critical_gaps,
            recommendations: strategy.recommendations,
            action_items,
            ninety_day_priorities: strategy.ninety_day_priorities,
            created_at: strategy.created_at,
            updated_at: strategy.updated_at,
        }
    }
}
