//! Conversation management and the per-message AI response pipeline.

use std::sync::Arc;

use quento_core::{
    Conversation, Message, MessageMetadata, MessageRole, RingPhase, CHAT_HISTORY_WINDOW,
    MAX_MESSAGE_LEN,
};
use quento_llm::{
    analyze_message, evaluate_advancement, fallback_response, postprocess_response,
    system_prompt, welcome_message, AnalysisContext, ChatMessage, ChatRequest, LlmClient,
    MAX_RESPONSE_TOKENS, RESPONSE_TEMPERATURE,
};
use quento_storage::traits::{AnalysisStore, ConversationStore};
use quento_storage::PgStorage;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::error::ServiceError;

/// Advisory phase state returned with every exchange.
///
/// `should_advance` is a signal only; the stored phase changes exclusively
/// through [`ChatService::update_ring_phase`].
#[derive(Debug, Clone, Serialize)]
pub struct SessionUpdate {
    pub ring_phase: RingPhase,
    pub should_advance: bool,
    pub advancement_confidence: f64,
    pub advancement_reason: String,
}

/// Result of one user message exchange.
#[derive(Debug, Clone)]
pub struct SendMessageOutcome {
    pub user_message: Message,
    pub assistant_message: Message,
    pub session_update: SessionUpdate,
}

pub struct ChatService {
    storage: Arc<PgStorage>,
    llm: Arc<LlmClient>,
}

impl ChatService {
    #[must_use]
    pub fn new(storage: Arc<PgStorage>, llm: Arc<LlmClient>) -> Self {
        Self { storage, llm }
    }

    /// Create a conversation in the Core phase with an assistant welcome
    /// message (analysis-aware when business context is supplied).
    pub async fn create_conversation(
        &self,
        user_id: Uuid,
        title: Option<String>,
        business_context: Option<Value>,
    ) -> Result<(Conversation, Message), ServiceError> {
        let has_context = business_context.is_some();
        let conversation = Conversation::new(user_id, title, business_context);
        self.storage.create_conversation(&conversation).await?;

        let welcome = Message::new(
            conversation.id,
            MessageRole::Assistant,
            welcome_message(has_context).to_owned(),
            None,
        );
        self.storage.add_message(&welcome).await?;

        Ok((conversation, welcome))
    }

    pub async fn get_conversation(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Conversation, ServiceError> {
        self.storage
            .get_conversation(id, user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("conversation", id))
    }

    pub async fn get_conversation_detail(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<(Conversation, Vec<Message>), ServiceError> {
        let conversation = self.get_conversation(id, user_id).await?;
        let messages = self.storage.get_messages(id).await?;
        Ok((conversation, messages))
    }

    /// Most recently updated first, with message counts and the overall total.
    pub async fn list_conversations(
        &self,
        user_id: Uuid,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<(Conversation, usize)>, usize), ServiceError> {
        let page = self.storage.list_conversations(user_id, limit, offset).await?;
        let total = self.storage.count_conversations(user_id).await?;
        Ok((page, total))
    }

    /// Manual phase override: any target phase is accepted.
    pub async fn update_ring_phase(
        &self,
        id: Uuid,
        user_id: Uuid,
        phase: RingPhase,
    ) -> Result<Conversation, ServiceError> {
        let mut conversation = self.get_conversation(id, user_id).await?;
        self.storage.update_conversation_phase(id, phase).await?;
        conversation.ring_phase = phase;
        Ok(conversation)
    }

    pub async fn delete_conversation(&self, id: Uuid, user_id: Uuid) -> Result<(), ServiceError> {
        self.get_conversation(id, user_id).await?;
        self.storage.delete_conversation(id).await?;
        Ok(())
    }

    /// Run the full response pipeline for one inbound user message.
    ///
    /// Provider failures never reach the caller: the phase-keyed fallback
    /// response is stored and returned instead.
    pub async fn send_message(
        &self,
        conversation_id: Uuid,
        user_id: Uuid,
        content: &str,
        attachments: Vec<String>,
    ) -> Result<SendMessageOutcome, ServiceError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ServiceError::InvalidInput("message content is empty".to_owned()));
        }
        if content.chars().count() > MAX_MESSAGE_LEN {
            return Err(ServiceError::InvalidInput(format!(
                "message exceeds {MAX_MESSAGE_LEN} characters"
            )));
        }

        let conversation = self.get_conversation(conversation_id, user_id).await?;
        let phase = conversation.ring_phase;

        // Stage 1: pre-processing.
        let signals = analyze_message(content);
        let user_message = Message::new(
            conversation_id,
            MessageRole::User,
            content.to_owned(),
            Some(MessageMetadata {
                intent: Some(signals.intent.as_str().to_owned()),
                sentiment: Some(signals.sentiment.as_str().to_owned()),
                attachments,
            }),
        );
        self.storage.add_message(&user_message).await?;

        // Stage 2: context retrieval.
        let analysis_context = self
            .storage
            .latest_completed_analysis(user_id)
            .await?
            .and_then(|analysis| {
                analysis.results.map(|results| AnalysisContext {
                    website_url: analysis.website_url,
                    results,
                })
            });

        // Stage 3: context assembly.
        let mut system = system_prompt(phase).to_owned();
        if let Some(context) = &analysis_context {
            system.push_str(&context.render(phase));
        }
        if let Some(business_context) = &conversation.business_context {
            system.push_str("\n\nBUSINESS CONTEXT:\n");
            system.push_str(&business_context.to_string());
        }

        let history = self.storage.get_messages(conversation_id).await?;
        // History window excludes the user message just stored; it is
        // appended as the final turn.
        let prior = &history[..history.len().saturating_sub(1)];
        let window_start = prior.len().saturating_sub(CHAT_HISTORY_WINDOW);

        let mut chat_messages = Vec::with_capacity(CHAT_HISTORY_WINDOW + 2);
        chat_messages.push(ChatMessage::system(system));
        for message in &prior[window_start..] {
            let turn = match message.role {
                MessageRole::User => ChatMessage::user(message.content.clone()),
                MessageRole::Assistant | MessageRole::System => {
                    ChatMessage::assistant(message.content.clone())
                },
            };
            chat_messages.push(turn);
        }
        chat_messages.push(ChatMessage::user(content.to_owned()));

        // Stage 4: model invocation. Stage 6: fallback on any failure.
        let request = ChatRequest {
            model: self.llm.model().to_owned(),
            messages: chat_messages,
            max_tokens: MAX_RESPONSE_TOKENS,
            temperature: RESPONSE_TEMPERATURE,
        };
        let assistant_content = match self.llm.chat_completion(&request).await {
            // Stage 5: post-processing.
            Ok(raw) => postprocess_response(&raw, signals).content,
            Err(err) => {
                tracing::warn!(%err, %conversation_id, "LLM unavailable, using fallback");
                fallback_response(phase).to_owned()
            },
        };

        let assistant_message = Message::new(
            conversation_id,
            MessageRole::Assistant,
            assistant_content,
            None,
        );
        self.storage.add_message(&assistant_message).await?;
        self.storage.touch_conversation(conversation_id).await?;

        // Advisory advancement over the full history including this exchange.
        let mut full_history = history;
        full_history.push(assistant_message.clone());
        let advancement = evaluate_advancement(phase, &full_history);

        Ok(SendMessageOutcome {
            user_message,
            assistant_message,
            session_update: SessionUpdate {
                ring_phase: phase,
                should_advance: advancement.should_advance,
                advancement_confidence: advancement.confidence,
                advancement_reason: advancement.reason,
            },
        })
    }
}
