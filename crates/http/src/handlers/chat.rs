//! Conversation and message endpoints.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use quento_core::RingPhase;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::api_error::ApiError;
use crate::envelope::{ApiResponse, PageQuery, PaginatedResponse};
use crate::extract::AuthUser;
use crate::views::{ConversationDetailView, ConversationView, SendMessageView};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ConversationCreate {
    pub title: Option<String>,
    pub initial_context: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct MessageCreate {
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RingUpdate {
    pub ring_phase: RingPhase,
}

pub async fn create_conversation(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    body: Option<Json<ConversationCreate>>,
) -> Result<(StatusCode, Json<ApiResponse<ConversationView>>), ApiError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let (conversation, _welcome) = state
        .chat_service
        .create_conversation(user.id, req.title, req.initial_context)
        .await?;
    // The welcome message is the only message so far.
    let view = ConversationView::from_conversation(conversation, 1);
    Ok((StatusCode::CREATED, Json(ApiResponse::new(view))))
}

pub async fn list_conversations(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(page): Query<PageQuery>,
) -> Result<Json<PaginatedResponse<ConversationView>>, ApiError> {
    let limit = page.capped_limit();
    let (conversations, total) =
        state.chat_service.list_conversations(user.id, limit, page.offset).await?;
    let views = conversations
        .into_iter()
        .map(|(conversation, count)| ConversationView::from_conversation(conversation, count))
        .collect();
    Ok(Json(PaginatedResponse::new(views, total, limit, page.offset)))
}

pub async fn get_conversation(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(conversation_id): Path<Uuid>,
) -> Result<Json<ApiResponse<ConversationDetailView>>, ApiError> {
    let (conversation, messages) =
        state.chat_service.get_conversation_detail(conversation_id, user.id).await?;
    Ok(Json(ApiResponse::new(ConversationDetailView::from_parts(conversation, messages))))
}

pub async fn send_message(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(conversation_id): Path<Uuid>,
    Json(req): Json<MessageCreate>,
) -> Result<Json<ApiResponse<SendMessageView>>, ApiError> {
    state.rate_limiter.check(user.id)?;

    let outcome = state
        .chat_service
        .send_message(conversation_id, user.id, &req.content, req.attachments)
        .await?;

    state
        .registry
        .broadcast(
            conversation_id,
            &serde_json::json!({
                "type": "message",
                "user_message": &outcome.user_message,
                "assistant_message": &outcome.assistant_message,
                "session_update": &outcome.session_update,
            }),
        )
        .await;

    Ok(Json(ApiResponse::new(SendMessageView {
        user_message: outcome.user_message,
        assistant_message: outcome.assistant_message,
        session_update: outcome.session_update,
    })))
}

pub async fn update_ring_phase(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(conversation_id): Path<Uuid>,
    Json(req): Json<RingUpdate>,
) -> Result<Json<ApiResponse<ConversationView>>, ApiError> {
    let conversation = state
        .chat_service
        .update_ring_phase(conversation_id, user.id, req.ring_phase)
        .await?;
    let message_count = state
        .chat_service
        .get_conversation_detail(conversation_id, user.id)
        .await?
        .1
        .len();
    Ok(Json(ApiResponse::new(ConversationView::from_conversation(
        conversation,
        message_count,
    ))))
}

pub async fn delete_conversation(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(conversation_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.chat_service.delete_conversation(conversation_id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
