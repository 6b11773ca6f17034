//! Strategy and action-item endpoints.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use quento_core::{ActionItem, ActionStatus};
use quento_service::{ActionItemUpdate, ExportReceipt};
use serde::Deserialize;
use uuid::Uuid;

use crate::api_error::ApiError;
use crate::envelope::{ApiResponse, PageQuery, PaginatedResponse};
use crate::extract::AuthUser;
use crate::views::StrategyView;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct StrategyGenerateRequest {
    pub analysis_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ActionUpdateRequest {
    pub action_id: Uuid,
    pub status: ActionStatus,
    pub notes: Option<String>,
}

impl From<ActionUpdateRequest> for ActionItemUpdate {
    fn from(req: ActionUpdateRequest) -> Self {
        Self { action_id: req.action_id, status: req.status, notes: req.notes }
    }
}

#[derive(Debug, Deserialize)]
pub struct ActionBatchRequest {
    pub updates: Vec<ActionUpdateRequest>,
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub format: String,
}

pub async fn generate_strategy(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(req): Json<StrategyGenerateRequest>,
) -> Result<(StatusCode, Json<ApiResponse<StrategyView>>), ApiError> {
    let strategy = state.strategy_service.generate_strategy(user.id, req.analysis_id).await?;
    // Content is still generating; action items arrive with it.
    let view = StrategyView::from_parts(strategy, Vec::new());
    Ok((StatusCode::CREATED, Json(ApiResponse::new(view))))
}

pub async fn list_strategies(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(page): Query<PageQuery>,
) -> Result<Json<PaginatedResponse<StrategyView>>, ApiError> {
    let limit = page.capped_limit();
    let (strategies, total) =
        state.strategy_service.list_strategies(user.id, limit, page.offset).await?;
    let views = strategies
        .into_iter()
        .map(|(strategy, items)| StrategyView::from_parts(strategy, items))
        .collect();
    Ok(Json(PaginatedResponse::new(views, total, limit, page.offset)))
}

pub async fn get_strategy(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(strategy_id): Path<Uuid>,
) -> Result<Json<ApiResponse<StrategyView>>, ApiError> {
    let (strategy, items) =
        state.strategy_service.get_strategy_detail(strategy_id, user.id).await?;
    Ok(Json(ApiResponse::new(StrategyView::from_parts(strategy, items))))
}

pub async fn update_action_item(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(action_id): Path<Uuid>,
    Json(req): Json<ActionUpdateRequest>,
) -> Result<Json<ApiResponse<ActionItem>>, ApiError> {
    if req.action_id != action_id {
        return Err(ApiError::Validation(
            "Action ID in path and body must match".to_owned(),
        ));
    }
    let item = state.strategy_service.update_action_item(user.id, req.into()).await?;
    Ok(Json(ApiResponse::new(item)))
}

/// Batch variant; items not visible to this user are skipped, not errors.
pub async fn batch_update_action_items(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(req): Json<ActionBatchRequest>,
) -> Result<Json<ApiResponse<Vec<ActionItem>>>, ApiError> {
    let updates = req.updates.into_iter().map(Into::into).collect();
    let items = state.strategy_service.batch_update_action_items(user.id, updates).await?;
    Ok(Json(ApiResponse::new(items)))
}

pub async fn export_strategy(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(strategy_id): Path<Uuid>,
    Json(req): Json<ExportRequest>,
) -> Result<Json<ApiResponse<ExportReceipt>>, ApiError> {
    let receipt =
        state.strategy_service.export_strategy(strategy_id, user.id, &req.format).await?;
    Ok(Json(ApiResponse::new(receipt)))
}
