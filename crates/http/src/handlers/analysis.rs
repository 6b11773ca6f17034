//! Website analysis endpoints.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use quento_service::AnalysisProgress;
use serde::Deserialize;
use uuid::Uuid;

use crate::api_error::ApiError;
use crate::envelope::{ApiResponse, PageQuery, PaginatedResponse};
use crate::extract::AuthUser;
use crate::views::{AnalysisResultsView, AnalysisView};
use crate::AppState;

/// Rough wall-clock estimate surfaced on creation.
const ESTIMATED_TIME_SECONDS: u32 = 60;

#[derive(Debug, Deserialize)]
pub struct AnalysisCreate {
    pub website_url: String,
    #[serde(default = "default_true")]
    pub include_competitors: bool,
    #[serde(default = "default_true")]
    pub include_social: bool,
}

const fn default_true() -> bool {
    true
}

pub async fn create_analysis(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(req): Json<AnalysisCreate>,
) -> Result<(StatusCode, Json<ApiResponse<AnalysisView>>), ApiError> {
    let analysis = state
        .analysis_service
        .create_analysis(user.id, &req.website_url, req.include_competitors, req.include_social)
        .await?;
    let view = AnalysisView::from_analysis(&analysis, Some(ESTIMATED_TIME_SECONDS));
    Ok((StatusCode::CREATED, Json(ApiResponse::new(view))))
}

pub async fn list_analyses(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(page): Query<PageQuery>,
) -> Result<Json<PaginatedResponse<AnalysisView>>, ApiError> {
    let limit = page.capped_limit();
    let (analyses, total) =
        state.analysis_service.list_analyses(user.id, limit, page.offset).await?;
    let views =
        analyses.iter().map(|analysis| AnalysisView::from_analysis(analysis, None)).collect();
    Ok(Json(PaginatedResponse::new(views, total, limit, page.offset)))
}

pub async fn get_analysis(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(analysis_id): Path<Uuid>,
) -> Result<Json<ApiResponse<AnalysisResultsView>>, ApiError> {
    let analysis = state.analysis_service.get_analysis(analysis_id, user.id).await?;
    Ok(Json(ApiResponse::new(analysis.into())))
}

pub async fn get_analysis_status(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(analysis_id): Path<Uuid>,
) -> Result<Json<ApiResponse<AnalysisProgress>>, ApiError> {
    let progress = state.analysis_service.get_status(analysis_id, user.id).await?;
    Ok(Json(ApiResponse::new(progress)))
}
