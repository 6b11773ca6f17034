//! HTTP API server for the Quento backend.

mod api_error;
mod envelope;
mod extract;
mod handlers;
mod rate_limit;
mod registry;
mod views;
mod ws;

use std::sync::Arc;

use axum::http::header::HeaderValue;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use quento_core::AppConfig;
use quento_service::{AnalysisService, AuthService, ChatService, StrategyService};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use api_error::ApiError;
pub use envelope::{ApiResponse, Meta, PageQuery, PaginatedResponse, Pagination};
pub use rate_limit::RateLimiter;
pub use registry::{ConnectionId, ConnectionRegistry};

/// Shared application state for all HTTP handlers.
pub struct AppState {
    pub config: AppConfig,
    pub auth_service: Arc<AuthService>,
    pub chat_service: Arc<ChatService>,
    pub analysis_service: Arc<AnalysisService>,
    pub strategy_service: Arc<StrategyService>,
    pub registry: ConnectionRegistry,
    pub rate_limiter: RateLimiter,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config);
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))
        .route("/auth/password-reset/request", post(handlers::auth::password_reset_request))
        .route("/auth/password-reset/confirm", post(handlers::auth::password_reset_confirm))
        .route(
            "/analysis",
            post(handlers::analysis::create_analysis).get(handlers::analysis::list_analyses),
        )
        .route("/analysis/{id}", get(handlers::analysis::get_analysis))
        .route("/analysis/{id}/status", get(handlers::analysis::get_analysis_status))
        .route(
            "/chat/conversations",
            post(handlers::chat::create_conversation).get(handlers::chat::list_conversations),
        )
        .route(
            "/chat/conversations/{id}",
            get(handlers::chat::get_conversation).delete(handlers::chat::delete_conversation),
        )
        .route("/chat/conversations/{id}/messages", post(handlers::chat::send_message))
        .route("/chat/conversations/{id}/ring", patch(handlers::chat::update_ring_phase))
        .route("/chat/ws/{id}", get(ws::ws_chat))
        .route("/strategy/generate", post(handlers::strategy::generate_strategy))
        .route("/strategy", get(handlers::strategy::list_strategies))
        .route(
            "/strategy/actions",
            patch(handlers::strategy::batch_update_action_items),
        )
        .route("/strategy/actions/{id}", patch(handlers::strategy::update_action_item))
        .route("/strategy/{id}", get(handlers::strategy::get_strategy))
        .route("/strategy/{id}/export", post(handlers::strategy::export_strategy))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> =
        config.allowed_origins.iter().filter_map(|origin| origin.parse().ok()).collect();
    CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "Quento API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "healthy",
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "healthy"}))
}
