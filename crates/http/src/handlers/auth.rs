//! Authentication endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use quento_service::RegisterInput;
use serde::Deserialize;

use crate::api_error::ApiError;
use crate::envelope::ApiResponse;
use crate::extract::AuthUser;
use crate::views::{AuthView, MessageSentView, UserView};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub company_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetConfirm {
    pub token: String,
    pub password: String,
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthView>>), ApiError> {
    let payload = state
        .auth_service
        .register(RegisterInput {
            email: req.email,
            password: req.password,
            full_name: req.full_name,
            company_name: req.company_name,
        })
        .await?;
    let view = AuthView { user: payload.user.into(), tokens: payload.tokens };
    Ok((StatusCode::CREATED, Json(ApiResponse::new(view))))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthView>>, ApiError> {
    let payload = state.auth_service.login(&req.email, &req.password).await?;
    let view = AuthView { user: payload.user.into(), tokens: payload.tokens };
    Ok(Json(ApiResponse::new(view)))
}

pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<quento_auth::TokenPair>>, ApiError> {
    let tokens = state.auth_service.refresh(&req.refresh_token).await?;
    Ok(Json(ApiResponse::new(tokens)))
}

/// Tokens are stateless; logout just confirms the caller was authenticated
/// and the client discards its tokens.
pub async fn logout(AuthUser(_user): AuthUser) -> StatusCode {
    StatusCode::NO_CONTENT
}

pub async fn me(AuthUser(user): AuthUser) -> Json<ApiResponse<UserView>> {
    Json(ApiResponse::new(user.into()))
}

/// Always answers success so account existence cannot be probed. The token
/// would be emailed; without a mail integration it is only logged at debug.
pub async fn password_reset_request(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PasswordResetRequest>,
) -> Result<Json<ApiResponse<MessageSentView>>, ApiError> {
    if let Some(token) = state.auth_service.request_password_reset(&req.email).await? {
        tracing::debug!(reset_token = %token, "password reset token issued");
    }
    Ok(Json(ApiResponse::new(MessageSentView {
        message: "If an account with that email exists, a password reset link has been sent.",
    })))
}

pub async fn password_reset_confirm(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PasswordResetConfirm>,
) -> Result<Json<ApiResponse<MessageSentView>>, ApiError> {
    state.auth_service.confirm_password_reset(&req.token, &req.password).await?;
    Ok(Json(ApiResponse::new(MessageSentView {
        message: "Password has been reset successfully.",
    })))
}
