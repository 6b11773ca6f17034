//! Service-layer integration tests against a real PostgreSQL database.
//! Run with: DATABASE_URL=... cargo test -p quento-service -- --ignored

#![allow(clippy::unwrap_used, reason = "integration test code")]

use std::sync::Arc;

use quento_auth::TokenIssuer;
use quento_core::{MessageRole, RingPhase};
use quento_llm::LlmClient;
use quento_service::{
    start_job_worker, AnalysisService, AuthService, ChatService, RegisterInput, ServiceError,
};
use quento_storage::PgStorage;
use uuid::Uuid;

async fn storage() -> Arc<PgStorage> {
    let url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for service integration tests");
    Arc::new(PgStorage::connect(&url).await.expect("Failed to connect to PostgreSQL"))
}

fn auth_service(storage: Arc<PgStorage>) -> AuthService {
    AuthService::new(storage, TokenIssuer::new("integration-secret", 15, 7), None)
}

fn chat_service(storage: Arc<PgStorage>) -> ChatService {
    let llm = LlmClient::new(
        "unused-key".to_owned(),
        "http://127.0.0.1:9".to_owned(),
        "test-model".to_owned(),
    )
    .unwrap();
    ChatService::new(storage, Arc::new(llm))
}

fn unique_email() -> String {
    format!("svc-{}@example.com", Uuid::new_v4())
}

fn register_input(email: &str) -> RegisterInput {
    RegisterInput {
        email: email.to_owned(),
        password: "Secret123!".to_owned(),
        full_name: Some("Integration Tester".to_owned()),
        company_name: None,
    }
}

#[tokio::test]
#[ignore]
async fn register_then_login_yields_same_user_id() {
    let storage = storage().await;
    let auth = auth_service(Arc::clone(&storage));
    let email = unique_email();

    let registered = auth.register(register_input(&email)).await.unwrap();
    let logged_in = auth.login(&email, "Secret123!").await.unwrap();

    assert_eq!(registered.user.id, logged_in.user.id);
    assert_eq!(logged_in.user.email, email);

    // The issued access token resolves back to the same user.
    let resolved = auth.authenticate(&registered.tokens.access_token).await.unwrap();
    assert_eq!(resolved.id, registered.user.id);
}

#[tokio::test]
#[ignore]
async fn duplicate_registration_is_rejected() {
    let storage = storage().await;
    let auth = auth_service(Arc::clone(&storage));
    let email = unique_email();

    auth.register(register_input(&email)).await.unwrap();
    let err = auth.register(register_input(&email)).await.unwrap_err();
    assert!(matches!(err, ServiceError::UserExists(_)));
}

#[tokio::test]
#[ignore]
async fn weak_password_rejected_before_any_write() {
    let storage = storage().await;
    let auth = auth_service(Arc::clone(&storage));
    let email = unique_email();

    let mut input = register_input(&email);
    input.password = "nodigits!".to_owned();
    assert!(auth.register(input).await.is_err());
    // Nothing was persisted, so a good registration still succeeds.
    assert!(auth.register(register_input(&email)).await.is_ok());
}

#[tokio::test]
#[ignore]
async fn new_conversation_starts_at_core_with_welcome() {
    let storage = storage().await;
    let auth = auth_service(Arc::clone(&storage));
    let chat = chat_service(Arc::clone(&storage));

    let user = auth.register(register_input(&unique_email())).await.unwrap().user;
    let (conversation, welcome) =
        chat.create_conversation(user.id, Some("Kickoff".to_owned()), None).await.unwrap();

    assert_eq!(conversation.ring_phase, RingPhase::Core);
    assert_eq!(welcome.role, MessageRole::Assistant);

    let (_, messages) =
        chat.get_conversation_detail(conversation.id, user.id).await.unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role, MessageRole::Assistant);
}

#[tokio::test]
#[ignore]
async fn manual_ring_override_accepts_any_phase() {
    let storage = storage().await;
    let auth = auth_service(Arc::clone(&storage));
    let chat = chat_service(Arc::clone(&storage));

    let user = auth.register(register_input(&unique_email())).await.unwrap().user;
    let (conversation, _) = chat.create_conversation(user.id, None, None).await.unwrap();

    // Non-adjacent jump straight to Optimize.
    let updated = chat
        .update_ring_phase(conversation.id, user.id, RingPhase::Optimize)
        .await
        .unwrap();
    assert_eq!(updated.ring_phase, RingPhase::Optimize);
}

#[tokio::test]
#[ignore]
async fn invalid_url_rejected_before_dispatch() {
    let storage = storage().await;
    let auth = auth_service(Arc::clone(&storage));
    let analyses = AnalysisService::new(Arc::clone(&storage), start_job_worker(Arc::clone(&storage)));

    let user = auth.register(register_input(&unique_email())).await.unwrap().user;
    let err = analyses
        .create_analysis(user.id, "not-a-valid-url", true, true)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Analyzer(_)));

    // No row was created for the rejected request.
    let (listed, total) = analyses.list_analyses(user.id, 10, 0).await.unwrap();
    assert!(listed.is_empty());
    assert_eq!(total, 0);
}

#[tokio::test]
#[ignore]
async fn password_reset_round_trip() {
    let storage = storage().await;
    let auth = auth_service(Arc::clone(&storage));
    let email = unique_email();
    auth.register(register_input(&email)).await.unwrap();

    let token = auth.request_password_reset(&email).await.unwrap().unwrap();
    auth.confirm_password_reset(&token, "NewSecret456!").await.unwrap();

    assert!(auth.login(&email, "Secret123!").await.is_err());
    assert!(auth.login(&email, "NewSecret456!").await.is_ok());

    // Unknown account: no token, same outward behavior.
    assert!(auth.request_password_reset(&unique_email()).await.unwrap().is_none());
}
