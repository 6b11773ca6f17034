//! Integration tests for PgStorage.
//! Run with: DATABASE_URL=... cargo test -p quento-storage -- --ignored pg_

#![allow(clippy::unwrap_used, reason = "integration test code")]

use quento_core::{
    ActionItem, Analysis, AnalysisResults, AnalysisStatus, CategoryScores, ContentReport,
    Conversation, ConversationStatus, Effort, HeadingStructure, ImageOptimization,
    LinkStructure, Message, MessageRole, Priority, RingPhase, SeoReport, Strategy,
    StrategyStatus, User,
};
use quento_storage::traits::{AnalysisStore, ConversationStore, StrategyStore, UserStore};
use quento_storage::PgStorage;
use uuid::Uuid;

async fn create_pg_storage() -> PgStorage {
    let url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for PgStorage integration tests");
    PgStorage::connect(&url).await.expect("Failed to connect to PostgreSQL")
}

fn make_user() -> User {
    User::new(
        format!("test-{}@example.com", Uuid::new_v4()),
        "$argon2id$fake".to_owned(),
        Some("Test User".to_owned()),
        None,
    )
}

fn make_results() -> AnalysisResults {
    AnalysisResults {
        overall_score: 70,
        scores: CategoryScores { seo: 80, content: 70, mobile: 80, speed: 70, social: 50 },
        content_analysis: ContentReport {
            title: Some("Example".to_owned()),
            meta_description: None,
            word_count: 500,
            heading_structure: HeadingStructure { h1_count: 1, h2_count: 3 },
            issues: vec!["Missing meta description".to_owned()],
            recommendations: vec!["Add a compelling meta description".to_owned()],
        },
        seo_analysis: SeoReport {
            issues: Vec::new(),
            image_optimization: ImageOptimization { total: 4, with_alt: 4, score: 100.0 },
            mobile_ready: true,
            has_canonical: true,
            link_structure: LinkStructure { internal: 12, external: 3 },
        },
        competitors: Vec::new(),
        social_presence: None,
        quick_wins: vec!["Add more internal links".to_owned()],
    }
}

#[tokio::test]
#[ignore]
async fn pg_user_round_trip_and_duplicate_email() {
    let storage = create_pg_storage().await;
    let user = make_user();

    storage.create_user(&user).await.unwrap();
    let fetched = storage.get_user_by_email(&user.email).await.unwrap().unwrap();
    assert_eq!(fetched.id, user.id);
    assert!(fetched.is_active);

    let mut dup = make_user();
    dup.email = user.email.clone();
    let err = storage.create_user(&dup).await.unwrap_err();
    assert!(err.is_duplicate());
}

#[tokio::test]
#[ignore]
async fn pg_conversation_is_scoped_to_owner() {
    let storage = create_pg_storage().await;
    let owner = make_user();
    let stranger = make_user();
    storage.create_user(&owner).await.unwrap();
    storage.create_user(&stranger).await.unwrap();

    let conversation = Conversation::new(owner.id, Some("Kickoff".to_owned()), None);
    storage.create_conversation(&conversation).await.unwrap();

    let found = storage.get_conversation(conversation.id, owner.id).await.unwrap();
    assert!(found.is_some());
    assert_eq!(found.unwrap().ring_phase, RingPhase::Core);

    // Cross-user lookup is indistinguishable from a missing row.
    let hidden = storage.get_conversation(conversation.id, stranger.id).await.unwrap();
    assert!(hidden.is_none());
}

#[tokio::test]
#[ignore]
async fn pg_messages_preserve_chronological_order() {
    let storage = create_pg_storage().await;
    let user = make_user();
    storage.create_user(&user).await.unwrap();
    let conversation = Conversation::new(user.id, None, None);
    storage.create_conversation(&conversation).await.unwrap();

    for i in 0..3 {
        let message = Message::new(
            conversation.id,
            if i % 2 == 0 { MessageRole::User } else { MessageRole::Assistant },
            format!("message {i}"),
            None,
        );
        storage.add_message(&message).await.unwrap();
    }

    let messages = storage.get_messages(conversation.id).await.unwrap();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0].content, "message 0");
    assert_eq!(messages[2].content, "message 2");
    assert_eq!(storage.count_messages(conversation.id).await.unwrap(), 3);
}

#[tokio::test]
#[ignore]
async fn pg_conversation_delete_cascades_messages() {
    let storage = create_pg_storage().await;
    let user = make_user();
    storage.create_user(&user).await.unwrap();
    let conversation = Conversation::new(user.id, None, None);
    storage.create_conversation(&conversation).await.unwrap();
    storage
        .add_message(&Message::new(conversation.id, MessageRole::User, "hi".to_owned(), None))
        .await
        .unwrap();

    assert!(storage.delete_conversation(conversation.id).await.unwrap());
    assert_eq!(storage.count_messages(conversation.id).await.unwrap(), 0);
    assert!(!storage.delete_conversation(conversation.id).await.unwrap());
}

#[tokio::test]
#[ignore]
async fn pg_analysis_lifecycle() {
    let storage = create_pg_storage().await;
    let user = make_user();
    storage.create_user(&user).await.unwrap();

    let analysis = Analysis::new(user.id, "https://example.com".to_owned(), true, true);
    storage.create_analysis(&analysis).await.unwrap();

    storage.mark_analysis_processing(analysis.id).await.unwrap();
    storage.set_analysis_progress(analysis.id, 40).await.unwrap();
    // A stale checkpoint never moves progress backwards.
    storage.set_analysis_progress(analysis.id, 20).await.unwrap();
    let mid = storage.get_analysis(analysis.id, user.id).await.unwrap().unwrap();
    assert_eq!(mid.status, AnalysisStatus::Processing);
    assert_eq!(mid.progress, 40);

    storage.complete_analysis(analysis.id, &make_results()).await.unwrap();
    let done = storage.get_analysis(analysis.id, user.id).await.unwrap().unwrap();
    assert_eq!(done.status, AnalysisStatus::Completed);
    assert_eq!(done.progress, 100);
    assert_eq!(done.results.unwrap().overall_score, 70);

    let latest = storage.latest_completed_analysis(user.id).await.unwrap().unwrap();
    assert_eq!(latest.id, analysis.id);
}

#[tokio::test]
#[ignore]
async fn pg_strategy_with_action_items_cascade() {
    let storage = create_pg_storage().await;
    let user = make_user();
    storage.create_user(&user).await.unwrap();

    let mut strategy = Strategy::new(user.id, None, Some("Growth".to_owned()));
    storage.create_strategy(&strategy).await.unwrap();

    strategy.status = StrategyStatus::Ready;
    strategy.executive_summary = Some("Solid foundation".to_owned());
    strategy.key_strengths = vec!["Strong SEO foundation".to_owned()];
    storage.update_strategy_content(&strategy).await.unwrap();

    let items = vec![
        ActionItem::new(
            strategy.id,
            "Add missing meta descriptions",
            "Ensure all pages have unique meta descriptions",
            Priority::High,
            Effort::Small,
            "SEO",
            None,
        ),
        ActionItem::new(
            strategy.id,
            "Expand homepage content",
            "Add more detail about services",
            Priority::High,
            Effort::Medium,
            "Content",
            None,
        ),
    ];
    storage.insert_action_items(&items).await.unwrap();

    let fetched = storage.get_strategy(strategy.id, user.id).await.unwrap().unwrap();
    assert_eq!(fetched.status, StrategyStatus::Ready);
    assert_eq!(fetched.key_strengths.len(), 1);

    let fetched_items = storage.get_action_items(strategy.id).await.unwrap();
    assert_eq!(fetched_items.len(), 2);
    assert_eq!(fetched_items[0].title, "Add missing meta descriptions");

    let scoped = storage.get_action_item(items[0].id, user.id).await.unwrap();
    assert!(scoped.is_some());
    let other = make_user();
    storage.create_user(&other).await.unwrap();
    assert!(storage.get_action_item(items[0].id, other.id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore]
async fn pg_conversation_status_survives_round_trip() {
    let storage = create_pg_storage().await;
    let user = make_user();
    storage.create_user(&user).await.unwrap();
    let conversation = Conversation::new(user.id, None, None);
    storage.create_conversation(&conversation).await.unwrap();
    let fetched = storage.get_conversation(conversation.id, user.id).await.unwrap().unwrap();
    assert_eq!(fetched.status, ConversationStatus::Active);
}
