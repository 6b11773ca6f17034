//! Service layer for the Quento backend.
//!
//! Centralizes business logic between HTTP handlers and storage/auth/llm/
//! analyzer, including the background job queue.

mod analysis_service;
mod auth_service;
mod chat_service;
mod error;
mod jobs;
mod strategy_service;

pub use analysis_service::{AnalysisProgress, AnalysisService};
pub use auth_service::{AuthPayload, AuthService, RegisterInput};
pub use chat_service::{ChatService, SendMessageOutcome, SessionUpdate};
pub use error::ServiceError;
pub use jobs::{start_job_worker, Job, JobQueue};
pub use strategy_service::{
    build_strategy_document, ActionItemUpdate, ExportReceipt, GeneratedStrategy,
    StrategyService,
};
