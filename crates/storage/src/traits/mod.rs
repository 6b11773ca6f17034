//! Store traits, split by entity.
//!
//! Service-layer code depends on these traits rather than on `PgStorage`
//! directly, which keeps the business logic testable against fakes.

mod analysis;
mod conversation;
mod strategy;
mod user;

pub use analysis::AnalysisStore;
pub use conversation::ConversationStore;
pub use strategy::StrategyStore;
pub use user::UserStore;
