//! LLM integration and conversation heuristics for the Quento coaching
//! pipeline.
//!
//! The client is transport-only; the surrounding modules implement the
//! deterministic text machinery: classification, context assembly, response
//! cleanup, and the advisory phase-advancement heuristic.

mod advance;
mod client;
mod context;
mod error;
mod postprocess;
mod preprocess;
mod prompts;
#[cfg(test)]
mod retry_tests;
mod types;

pub use advance::{evaluate_advancement, AdvancementSignal};
pub use client::{truncate, LlmClient, MAX_RESPONSE_TOKENS, RESPONSE_TEMPERATURE};
pub use context::AnalysisContext;
pub use error::LlmError;
pub use postprocess::{postprocess_response, ProcessedResponse, QualityFlag};
pub use preprocess::{analyze_message, Intent, LengthBucket, MessageSignals, Sentiment};
pub use prompts::{fallback_response, system_prompt, welcome_message};
pub use types::{ChatMessage, ChatRequest};
