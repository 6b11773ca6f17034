//! Core types for the Quento backend
//!
//! This crate contains domain types and configuration shared across all other crates.

mod analysis;
mod config;
mod constants;
mod conversation;
mod strategy;
mod user;

pub use analysis::*;
pub use config::*;
pub use constants::*;
pub use conversation::*;
pub use strategy::*;
pub use user::*;

use thiserror::Error;

/// Error returned when a stored enum discriminant cannot be parsed back.
#[derive(Debug, Error)]
#[error("invalid {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    #[must_use]
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self { kind, value: value.to_owned() }
    }
}
