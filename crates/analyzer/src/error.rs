//! Typed error enum for the analyzer crate.

use thiserror::Error;

/// Errors from website fetching and analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// URL failed scheme/host validation before dispatch.
    #[error("invalid website URL: {0}")]
    InvalidUrl(String),

    /// Network-level fetch failure (DNS, connect, timeout).
    #[error("fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// Target site answered with a non-success status.
    #[error("website returned HTTP {code}")]
    HttpStatus { code: u16 },
}
