//! Cross-cutting error types for Mart.
//!
//! Domain-specific errors (e.g., `DatabaseError`, `WorkflowError`) are defined
//! in their respective crates. `anyhow` collapses them in `mart-cli`.

use thiserror::Error;

/// Errors raised while checking entity input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Data failed validation (amounts, date ranges, blank keys).
    #[error("Validation error: {0}")]
    Validation(String),
}
