//! Write outcome envelope.
//!
//! Every insert and mutator reports its business outcome as a `WriteStatus`.
//! Infrastructure failures (SQL errors, broken connections) are not statuses;
//! they propagate as `Err`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Outcome of a single-record write.
///
/// Serializes as `{"status":"success"}` or
/// `{"status":"failure","reason":"..."}`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WriteStatus {
    Success,
    Failure { reason: String },
}

impl WriteStatus {
    /// Build a failure status from anything displayable.
    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// The failure reason, if any.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Success => None,
            Self::Failure { reason } => Some(reason),
        }
    }
}
