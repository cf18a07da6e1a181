//! Repository modules implementing the record operations for each collection.
//!
//! Each module adds methods to `MartService` via `impl MartService` blocks.
//! Writes return `WriteStatus`; lookups return `Option`; deletes return
//! whether a record was removed.

pub mod project;
pub mod survey;
pub mod transaction;
pub mod user;

use mart_core::enums::Collection;
use mart_core::responses::WriteStatus;

/// Log and build a failure status for a write the store refused.
pub(crate) fn rejected(collection: Collection, reason: impl Into<String>) -> WriteStatus {
    let reason = reason.into();
    tracing::warn!(%collection, "write rejected: {reason}");
    WriteStatus::failure(reason)
}
