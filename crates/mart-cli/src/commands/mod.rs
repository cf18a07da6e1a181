pub mod demo;
pub mod dispatch;
pub mod ping;
pub mod project;
pub mod survey;
pub mod transaction;
pub mod user;

use mart_core::responses::WriteStatus;

use crate::cli::GlobalFlags;
use crate::output::output;

/// Print a write status, then turn a failure into a command error.
fn report(status: &WriteStatus, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(status, flags.format)?;
    match status.reason() {
        Some(reason) => anyhow::bail!("{reason}"),
        None => Ok(()),
    }
}

/// Print a record, or fail when it does not exist.
fn found<T: serde::Serialize>(
    record: Option<T>,
    what: &str,
    key: &str,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match record {
        Some(record) => output(&record, flags.format),
        None => anyhow::bail!("{what} not found: {key}"),
    }
}
