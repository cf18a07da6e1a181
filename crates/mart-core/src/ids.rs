//! ID prefix constants.
//!
//! Generated IDs have the form `{prefix}-{8 hex chars}`, e.g. `usr-a3f8b2c1`.
//! Transactions carry caller-supplied IDs and have no prefix.

pub const PREFIX_USER: &str = "usr";
pub const PREFIX_PROJECT: &str = "prj";
pub const PREFIX_SURVEY: &str = "srv";

/// Every prefix the database generates IDs for.
pub const ALL_PREFIXES: &[&str] = &[PREFIX_USER, PREFIX_PROJECT, PREFIX_SURVEY];
