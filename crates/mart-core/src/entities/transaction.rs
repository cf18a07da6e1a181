use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::validation::{check_amount, check_not_blank};

/// A payout record linking a project to the paying and receiving users.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Transaction {
    pub transaction_id: String,
    pub project_id: String,
    /// Paying user (project owner).
    pub seller_id: String,
    /// Receiving user (participant).
    pub buyer_id: String,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}

/// Payout input for `pay`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct NewTransaction {
    pub transaction_id: String,
    pub project_id: String,
    pub seller_id: String,
    pub buyer_id: String,
    pub amount: f64,
}

impl NewTransaction {
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for a blank ID or reference, or a
    /// negative/non-finite amount.
    pub fn validate(&self) -> Result<(), CoreError> {
        check_not_blank("transaction_id", &self.transaction_id)?;
        check_not_blank("project_id", &self.project_id)?;
        check_not_blank("seller_id", &self.seller_id)?;
        check_not_blank("buyer_id", &self.buyer_id)?;
        check_amount("amount", self.amount)
    }
}
