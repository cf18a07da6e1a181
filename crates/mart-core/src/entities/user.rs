use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::validation::{check_amount, check_not_blank};

/// Preferred payout method and the default amount paid through it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Payment {
    pub method: String,
    pub amount: f64,
}

/// A registered user. The password is write-only and never read back.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub institution: String,
    pub balance: f64,
    pub payment: Payment,
    /// Names of projects this user owns.
    pub projects: Vec<String>,
    /// Names of projects this user has joined as a participant.
    pub participated_projects: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Registration input for `insert_user`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub institution: String,
    #[serde(default)]
    pub projects: Vec<String>,
    #[serde(default)]
    pub participated_projects: Vec<String>,
    pub balance: f64,
    pub payment: Payment,
    pub is_active: bool,
}

impl NewUser {
    /// Check the fields the store cannot check for us.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for a blank or malformed email, a blank
    /// password, or a negative/non-finite balance or payment amount.
    pub fn validate(&self) -> Result<(), CoreError> {
        check_not_blank("email", &self.email)?;
        if !self.email.contains('@') {
            return Err(CoreError::Validation(format!(
                "email '{}' is not an address",
                self.email
            )));
        }
        check_not_blank("password", &self.password)?;
        check_amount("balance", self.balance)?;
        check_amount("payment.amount", self.payment.amount)
    }
}
