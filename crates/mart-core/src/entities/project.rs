use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ProjectType;
use crate::errors::CoreError;
use crate::validation::{check_amount, check_not_blank};

/// A project, identified by its `(title, owner)` pair.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Project {
    pub id: String,
    pub title: String,
    /// Owner email.
    pub owner: String,
    pub description: String,
    pub members: Vec<String>,
    pub participants: Vec<String>,
    pub is_active: bool,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Funds available for payouts.
    pub budget: f64,
    /// Amount paid to a participant per accepted survey.
    pub salary: f64,
    pub project_type: ProjectType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creation input for `insert_project`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub owner: String,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub participants: Vec<String>,
    pub is_active: bool,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub budget: f64,
    pub salary: f64,
    pub project_type: ProjectType,
}

impl NewProject {
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for a blank title or owner, an end date
    /// before the start date, or a negative/non-finite budget or salary.
    pub fn validate(&self) -> Result<(), CoreError> {
        check_not_blank("title", &self.title)?;
        check_not_blank("owner", &self.owner)?;
        if self.end_date < self.start_date {
            return Err(CoreError::Validation(format!(
                "end_date {} is before start_date {}",
                self.end_date, self.start_date
            )));
        }
        check_amount("budget", self.budget)?;
        check_amount("salary", self.salary)
    }
}
