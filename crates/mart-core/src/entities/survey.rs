use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::validation::check_not_blank;

/// Natural key of a survey: who issued it, who answers it, and for which project.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub struct SurveyKey {
    /// User ID of the project owner issuing the survey.
    pub seller_id: String,
    /// User ID of the participant answering it.
    pub buyer_id: String,
    pub project_id: String,
}

impl SurveyKey {
    pub fn new(
        seller_id: impl Into<String>,
        buyer_id: impl Into<String>,
        project_id: impl Into<String>,
    ) -> Self {
        Self {
            seller_id: seller_id.into(),
            buyer_id: buyer_id.into(),
            project_id: project_id.into(),
        }
    }

    /// # Errors
    ///
    /// Returns `CoreError::Validation` if any part of the key is blank.
    pub fn validate(&self) -> Result<(), CoreError> {
        check_not_blank("seller_id", &self.seller_id)?;
        check_not_blank("buyer_id", &self.buyer_id)?;
        check_not_blank("project_id", &self.project_id)
    }
}

impl std::fmt::Display for SurveyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.seller_id, self.buyer_id, self.project_id)
    }
}

/// Post-collaboration questionnaire tying a buyer, seller, and project together.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Survey {
    pub id: String,
    #[serde(flatten)]
    pub key: SurveyKey,
    pub content: String,
    pub answers: Vec<String>,
    pub is_accepted: bool,
    pub feedback: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creation input for `insert_survey`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewSurvey {
    #[serde(flatten)]
    pub key: SurveyKey,
    pub content: String,
    #[serde(default)]
    pub answers: Vec<String>,
    #[serde(default)]
    pub is_accepted: bool,
    #[serde(default)]
    pub feedback: String,
}

impl NewSurvey {
    /// A fresh, unanswered survey.
    pub fn new(key: SurveyKey, content: impl Into<String>) -> Self {
        Self {
            key,
            content: content.into(),
            answers: Vec::new(),
            is_accepted: false,
            feedback: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_flattens_into_survey_json() {
        let survey = NewSurvey::new(SurveyKey::new("usr-1", "usr-2", "prj-1"), "How was it?");
        let json = serde_json::to_value(&survey).unwrap();
        assert_eq!(json["seller_id"], "usr-1");
        assert_eq!(json["buyer_id"], "usr-2");
        assert_eq!(json["project_id"], "prj-1");
        assert_eq!(json["answers"], serde_json::json!([]));
    }

    #[test]
    fn blank_key_part_is_rejected() {
        assert!(SurveyKey::new("usr-1", "", "prj-1").validate().is_err());
        assert!(SurveyKey::new("usr-1", "usr-2", "prj-1").validate().is_ok());
    }

    #[test]
    fn key_display() {
        let key = SurveyKey::new("a", "b", "c");
        assert_eq!(key.to_string(), "a/b/c");
    }
}
