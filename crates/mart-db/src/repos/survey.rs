//! Survey repository: keyed by `(seller_id, buyer_id, project_id)`.

use chrono::Utc;

use mart_core::entities::{NewSurvey, Survey, SurveyKey};
use mart_core::enums::Collection;
use mart_core::ids::PREFIX_SURVEY;
use mart_core::responses::WriteStatus;

use crate::error::DatabaseError;
use crate::helpers::{get_flag, parse_datetime, parse_json, to_json};
use crate::repos::rejected;
use crate::service::MartService;

const KEY_FILTER: &str = "seller_id = ?1 AND buyer_id = ?2 AND project_id = ?3";

fn row_to_survey(row: &libsql::Row) -> Result<Survey, DatabaseError> {
    Ok(Survey {
        id: row.get::<String>(0)?,
        key: SurveyKey {
            seller_id: row.get::<String>(1)?,
            buyer_id: row.get::<String>(2)?,
            project_id: row.get::<String>(3)?,
        },
        content: row.get::<String>(4)?,
        answers: parse_json(&row.get::<String>(5)?)?,
        is_accepted: get_flag(row, 6)?,
        feedback: row.get::<String>(7)?,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
        updated_at: parse_datetime(&row.get::<String>(9)?)?,
    })
}

impl MartService {
    pub async fn insert_survey(&self, survey: &NewSurvey) -> Result<WriteStatus, DatabaseError> {
        if let Err(e) = survey.key.validate() {
            return Ok(rejected(Collection::Surveys, e.to_string()));
        }

        let now = Utc::now().to_rfc3339();
        let id = self.db().generate_id(PREFIX_SURVEY).await?;
        let key = &survey.key;

        let inserted = self
            .db()
            .conn()
            .execute(
                "INSERT INTO surveys (id, seller_id, buyer_id, project_id, content, answers,
                    is_accepted, feedback, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                 ON CONFLICT(seller_id, buyer_id, project_id) DO NOTHING",
                libsql::params![
                    id.as_str(),
                    key.seller_id.as_str(),
                    key.buyer_id.as_str(),
                    key.project_id.as_str(),
                    survey.content.as_str(),
                    to_json(&survey.answers)?,
                    survey.is_accepted,
                    survey.feedback.as_str(),
                    now.as_str(),
                    now.as_str()
                ],
            )
            .await?;

        if inserted == 0 {
            return Ok(rejected(
                Collection::Surveys,
                format!("survey {key} already exists"),
            ));
        }

        tracing::debug!(%id, %key, "survey inserted");
        Ok(WriteStatus::Success)
    }

    pub async fn get_survey(&self, key: &SurveyKey) -> Result<Option<Survey>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT id, seller_id, buyer_id, project_id, content, answers, is_accepted,
                        feedback, created_at, updated_at
                     FROM surveys WHERE {KEY_FILTER}"
                ),
                libsql::params_from_iter(key_params(key)),
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_survey(&row)?)),
            None => Ok(None),
        }
    }

    /// The questionnaire text, for the participant to read.
    pub async fn get_survey_content(
        &self,
        key: &SurveyKey,
    ) -> Result<Option<String>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT content FROM surveys WHERE {KEY_FILTER}"),
                libsql::params_from_iter(key_params(key)),
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row.get::<String>(0)?)),
            None => Ok(None),
        }
    }

    /// Replace the survey's answers.
    pub async fn answer_survey(
        &self,
        key: &SurveyKey,
        answers: &[String],
    ) -> Result<WriteStatus, DatabaseError> {
        let updated = self
            .db()
            .conn()
            .execute(
                &format!("UPDATE surveys SET answers = ?4, updated_at = ?5 WHERE {KEY_FILTER}"),
                libsql::params![
                    key.seller_id.as_str(),
                    key.buyer_id.as_str(),
                    key.project_id.as_str(),
                    to_json(answers)?,
                    Utc::now().to_rfc3339()
                ],
            )
            .await?;

        if updated == 0 {
            return Ok(rejected(Collection::Surveys, format!("no survey {key}")));
        }
        tracing::debug!(%key, answers = answers.len(), "survey answered");
        Ok(WriteStatus::Success)
    }

    /// Accept the survey if it has at least one non-blank answer.
    ///
    /// Returns `false` for a missing or unanswered survey and leaves it untouched.
    pub async fn verify_survey(&self, key: &SurveyKey) -> Result<bool, DatabaseError> {
        let Some(survey) = self.get_survey(key).await? else {
            tracing::warn!(%key, "verify: no such survey");
            return Ok(false);
        };
        if !survey.answers.iter().any(|a| !a.trim().is_empty()) {
            tracing::warn!(%key, "verify: survey has no answers");
            return Ok(false);
        }

        self.db()
            .conn()
            .execute(
                "UPDATE surveys SET is_accepted = 1, updated_at = ?1 WHERE id = ?2",
                libsql::params![Utc::now().to_rfc3339(), survey.id.as_str()],
            )
            .await?;
        tracing::debug!(%key, "survey accepted");
        Ok(true)
    }

    pub async fn give_feedback(
        &self,
        key: &SurveyKey,
        feedback: &str,
    ) -> Result<WriteStatus, DatabaseError> {
        let updated = self
            .db()
            .conn()
            .execute(
                &format!("UPDATE surveys SET feedback = ?4, updated_at = ?5 WHERE {KEY_FILTER}"),
                libsql::params![
                    key.seller_id.as_str(),
                    key.buyer_id.as_str(),
                    key.project_id.as_str(),
                    feedback,
                    Utc::now().to_rfc3339()
                ],
            )
            .await?;

        if updated == 0 {
            return Ok(rejected(Collection::Surveys, format!("no survey {key}")));
        }
        Ok(WriteStatus::Success)
    }

    /// Returns whether a survey was removed.
    pub async fn delete_survey(&self, key: &SurveyKey) -> Result<bool, DatabaseError> {
        let deleted = self
            .db()
            .conn()
            .execute(
                &format!("DELETE FROM surveys WHERE {KEY_FILTER}"),
                libsql::params_from_iter(key_params(key)),
            )
            .await?;
        tracing::debug!(%key, deleted, "delete survey");
        Ok(deleted > 0)
    }
}

fn key_params(key: &SurveyKey) -> Vec<libsql::Value> {
    vec![
        key.seller_id.as_str().into(),
        key.buyer_id.as_str().into(),
        key.project_id.as_str().into(),
    ]
}
