//! Cross-collection workflows.
//!
//! Each step is a single-record repo call; there is no enclosing database
//! transaction. When a later step is refused after an earlier one moved
//! money, the earlier step is reversed before the error is returned.

use serde::Serialize;
use thiserror::Error;

use mart_core::entities::{NewProject, NewSurvey, NewTransaction, SurveyKey, Transaction};
use mart_core::enums::Collection;
use mart_core::responses::WriteStatus;

use crate::error::DatabaseError;
use crate::service::MartService;

#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A record the workflow depends on does not exist.
    #[error("{collection} not found: {key}")]
    NotFound { collection: Collection, key: String },

    /// Payout was requested for a survey that does not verify.
    #[error("survey {0} is not verified")]
    NotVerified(SurveyKey),

    /// The participant was already paid for this survey.
    #[error("survey {key} already paid by transaction {transaction_id}")]
    AlreadyPaid {
        key: SurveyKey,
        transaction_id: String,
    },

    /// A repo call returned a failure status.
    #[error("{step} rejected: {reason}")]
    Rejected { step: &'static str, reason: String },

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

fn require(step: &'static str, status: WriteStatus) -> Result<(), WorkflowError> {
    match status {
        WriteStatus::Success => Ok(()),
        WriteStatus::Failure { reason } => Err(WorkflowError::Rejected { step, reason }),
    }
}

fn not_found(collection: Collection, key: impl Into<String>) -> WorkflowError {
    WorkflowError::NotFound {
        collection,
        key: key.into(),
    }
}

/// Records to remove at the end of a workflow run.
#[derive(Debug, Clone, Default)]
pub struct Cleanup {
    pub transaction_ids: Vec<String>,
    pub surveys: Vec<SurveyKey>,
    /// `(title, owner)` pairs.
    pub projects: Vec<(String, String)>,
    pub user_emails: Vec<String>,
}

/// How many records `cleanup` actually removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    pub transactions: u32,
    pub surveys: u32,
    pub projects: u32,
    pub users: u32,
}

impl MartService {
    /// Insert a project for an existing user and list it among their owned projects.
    ///
    /// Returns the new project ID.
    pub async fn create_project(&self, project: &NewProject) -> Result<String, WorkflowError> {
        if self.get_user(&project.owner).await?.is_none() {
            return Err(not_found(Collection::Users, &project.owner));
        }
        require("insert project", self.insert_project(project).await?)?;
        require(
            "record owned project",
            self.add_owned_project(&project.owner, &project.title).await?,
        )?;

        let id = self
            .get_project_id(&project.title, &project.owner)
            .await?
            .ok_or(DatabaseError::NoResult)?;
        tracing::info!(%id, title = %project.title, "project created");
        Ok(id)
    }

    /// Move `amount` from the owner's balance into the project's budget.
    pub async fn fund_project(
        &self,
        owner_email: &str,
        title: &str,
        amount: f64,
    ) -> Result<(), WorkflowError> {
        if self.get_project(title, owner_email).await?.is_none() {
            return Err(not_found(Collection::Projects, format!("{title} ({owner_email})")));
        }

        require(
            "debit owner",
            self.decrease_balance(owner_email, amount).await?,
        )?;
        let funded = self.add_fund_to_project(title, owner_email, amount).await?;
        if let WriteStatus::Failure { reason } = funded {
            require(
                "refund owner",
                self.increase_balance(owner_email, amount).await?,
            )?;
            return Err(WorkflowError::Rejected {
                step: "fund project",
                reason,
            });
        }

        tracing::info!(title, owner_email, amount, "project funded from owner balance");
        Ok(())
    }

    /// Join the participant to the project and issue them a survey.
    ///
    /// Returns the survey key `(owner id, participant id, project id)`.
    pub async fn join_and_issue_survey(
        &self,
        title: &str,
        owner_email: &str,
        participant_email: &str,
        content: &str,
    ) -> Result<SurveyKey, WorkflowError> {
        let owner = self
            .get_user(owner_email)
            .await?
            .ok_or_else(|| not_found(Collection::Users, owner_email))?;
        let participant = self
            .get_user(participant_email)
            .await?
            .ok_or_else(|| not_found(Collection::Users, participant_email))?;
        let project = self
            .get_project(title, owner_email)
            .await?
            .ok_or_else(|| not_found(Collection::Projects, format!("{title} ({owner_email})")))?;

        require(
            "join project",
            self.join_project(title, owner_email, participant_email)
                .await?,
        )?;
        require(
            "record participation",
            self.add_participated_project(participant_email, title)
                .await?,
        )?;

        let key = SurveyKey::new(owner.id, participant.id, project.id);
        require(
            "issue survey",
            self.insert_survey(&NewSurvey::new(key.clone(), content))
                .await?,
        )?;

        tracing::info!(%key, "participant joined and survey issued");
        Ok(key)
    }

    /// Verify the survey, leave feedback, and pay the project's salary to the
    /// participant out of the project budget.
    ///
    /// Nothing is paid unless verification succeeds, and each survey is paid
    /// at most once.
    pub async fn settle_survey(
        &self,
        key: &SurveyKey,
        feedback: &str,
        transaction_id: &str,
    ) -> Result<Transaction, WorkflowError> {
        if let Some(paid) = self.payout_for_survey(key).await? {
            return Err(WorkflowError::AlreadyPaid {
                key: key.clone(),
                transaction_id: paid.transaction_id,
            });
        }
        if !self.verify_survey(key).await? {
            return Err(WorkflowError::NotVerified(key.clone()));
        }
        require("give feedback", self.give_feedback(key, feedback).await?)?;

        let project = self
            .get_project_by_id(&key.project_id)
            .await?
            .ok_or_else(|| not_found(Collection::Projects, &key.project_id))?;
        if self.get_user_by_id(&key.seller_id).await?.is_none() {
            return Err(not_found(Collection::Users, &key.seller_id));
        }
        let buyer = self
            .get_user_by_id(&key.buyer_id)
            .await?
            .ok_or_else(|| not_found(Collection::Users, &key.buyer_id))?;

        let amount = project.salary;
        require(
            "withdraw salary",
            self.withdraw_fund_from_project(&project.title, &project.owner, amount)
                .await?,
        )?;

        let recorded = self
            .pay(&NewTransaction {
                transaction_id: transaction_id.to_string(),
                project_id: project.id.clone(),
                seller_id: key.seller_id.clone(),
                buyer_id: key.buyer_id.clone(),
                amount,
            })
            .await?;
        if let WriteStatus::Failure { reason } = recorded {
            require(
                "restore budget",
                self.add_fund_to_project(&project.title, &project.owner, amount)
                    .await?,
            )?;
            return Err(WorkflowError::Rejected {
                step: "record transaction",
                reason,
            });
        }

        require(
            "credit participant",
            self.increase_balance(&buyer.email, amount).await?,
        )?;

        let tx = self
            .get_transaction(transaction_id)
            .await?
            .ok_or(DatabaseError::NoResult)?;
        tracing::info!(%key, transaction_id, amount, "survey settled");
        Ok(tx)
    }

    /// The payout already recorded for this survey's participant, if any.
    async fn payout_for_survey(
        &self,
        key: &SurveyKey,
    ) -> Result<Option<Transaction>, DatabaseError> {
        let payouts = self.list_transactions_for_project(&key.project_id).await?;
        Ok(payouts
            .into_iter()
            .find(|tx| tx.seller_id == key.seller_id && tx.buyer_id == key.buyer_id))
    }

    /// Remove every listed record. Missing records are skipped.
    pub async fn cleanup(&self, plan: &Cleanup) -> Result<CleanupReport, WorkflowError> {
        let mut report = CleanupReport::default();
        for id in &plan.transaction_ids {
            report.transactions += u32::from(self.delete_transaction(id).await?);
        }
        for key in &plan.surveys {
            report.surveys += u32::from(self.delete_survey(key).await?);
        }
        for (title, owner) in &plan.projects {
            report.projects += u32::from(self.delete_project(title, owner).await?);
        }
        for email in &plan.user_emails {
            report.users += u32::from(self.delete_user_by_email(email).await?);
        }
        tracing::info!(?report, "cleanup finished");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{new_project, new_user, test_service};
    use pretty_assertions::assert_eq;

    const SELLER: &str = "john_doe@gmail.com";
    const BUYER: &str = "jane_doe@gmail.com";

    async fn market() -> MartService {
        let svc = test_service().await;
        svc.insert_user(&new_user(SELLER)).await.unwrap();
        svc.insert_user(&new_user(BUYER)).await.unwrap();
        svc.create_project(&new_project("Project 1", SELLER))
            .await
            .unwrap();
        svc
    }

    #[tokio::test]
    async fn create_project_requires_owner() {
        let svc = test_service().await;
        let err = svc
            .create_project(&new_project("Orphan", "ghost@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::NotFound {
                collection: Collection::Users,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn create_project_records_ownership() {
        let svc = market().await;
        let seller = svc.get_user(SELLER).await.unwrap().unwrap();
        assert!(seller.projects.contains(&"Project 1".to_string()));
    }

    #[tokio::test]
    async fn fund_project_moves_balance() {
        let svc = market().await;
        svc.fund_project(SELLER, "Project 1", 60.0).await.unwrap();

        let seller = svc.get_user(SELLER).await.unwrap().unwrap();
        let project = svc.get_project("Project 1", SELLER).await.unwrap().unwrap();
        assert_eq!(seller.balance, 40.0);
        assert_eq!(project.budget, 60.0);
    }

    #[tokio::test]
    async fn fund_project_beyond_balance_is_rejected() {
        let svc = market().await;
        let err = svc.fund_project(SELLER, "Project 1", 500.0).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Rejected { step: "debit owner", .. }));

        let project = svc.get_project("Project 1", SELLER).await.unwrap().unwrap();
        assert_eq!(project.budget, 0.0);
    }

    #[tokio::test]
    async fn settle_refuses_unverified_survey() {
        let svc = market().await;
        svc.fund_project(SELLER, "Project 1", 100.0).await.unwrap();
        let key = svc
            .join_and_issue_survey("Project 1", SELLER, BUYER, "How was it?")
            .await
            .unwrap();

        let err = svc.settle_survey(&key, "n/a", "tx-1").await.unwrap_err();
        assert!(matches!(err, WorkflowError::NotVerified(_)));

        assert!(svc.get_transaction("tx-1").await.unwrap().is_none());
        let buyer = svc.get_user(BUYER).await.unwrap().unwrap();
        assert_eq!(buyer.balance, 100.0);
    }

    #[tokio::test]
    async fn settle_without_budget_pays_nothing() {
        let svc = market().await;
        let key = svc
            .join_and_issue_survey("Project 1", SELLER, BUYER, "How was it?")
            .await
            .unwrap();
        svc.answer_survey(&key, &["fine".into()]).await.unwrap();

        let err = svc.settle_survey(&key, "ok", "tx-1").await.unwrap_err();
        assert!(matches!(err, WorkflowError::Rejected { step: "withdraw salary", .. }));
        assert!(svc.get_transaction("tx-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_transaction_id_restores_budget() {
        const OTHER: &str = "jim_doe@gmail.com";
        let svc = market().await;
        svc.insert_user(&new_user(OTHER)).await.unwrap();
        svc.fund_project(SELLER, "Project 1", 100.0).await.unwrap();

        let first = svc
            .join_and_issue_survey("Project 1", SELLER, BUYER, "How was it?")
            .await
            .unwrap();
        svc.answer_survey(&first, &["fine".into()]).await.unwrap();
        svc.settle_survey(&first, "ok", "tx-1").await.unwrap();

        let second = svc
            .join_and_issue_survey("Project 1", SELLER, OTHER, "How was it?")
            .await
            .unwrap();
        svc.answer_survey(&second, &["great".into()]).await.unwrap();
        let err = svc.settle_survey(&second, "ok", "tx-1").await.unwrap_err();
        assert!(matches!(err, WorkflowError::Rejected { step: "record transaction", .. }));

        let project = svc.get_project("Project 1", SELLER).await.unwrap().unwrap();
        assert_eq!(project.budget, 90.0);
        let other = svc.get_user(OTHER).await.unwrap().unwrap();
        assert_eq!(other.balance, 100.0);
    }

    #[tokio::test]
    async fn second_settlement_with_new_id_is_refused() {
        let svc = market().await;
        svc.fund_project(SELLER, "Project 1", 100.0).await.unwrap();
        let key = svc
            .join_and_issue_survey("Project 1", SELLER, BUYER, "How was it?")
            .await
            .unwrap();
        svc.answer_survey(&key, &["fine".into()]).await.unwrap();
        svc.settle_survey(&key, "ok", "tx-1").await.unwrap();

        let err = svc.settle_survey(&key, "ok", "tx-2").await.unwrap_err();
        match err {
            WorkflowError::AlreadyPaid { transaction_id, .. } => {
                assert_eq!(transaction_id, "tx-1");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let buyer = svc.get_user(BUYER).await.unwrap().unwrap();
        let project = svc.get_project("Project 1", SELLER).await.unwrap().unwrap();
        let payouts = svc.list_transactions_for_project(&key.project_id).await.unwrap();
        assert_eq!(buyer.balance, 110.0);
        assert_eq!(project.budget, 90.0);
        assert_eq!(payouts.len(), 1);
        assert!(svc.get_transaction("tx-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn cleanup_skips_missing_records() {
        let svc = market().await;
        let report = svc
            .cleanup(&Cleanup {
                transaction_ids: vec!["never".into()],
                surveys: vec![SurveyKey::new("a", "b", "c")],
                projects: vec![("Project 1".into(), SELLER.into())],
                user_emails: vec![SELLER.into(), BUYER.into(), "ghost@x.io".into()],
            })
            .await
            .unwrap();
        assert_eq!(
            report,
            CleanupReport {
                transactions: 0,
                surveys: 0,
                projects: 1,
                users: 2,
            }
        );
    }
}
