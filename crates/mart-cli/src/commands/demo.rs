use anyhow::Context;
use chrono::{Duration, Utc};
use serde::Serialize;

use mart_core::entities::{NewProject, NewUser, Payment, Project, SurveyKey, Transaction, User};
use mart_core::enums::ProjectType;
use mart_core::responses::WriteStatus;
use mart_db::service::MartService;
use mart_db::workflow::{Cleanup, CleanupReport};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::DemoArgs;
use crate::context::AppContext;
use crate::output::output;

const PROJECT_TITLE: &str = "Demo Project";
const STARTING_BALANCE: f64 = 100.0;

#[derive(Debug, Serialize)]
struct DemoReport {
    survey: SurveyKey,
    transaction: Transaction,
    seller: User,
    buyer: User,
    project: Project,
    #[serde(skip_serializing_if = "Option::is_none")]
    cleanup: Option<CleanupReport>,
}

/// Records one demo run may create, filled in as the steps succeed.
#[derive(Debug)]
struct DemoRun {
    seller_email: String,
    buyer_email: String,
    transaction_id: String,
    survey: Option<SurveyKey>,
}

impl DemoRun {
    fn new(tag: &str) -> Self {
        Self {
            seller_email: format!("seller-{tag}@mart.local"),
            buyer_email: format!("buyer-{tag}@mart.local"),
            transaction_id: format!("tx-{tag}"),
            survey: None,
        }
    }

    fn cleanup_plan(&self) -> Cleanup {
        Cleanup {
            transaction_ids: vec![self.transaction_id.clone()],
            surveys: self.survey.iter().cloned().collect(),
            projects: vec![(PROJECT_TITLE.to_string(), self.seller_email.clone())],
            user_emails: vec![self.seller_email.clone(), self.buyer_email.clone()],
        }
    }
}

fn ensure(step: &str, status: &WriteStatus) -> anyhow::Result<()> {
    match status.reason() {
        Some(reason) => anyhow::bail!("{step} rejected: {reason}"),
        None => Ok(()),
    }
}

fn demo_user(first_name: &str, email: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        password: format!("{first_name}-password"),
        first_name: first_name.to_string(),
        last_name: "Doe".to_string(),
        institution: "University of Toronto".to_string(),
        balance: STARTING_BALANCE,
        payment: Payment {
            method: "bitcoin".to_string(),
            amount: 0.0,
        },
        projects: vec![],
        participated_projects: vec![],
        is_active: true,
    }
}

async fn run_steps(
    svc: &MartService,
    fund: f64,
    run: &mut DemoRun,
) -> anyhow::Result<DemoReport> {
    for user in [
        demo_user("John", &run.seller_email),
        demo_user("Jane", &run.buyer_email),
    ] {
        ensure("register user", &svc.insert_user(&user).await?)?;
    }
    ensure(
        "top up seller",
        &svc.increase_balance(&run.seller_email, fund).await?,
    )?;

    let start_date = Utc::now();
    svc.create_project(&NewProject {
        title: PROJECT_TITLE.to_string(),
        description: "A project created by the mart demo".to_string(),
        owner: run.seller_email.clone(),
        members: vec![],
        participants: vec![],
        is_active: true,
        start_date,
        end_date: start_date + Duration::days(30),
        budget: 0.0,
        salary: 10.0,
        project_type: ProjectType::Public,
    })
    .await?;
    svc.fund_project(&run.seller_email, PROJECT_TITLE, fund)
        .await?;

    let key = svc
        .join_and_issue_survey(
            PROJECT_TITLE,
            &run.seller_email,
            &run.buyer_email,
            "How did the demo go?",
        )
        .await?;
    run.survey = Some(key.clone());
    ensure(
        "answer survey",
        &svc.answer_survey(&key, &["Smoothly".to_string()]).await?,
    )?;
    let transaction = svc
        .settle_survey(&key, "Thanks!", &run.transaction_id)
        .await?;

    let seller = svc
        .get_user(&run.seller_email)
        .await?
        .context("seller vanished during demo")?;
    let buyer = svc
        .get_user(&run.buyer_email)
        .await?
        .context("buyer vanished during demo")?;
    let project = svc
        .get_project(PROJECT_TITLE, &run.seller_email)
        .await?
        .context("project vanished during demo")?;

    Ok(DemoReport {
        survey: key,
        transaction,
        seller,
        buyer,
        project,
        cleanup: None,
    })
}

/// Register two users, fund a project, answer and settle one survey.
///
/// Unless `keep` is set, every record the run created is removed afterwards,
/// including when a step fails.
async fn run_demo(svc: &MartService, args: &DemoArgs) -> anyhow::Result<DemoReport> {
    let tag = svc.db().generate_id("demo").await?;
    let mut run = DemoRun::new(&tag);
    tracing::info!(%tag, "starting demo run");

    let outcome = run_steps(svc, args.fund, &mut run).await;
    if args.keep {
        return outcome;
    }

    let cleanup = svc.cleanup(&run.cleanup_plan()).await;
    match (outcome, cleanup) {
        (Ok(mut report), Ok(removed)) => {
            report.cleanup = Some(removed);
            Ok(report)
        }
        (Ok(_), Err(error)) => Err(error).context("demo cleanup failed"),
        (Err(error), Ok(removed)) => {
            tracing::info!(?removed, "removed records from failed demo run");
            Err(error)
        }
        (Err(error), Err(cleanup_error)) => {
            tracing::warn!(%cleanup_error, %tag, "demo cleanup failed");
            Err(error)
        }
    }
}

pub async fn handle(
    args: &DemoArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let report = run_demo(&ctx.service, args).await?;
    output(&report, flags.format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    async fn count(svc: &MartService, table: &str) -> i64 {
        let mut rows = svc
            .db()
            .conn()
            .query(&format!("SELECT COUNT(*) FROM {table}"), ())
            .await
            .unwrap();
        rows.next().await.unwrap().unwrap().get::<i64>(0).unwrap()
    }

    async fn record_counts(svc: &MartService) -> [i64; 4] {
        [
            count(svc, "users").await,
            count(svc, "projects").await,
            count(svc, "surveys").await,
            count(svc, "transactions").await,
        ]
    }

    #[tokio::test]
    async fn successful_run_cleans_up() {
        let svc = MartService::new_local(":memory:").await.unwrap();
        let args = DemoArgs {
            keep: false,
            fund: 1000.0,
        };

        let report = run_demo(&svc, &args).await.unwrap();
        assert_eq!(report.buyer.balance, STARTING_BALANCE + 10.0);
        assert_eq!(report.project.budget, 990.0);
        assert_eq!(
            report.cleanup,
            Some(CleanupReport {
                transactions: 1,
                surveys: 1,
                projects: 1,
                users: 2,
            })
        );
        assert_eq!(record_counts(&svc).await, [0, 0, 0, 0]);
    }

    #[tokio::test]
    async fn failed_run_still_cleans_up() {
        let svc = MartService::new_local(":memory:").await.unwrap();
        let args = DemoArgs {
            keep: false,
            fund: 5.0,
        };

        let err = run_demo(&svc, &args).await.unwrap_err();
        assert!(format!("{err:#}").contains("withdraw salary"), "{err:#}");
        assert_eq!(record_counts(&svc).await, [0, 0, 0, 0]);
    }

    #[tokio::test]
    async fn keep_leaves_records_of_failed_run() {
        let svc = MartService::new_local(":memory:").await.unwrap();
        let args = DemoArgs {
            keep: true,
            fund: 5.0,
        };

        assert!(run_demo(&svc, &args).await.is_err());
        assert_eq!(record_counts(&svc).await, [2, 1, 1, 0]);
    }
}
