use chrono::{DateTime, TimeDelta, Utc};
use mart_core::entities::NewProject;
use mart_core::enums::ProjectType;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ProjectCommands;
use crate::commands::{found, report};
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct ProjectIdResponse {
    id: String,
}

/// `start + days`, or an error when the date is out of range.
fn end_date(start: DateTime<Utc>, days: i64) -> anyhow::Result<DateTime<Utc>> {
    TimeDelta::try_days(days)
        .and_then(|delta| start.checked_add_signed(delta))
        .ok_or_else(|| anyhow::anyhow!("--days {days} is out of range"))
}

pub async fn handle(
    action: ProjectCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let svc = &ctx.service;
    match action {
        ProjectCommands::Create {
            title,
            owner,
            description,
            salary,
            days,
            private,
            member,
        } => {
            let start_date = Utc::now();
            let project = NewProject {
                title,
                description,
                owner,
                members: member,
                participants: vec![],
                is_active: true,
                start_date,
                end_date: end_date(start_date, days)?,
                budget: 0.0,
                salary,
                project_type: if private {
                    ProjectType::Private
                } else {
                    ProjectType::Public
                },
            };
            let id = svc.create_project(&project).await?;
            output(&ProjectIdResponse { id }, flags.format)
        }
        ProjectCommands::Get { title, owner } => found(
            svc.get_project(&title, &owner).await?,
            "project",
            &format!("{title} ({owner})"),
            flags,
        ),
        ProjectCommands::List { owner } => {
            let projects = svc
                .list_projects_by_owner(&owner, ctx.limit(flags.limit))
                .await?;
            output(&projects, flags.format)
        }
        ProjectCommands::Delete { title, owner } => {
            if !svc.delete_project(&title, &owner).await? {
                anyhow::bail!("project not found: {title} ({owner})");
            }
            output(&serde_json::json!({ "deleted": title, "owner": owner }), flags.format)
        }
        ProjectCommands::Fund {
            title,
            owner,
            amount,
        } => {
            svc.fund_project(&owner, &title, amount).await?;
            found(
                svc.get_project(&title, &owner).await?,
                "project",
                &title,
                flags,
            )
        }
        ProjectCommands::Join {
            title,
            owner,
            participant,
            content,
        } => {
            let key = svc
                .join_and_issue_survey(&title, &owner, &participant, &content)
                .await?;
            output(&key, flags.format)
        }
        ProjectCommands::SetActive {
            title,
            owner,
            active,
        } => report(&svc.set_project_active(&title, &owner, active).await?, flags),
    }
}
