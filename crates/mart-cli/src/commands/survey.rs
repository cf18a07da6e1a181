use mart_core::entities::SurveyKey;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::SurveyCommands;
use crate::commands::{found, report};
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct VerifyResponse {
    key: SurveyKey,
    verified: bool,
}

pub async fn handle(
    action: SurveyCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let svc = &ctx.service;
    match action {
        SurveyCommands::Get { key } => {
            let key = SurveyKey::from(key);
            found(svc.get_survey(&key).await?, "survey", &key.to_string(), flags)
        }
        SurveyCommands::Answer { key, answer } => {
            report(&svc.answer_survey(&key.into(), &answer).await?, flags)
        }
        SurveyCommands::Verify { key } => {
            let key = SurveyKey::from(key);
            let verified = svc.verify_survey(&key).await?;
            output(&VerifyResponse { key, verified }, flags.format)
        }
        SurveyCommands::Feedback { key, text } => {
            report(&svc.give_feedback(&key.into(), &text).await?, flags)
        }
        SurveyCommands::Settle {
            key,
            feedback,
            transaction_id,
        } => {
            let tx = svc
                .settle_survey(&key.into(), &feedback, &transaction_id)
                .await?;
            output(&tx, flags.format)
        }
        SurveyCommands::Delete { key } => {
            let key = SurveyKey::from(key);
            if !svc.delete_survey(&key).await? {
                anyhow::bail!("survey not found: {key}");
            }
            output(&serde_json::json!({ "deleted": key }), flags.format)
        }
    }
}
