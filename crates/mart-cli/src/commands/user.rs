use mart_core::entities::{NewUser, Payment};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::UserCommands;
use crate::commands::{found, report};
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct UserIdResponse {
    id: String,
}

pub async fn handle(
    action: UserCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let svc = &ctx.service;
    match action {
        UserCommands::Create {
            email,
            password,
            first_name,
            last_name,
            institution,
            balance,
            payment_method,
        } => {
            let user = NewUser {
                email,
                password,
                first_name,
                last_name,
                institution,
                balance,
                payment: Payment {
                    method: payment_method,
                    amount: 0.0,
                },
                projects: vec![],
                participated_projects: vec![],
                is_active: true,
            };
            report(&svc.insert_user(&user).await?, flags)
        }
        UserCommands::Get { email } => {
            found(svc.get_user(&email).await?, "user", &email, flags)
        }
        UserCommands::Login { email, password } => match svc.get_user_id(&email, &password).await? {
            Some(id) => output(&UserIdResponse { id }, flags.format),
            None => anyhow::bail!("no user matches those credentials"),
        },
        UserCommands::List => {
            let users = svc.list_users(ctx.limit(flags.limit)).await?;
            output(&users, flags.format)
        }
        UserCommands::Delete { email } => {
            if !svc.delete_user_by_email(&email).await? {
                anyhow::bail!("user not found: {email}");
            }
            output(&serde_json::json!({ "deleted": email }), flags.format)
        }
        UserCommands::Deposit { email, amount } => {
            report(&svc.increase_balance(&email, amount).await?, flags)
        }
        UserCommands::Withdraw { email, amount } => {
            report(&svc.decrease_balance(&email, amount).await?, flags)
        }
    }
}
