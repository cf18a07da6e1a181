use crate::cli::GlobalFlags;
use crate::cli::subcommands::TransactionCommands;
use crate::commands::found;
use crate::context::AppContext;
use crate::output::output;

pub async fn handle(
    action: TransactionCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let svc = &ctx.service;
    match action {
        TransactionCommands::Get { id } => {
            found(svc.get_transaction(&id).await?, "transaction", &id, flags)
        }
        TransactionCommands::List { project } => {
            let txs = svc.list_transactions_for_project(&project).await?;
            output(&txs, flags.format)
        }
        TransactionCommands::Delete { id } => {
            if !svc.delete_transaction(&id).await? {
                anyhow::bail!("transaction not found: {id}");
            }
            output(&serde_json::json!({ "deleted": id }), flags.format)
        }
    }
}
