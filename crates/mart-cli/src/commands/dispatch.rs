use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Ping => commands::ping::handle(ctx, flags).await,
        Commands::User { action } => commands::user::handle(action, ctx, flags).await,
        Commands::Project { action } => commands::project::handle(action, ctx, flags).await,
        Commands::Survey { action } => commands::survey::handle(action, ctx, flags).await,
        Commands::Transaction { action } => {
            commands::transaction::handle(action, ctx, flags).await
        }
        Commands::Demo(args) => commands::demo::handle(&args, ctx, flags).await,
    }
}
