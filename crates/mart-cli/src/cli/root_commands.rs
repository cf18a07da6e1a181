use clap::{Args, Subcommand};

use crate::cli::subcommands::{
    ProjectCommands, SurveyCommands, TransactionCommands, UserCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Check that every collection is reachable.
    Ping,
    /// Users.
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Projects.
    Project {
        #[command(subcommand)]
        action: ProjectCommands,
    },
    /// Surveys.
    Survey {
        #[command(subcommand)]
        action: SurveyCommands,
    },
    /// Transactions.
    Transaction {
        #[command(subcommand)]
        action: TransactionCommands,
    },
    /// Run the full marketplace flow against the configured database.
    Demo(DemoArgs),
}

#[derive(Clone, Debug, Args)]
pub struct DemoArgs {
    /// Keep the demo records instead of cleaning them up.
    #[arg(long)]
    pub keep: bool,

    /// Amount the owner moves into the project budget.
    #[arg(long, default_value_t = 1000.0)]
    pub fund: f64,
}
