use clap::Subcommand;

/// Transaction record commands.
#[derive(Clone, Debug, Subcommand)]
pub enum TransactionCommands {
    /// Get a transaction by ID.
    Get { id: String },
    /// List payouts made from a project.
    List {
        #[arg(long)]
        project: String,
    },
    /// Delete a transaction record.
    Delete { id: String },
}
