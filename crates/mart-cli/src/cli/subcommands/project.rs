use clap::Subcommand;

/// Project entity commands. Projects are addressed by `(title, owner email)`.
#[derive(Clone, Debug, Subcommand)]
pub enum ProjectCommands {
    /// Create a project for an existing owner.
    Create {
        title: String,
        #[arg(long)]
        owner: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        salary: f64,
        /// Project length in days, starting now.
        #[arg(long, default_value_t = 30)]
        days: i64,
        #[arg(long)]
        private: bool,
        #[arg(long)]
        member: Vec<String>,
    },
    /// Get a project.
    Get {
        title: String,
        #[arg(long)]
        owner: String,
    },
    /// List projects owned by a user.
    List {
        #[arg(long)]
        owner: String,
    },
    /// Delete a project.
    Delete {
        title: String,
        #[arg(long)]
        owner: String,
    },
    /// Move money from the owner's balance into the project budget.
    Fund {
        title: String,
        #[arg(long)]
        owner: String,
        amount: f64,
    },
    /// Join a participant and issue them a survey.
    Join {
        title: String,
        #[arg(long)]
        owner: String,
        #[arg(long)]
        participant: String,
        #[arg(long)]
        content: String,
    },
    /// Open or close a project to new participants.
    SetActive {
        title: String,
        #[arg(long)]
        owner: String,
        #[arg(long, action = clap::ArgAction::Set)]
        active: bool,
    },
}
