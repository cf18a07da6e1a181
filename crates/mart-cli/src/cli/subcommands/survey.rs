use clap::{Args, Subcommand};
use mart_core::entities::SurveyKey;

/// Identifies a survey by its participants and project.
#[derive(Clone, Debug, Args)]
pub struct SurveyKeyArgs {
    /// Project owner's user ID.
    #[arg(long)]
    pub seller: String,
    /// Participant's user ID.
    #[arg(long)]
    pub buyer: String,
    /// Project ID.
    #[arg(long)]
    pub project: String,
}

impl From<SurveyKeyArgs> for SurveyKey {
    fn from(args: SurveyKeyArgs) -> Self {
        Self::new(args.seller, args.buyer, args.project)
    }
}

/// Survey entity commands.
#[derive(Clone, Debug, Subcommand)]
pub enum SurveyCommands {
    /// Get a survey.
    Get {
        #[command(flatten)]
        key: SurveyKeyArgs,
    },
    /// Replace a survey's answers.
    Answer {
        #[command(flatten)]
        key: SurveyKeyArgs,
        #[arg(long, required = true)]
        answer: Vec<String>,
    },
    /// Accept a survey if it has been answered.
    Verify {
        #[command(flatten)]
        key: SurveyKeyArgs,
    },
    /// Leave feedback on a survey.
    Feedback {
        #[command(flatten)]
        key: SurveyKeyArgs,
        text: String,
    },
    /// Verify, leave feedback and pay the participant.
    Settle {
        #[command(flatten)]
        key: SurveyKeyArgs,
        #[arg(long, default_value = "")]
        feedback: String,
        #[arg(long)]
        transaction_id: String,
    },
    /// Delete a survey.
    Delete {
        #[command(flatten)]
        key: SurveyKeyArgs,
    },
}
