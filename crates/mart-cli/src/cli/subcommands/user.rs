use clap::Subcommand;

/// User entity commands.
#[derive(Clone, Debug, Subcommand)]
pub enum UserCommands {
    /// Register a user.
    Create {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long, default_value = "")]
        institution: String,
        #[arg(long, default_value_t = 0.0)]
        balance: f64,
        #[arg(long, default_value = "")]
        payment_method: String,
    },
    /// Get a user by email.
    Get { email: String },
    /// Resolve a user ID from credentials.
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },
    /// List users.
    List,
    /// Delete a user by email.
    Delete { email: String },
    /// Add to a user's balance.
    Deposit { email: String, amount: f64 },
    /// Take from a user's balance.
    Withdraw { email: String, amount: f64 },
}
