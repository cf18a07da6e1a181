use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `mart` binary.
#[derive(Debug, Parser)]
#[command(name = "mart", version, about = "Mart - survey marketplace record store")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Max results to return
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Local database file, overriding configuration
    #[arg(long, global = true)]
    pub db: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
            verbose: self.verbose,
            db: self.db.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use pretty_assertions::assert_eq;

    use super::{Cli, Commands, GlobalFlags, OutputFormat};
    use crate::cli::subcommands::{ProjectCommands, SurveyCommands, UserCommands};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "mart",
            "--format",
            "table",
            "--limit",
            "10",
            "--verbose",
            "ping",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.limit, Some(10));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Ping));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["mart", "ping", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        assert!(Cli::try_parse_from(["mart", "--format", "xml", "ping"]).is_err());
    }

    #[test]
    fn db_flag_is_copied_into_global_flags() {
        let cli = Cli::try_parse_from(["mart", "--db", "/tmp/mart.db", "ping"])
            .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(flags.db.as_deref(), Some("/tmp/mart.db"));
    }

    #[test]
    fn log_level_flags_reach_global_flags() {
        let flags = Cli::try_parse_from(["mart", "ping", "--verbose"])
            .expect("cli should parse")
            .global_flags();
        assert!(flags.verbose);
        assert!(!flags.quiet);

        let flags = Cli::try_parse_from(["mart", "-q", "ping"])
            .expect("cli should parse")
            .global_flags();
        assert!(flags.quiet);
    }

    #[test]
    fn user_get_takes_email() {
        let cli = Cli::try_parse_from(["mart", "user", "get", "jane_doe@gmail.com"])
            .expect("cli should parse");
        match cli.command {
            Commands::User {
                action: UserCommands::Get { email },
            } => assert_eq!(email, "jane_doe@gmail.com"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn project_get_requires_owner() {
        assert!(Cli::try_parse_from(["mart", "project", "get", "Project 1"]).is_err());
        let cli = Cli::try_parse_from([
            "mart",
            "project",
            "get",
            "Project 1",
            "--owner",
            "john_doe@gmail.com",
        ])
        .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Project {
                action: ProjectCommands::Get { .. }
            }
        ));
    }

    #[test]
    fn survey_answer_collects_repeated_flags() {
        let cli = Cli::try_parse_from([
            "mart", "survey", "answer", "--seller", "s", "--buyer", "b", "--project", "p",
            "--answer", "one", "--answer", "two",
        ])
        .expect("cli should parse");
        match cli.command {
            Commands::Survey {
                action: SurveyCommands::Answer { key, answer },
            } => {
                assert_eq!(key.seller, "s");
                assert_eq!(answer, vec!["one", "two"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
