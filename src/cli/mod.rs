//! CLI module for Quillpad
//!
//! Provides commands:
//! - `serve`: Start the HTTP server
//! - `quota`: Inspect and maintain daily AI usage

use clap::{Parser, Subcommand};

pub mod quota;

/// Quillpad blogging backend CLI
#[derive(Parser, Debug)]
#[command(name = "quillpad")]
#[command(about = "Blog post AI assistance with per-user daily quotas")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the server
    Serve,
    /// Inspect or maintain daily AI usage
    Quota {
        #[command(subcommand)]
        command: quota::QuotaCommand,
    },
}

/// Run the CLI command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Serve) => crate::server::run().await,
        Some(Commands::Quota { command }) => quota::run(command).await,
        None => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            println!();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        <Cli as clap::CommandFactory>::command().debug_assert();
    }

    #[test]
    fn test_parse_quota_show() {
        let cli = Cli::parse_from(["quillpad", "quota", "show", "--user", "u1", "--json"]);
        match cli.command {
            Some(Commands::Quota {
                command: quota::QuotaCommand::Show { user, json },
            }) => {
                assert_eq!(user, "u1");
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_prune_date() {
        let cli = Cli::parse_from(["quillpad", "quota", "prune", "--before", "2025-03-01"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Quota {
                command: quota::QuotaCommand::Prune { .. }
            })
        ));
        assert!(Cli::try_parse_from(["quillpad", "quota", "prune", "--before", "March"]).is_err());
    }
}
