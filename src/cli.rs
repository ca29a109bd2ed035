//! CLI argument definitions.

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `rostersync`.
#[derive(Debug, Parser)]
#[command(name = "rostersync", version, about = "Sync group membership from a spreadsheet roster")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Reconcile directory group membership against the roster.
    Sync {
        /// Print the planned actions without calling the directory.
        #[arg(long)]
        dry_run: bool,
    },
    /// Write a membership audit report back to the spreadsheet.
    Audit,
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;

    #[test]
    fn parses_sync_subcommand() {
        let cli = Cli::parse_from(["rostersync", "sync"]);
        assert!(matches!(cli.command, Command::Sync { dry_run: false }));
    }

    #[test]
    fn parses_sync_dry_run_flag() {
        let cli = Cli::parse_from(["rostersync", "sync", "--dry-run"]);
        assert!(matches!(cli.command, Command::Sync { dry_run: true }));
    }

    #[test]
    fn parses_audit_subcommand() {
        let cli = Cli::parse_from(["rostersync", "audit"]);
        assert!(matches!(cli.command, Command::Audit));
    }
}
