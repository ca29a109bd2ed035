//! Core library entry for the `rostersync` CLI.

pub mod adapters;
pub mod audit;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod ports;
pub mod roster;
pub mod sync;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version requests surface as clap errors but are
            // successful exits with their message on stdout.
            if matches!(
                err.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            ) {
                print!("{err}");
                return Ok(());
            }
            return Err(err.to_string());
        }
    };
    commands::dispatch(&cli.command)
}
