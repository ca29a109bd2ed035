//! Command dispatch and handlers.

pub mod audit;
pub mod sync;

use crate::cli::Command;

/// Dispatch a parsed command to its handler.
///
/// Both jobs are sequential batch passes, so they run on a
/// current-thread runtime; the only suspension points are the blocking
/// network calls themselves.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start runtime: {e}"))?;

    match command {
        Command::Sync { dry_run } => runtime.block_on(sync::run(*dry_run)),
        Command::Audit => runtime.block_on(audit::run()),
    }
}
