//! `rostersync sync` command — the reconciler job.

use tracing::info;

use crate::config::Config;
use crate::context::Services;
use crate::roster::parse_roster;
use crate::sync::membership::{apply_plan, format_plan, plan_membership, ProtectedSet};

/// Execute the `sync` command against the live services.
///
/// # Errors
///
/// Returns an error string if configuration, authentication, or the
/// initial roster read fails. Individual membership failures are logged
/// and do not fail the run.
pub async fn run(dry_run: bool) -> Result<(), String> {
    let config = Config::from_env()?;
    let services = Services::live(&config).await?;
    run_with_services(&config, &services, dry_run).await
}

/// Execute the `sync` command with explicit services.
///
/// # Errors
///
/// Returns an error string if the roster cannot be read.
pub async fn run_with_services(
    config: &Config,
    services: &Services,
    dry_run: bool,
) -> Result<(), String> {
    let range = config.roster_range();
    let grid = services
        .table
        .read(&range)
        .await
        .map_err(|e| format!("FATAL: Failed to read roster {range}: {e}"))?;

    if grid.len() < 2 {
        println!("Roster is empty or missing headers.");
        return Ok(());
    }

    let roster = parse_roster(&grid, config.layout, config.columns);
    info!(
        users = roster.users.len(),
        groups = roster.universe.len(),
        "parsed roster"
    );

    let protected = ProtectedSet::new(&config.protected_users);
    let plan = plan_membership(&roster, &protected);

    if dry_run {
        println!("Dry run — would perform:");
        println!("{}", format_plan(&plan));
        return Ok(());
    }

    let report = apply_plan(services.directory.as_ref(), &plan).await;
    println!("Sync complete: {}", report.summary());
    Ok(())
}
