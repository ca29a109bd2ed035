//! `rostersync audit` command — the membership report job.

use tracing::{info, warn};

use crate::audit::{collect_members, header_groups, report_grid};
use crate::config::Config;
use crate::context::Services;

/// Execute the `audit` command against the live services.
///
/// # Errors
///
/// Returns an error string if configuration, authentication, the header
/// read, or the report write fails. Per-group fetch failures are logged
/// and do not fail the run.
pub async fn run() -> Result<(), String> {
    let config = Config::from_env()?;
    let services = Services::live(&config).await?;
    run_with_services(&config, &services).await
}

/// Execute the `audit` command with explicit services.
///
/// # Errors
///
/// Returns an error string if the group header cannot be read or the
/// report cannot be written.
pub async fn run_with_services(config: &Config, services: &Services) -> Result<(), String> {
    let header_range = config.roster_header_range();
    let header = services
        .table
        .read(&header_range)
        .await
        .map_err(|e| format!("FATAL: Failed to read group header {header_range}: {e}"))?
        .into_iter()
        .next()
        .unwrap_or_default();

    let groups = header_groups(&header, config.columns.groups_start);
    info!(groups = groups.len(), "auditing groups from roster header");

    let outcome = collect_members(services.directory.as_ref(), &groups).await;
    if outcome.fetched_groups == 0 {
        // The write below still happens and erases the previous report.
        warn!("no group fetch succeeded; the previous audit report is being replaced with an empty one");
    }

    let clear_range = config.audit_clear_range();
    services
        .table
        .clear(&clear_range)
        .await
        .map_err(|e| format!("Failed to clear audit range {clear_range}: {e}"))?;

    let write_range = config.audit_write_range();
    let grid = report_grid(&outcome.records);
    services
        .table
        .write(&write_range, grid)
        .await
        .map_err(|e| format!("Failed to write audit report at {write_range}: {e}"))?;

    println!(
        "Audit complete: {} rows from {} groups ({} failed).",
        outcome.records.len(),
        outcome.fetched_groups,
        outcome.failed_groups
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::table::PortFuture;
    use crate::ports::{AddOutcome, CellRange, GroupDirectory, Member, RemoveOutcome, TableStore};
    use crate::roster::{ColumnMap, Layout};
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    fn test_config() -> Config {
        Config {
            spreadsheet_id: "sheet".into(),
            roster_tab: "MAIN".into(),
            audit_tab: "AUDIT".into(),
            header_row: 6,
            layout: Layout::Matrix,
            columns: ColumnMap { user: 3, status: 4, groups_start: 5 },
            admin_subject: "admin@x.org".into(),
            credentials_path: PathBuf::from("/dev/null"),
            protected_users: vec![],
        }
    }

    /// Table fake that serves a fixed header and records clears/writes.
    struct RecordingTable {
        header: Vec<String>,
        cleared: Arc<Mutex<Vec<String>>>,
        written: Arc<Mutex<Vec<(String, Vec<Vec<String>>)>>>,
    }

    impl RecordingTable {
        fn new(header: &[&str]) -> Self {
            Self {
                header: header.iter().map(ToString::to_string).collect(),
                cleared: Arc::default(),
                written: Arc::default(),
            }
        }
    }

    impl TableStore for RecordingTable {
        fn read(&self, _range: &CellRange) -> PortFuture<'_, Vec<Vec<String>>> {
            let header = self.header.clone();
            Box::pin(async move { Ok(vec![header]) })
        }

        fn clear(&self, range: &CellRange) -> PortFuture<'_, ()> {
            self.cleared.lock().unwrap().push(range.to_string());
            Box::pin(async { Ok(()) })
        }

        fn write(&self, range: &CellRange, values: Vec<Vec<String>>) -> PortFuture<'_, ()> {
            self.written.lock().unwrap().push((range.to_string(), values));
            Box::pin(async { Ok(()) })
        }
    }

    struct FakeDirectory {
        members: HashMap<String, Vec<Member>>,
    }

    impl GroupDirectory for FakeDirectory {
        fn add_member(&self, _group: &str, _user: &str) -> PortFuture<'_, AddOutcome> {
            Box::pin(async { Ok(AddOutcome::Added) })
        }

        fn remove_member(&self, _group: &str, _user: &str) -> PortFuture<'_, RemoveOutcome> {
            Box::pin(async { Ok(RemoveOutcome::Removed) })
        }

        fn list_members(&self, group: &str) -> PortFuture<'_, Vec<Member>> {
            let result = self
                .members
                .get(group)
                .cloned()
                .ok_or_else(|| format!("group {group} not found").into());
            Box::pin(async move { result })
        }
    }

    fn member(email: &str) -> Member {
        Member { email: email.into(), role: "MEMBER".into(), member_type: "USER".into() }
    }

    #[tokio::test]
    async fn audit_writes_header_plus_member_rows() {
        let table = RecordingTable::new(&["", "", "", "", "", "g1@x.org", "g2@x.org"]);
        let cleared = Arc::clone(&table.cleared);
        let written = Arc::clone(&table.written);
        let directory = FakeDirectory {
            members: HashMap::from([
                ("g1@x.org".to_string(), vec![member("a@x.org"), member("b@x.org")]),
                ("g2@x.org".to_string(), vec![member("c@x.org")]),
            ]),
        };
        let services = Services::with_adapters(Box::new(table), Box::new(directory));

        run_with_services(&test_config(), &services).await.unwrap();

        assert_eq!(cleared.lock().unwrap().as_slice(), ["AUDIT!A1:Z1000"]);
        let written = written.lock().unwrap();
        let (range, grid) = &written[0];
        assert_eq!(range, "AUDIT!A1");
        assert_eq!(grid.len(), 4);
        assert_eq!(grid[0][0], "Group Email");
        assert_eq!(grid[1], vec!["g1@x.org", "a@x.org", "MEMBER", "USER"]);
    }

    #[tokio::test]
    async fn failed_group_skipped_but_others_written() {
        let table = RecordingTable::new(&["", "", "", "", "", "g1@x.org", "g2@x.org"]);
        let written = Arc::clone(&table.written);
        let directory = FakeDirectory {
            members: HashMap::from([("g2@x.org".to_string(), vec![member("c@x.org")])]),
        };
        let services = Services::with_adapters(Box::new(table), Box::new(directory));

        run_with_services(&test_config(), &services).await.unwrap();

        let written = written.lock().unwrap();
        let (_, grid) = &written[0];
        // Header plus g2's single row; the failed g1 contributes nothing.
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[1][0], "g2@x.org");
    }

    #[tokio::test]
    async fn zero_group_audit_still_clears_and_writes_header() {
        let table = RecordingTable::new(&["", "", "", "", "", "not a group", ""]);
        let cleared = Arc::clone(&table.cleared);
        let written = Arc::clone(&table.written);
        let directory = FakeDirectory { members: HashMap::new() };
        let services = Services::with_adapters(Box::new(table), Box::new(directory));

        run_with_services(&test_config(), &services).await.unwrap();

        assert_eq!(cleared.lock().unwrap().len(), 1);
        let written = written.lock().unwrap();
        assert_eq!(written[0].1.len(), 1);
    }
}
