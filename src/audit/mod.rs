//! Membership audit — flattening current directory state into a report
//! grid written back to the spreadsheet.
//!
//! Collection is partial-failure tolerant: a group whose member listing
//! fails contributes zero rows and the remaining groups still appear.

use tracing::warn;

use crate::ports::GroupDirectory;
use crate::roster::looks_like_email;

/// Column titles of the written report.
pub const REPORT_HEADER: [&str; 4] = ["Group Email", "Member Email", "Role", "Type"];

/// One member-of-group row in the audit report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    /// The group email.
    pub group: String,
    /// The member email.
    pub member: String,
    /// The member's role in the group.
    pub role: String,
    /// The member's type.
    pub member_type: String,
}

/// Extracts the group emails to audit from a header row.
///
/// Only cells at or after `groups_start` are considered, and only those
/// that are email-shaped survive, trimmed, in header order.
#[must_use]
pub fn header_groups(header: &[String], groups_start: usize) -> Vec<String> {
    header
        .iter()
        .skip(groups_start)
        .map(|cell| cell.trim())
        .filter(|cell| looks_like_email(cell))
        .map(ToString::to_string)
        .collect()
}

/// What one audit collection pass produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditOutcome {
    /// All collected rows, in group order then listing order.
    pub records: Vec<AuditRecord>,
    /// Number of groups whose member listing succeeded.
    pub fetched_groups: usize,
    /// Number of groups whose member listing failed.
    pub failed_groups: usize,
}

/// Lists each group's members and accumulates the flattened records.
///
/// A per-group failure is logged as a warning and skipped; it never
/// aborts the remaining groups.
pub async fn collect_members(directory: &dyn GroupDirectory, groups: &[String]) -> AuditOutcome {
    let mut records = Vec::new();
    let mut fetched_groups = 0;
    let mut failed_groups = 0;

    for group in groups {
        match directory.list_members(group).await {
            Ok(members) => {
                fetched_groups += 1;
                for member in members {
                    records.push(AuditRecord {
                        group: group.clone(),
                        member: member.email,
                        role: member.role,
                        member_type: member.member_type,
                    });
                }
            }
            Err(err) => {
                warn!(%group, error = %err, "failed to list group members");
                failed_groups += 1;
            }
        }
    }

    AuditOutcome { records, fetched_groups, failed_groups }
}

/// Builds the grid to write: the report header followed by one row per
/// record.
#[must_use]
pub fn report_grid(records: &[AuditRecord]) -> Vec<Vec<String>> {
    let mut grid = Vec::with_capacity(records.len() + 1);
    grid.push(REPORT_HEADER.iter().map(ToString::to_string).collect());
    for record in records {
        grid.push(vec![
            record.group.clone(),
            record.member.clone(),
            record.role.clone(),
            record.member_type.clone(),
        ]);
    }
    grid
}
