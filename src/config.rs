//! Run configuration, read once from the environment at job start.
//!
//! Nothing reads the environment after `Config::from_env` returns; the
//! jobs receive the whole configuration as a value.

use std::env;
use std::path::PathBuf;

use crate::ports::CellRange;
use crate::roster::{ColumnMap, Layout};

/// Everything a job run needs to know, resolved up front.
#[derive(Debug, Clone)]
pub struct Config {
    /// The spreadsheet holding the roster and the audit report.
    pub spreadsheet_id: String,
    /// Tab holding the roster (`MAIN` by default).
    pub roster_tab: String,
    /// Tab receiving the audit report (`AUDIT` by default).
    pub audit_tab: String,
    /// One-based row of the roster header.
    pub header_row: u32,
    /// How group membership is expressed in the roster columns.
    pub layout: Layout,
    /// Column positions of the roster fields.
    pub columns: ColumnMap,
    /// Workspace administrator the service account impersonates.
    pub admin_subject: String,
    /// Path to the service-account JSON key file.
    pub credentials_path: PathBuf,
    /// Users that must never be removed from a group.
    pub protected_users: Vec<String>,
}

impl Config {
    /// Reads configuration from the environment (and a `.env` file when
    /// present).
    ///
    /// # Errors
    ///
    /// Returns an error naming the first missing or malformed variable.
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let spreadsheet_id = require("GOOGLE_SHEET_ID")?;
        let admin_subject = require("WORKSPACE_ADMIN_EMAIL")?;
        let credentials_path = PathBuf::from(require("GOOGLE_APPLICATION_CREDENTIALS")?);

        let roster_tab = env_or("ROSTER_TAB", "MAIN");
        let audit_tab = env_or("AUDIT_TAB", "AUDIT");
        let header_row = parse_var("ROSTER_HEADER_ROW", 1)?;
        let layout = match env::var("ROSTER_LAYOUT") {
            Ok(raw) => raw.parse::<Layout>()?,
            Err(_) => Layout::Matrix,
        };
        let columns = ColumnMap {
            user: parse_var("ROSTER_USER_COLUMN", 0)?,
            status: parse_var("ROSTER_STATUS_COLUMN", 1)?,
            groups_start: parse_var("ROSTER_GROUP_COLUMNS_START", 2)?,
        };
        let protected_users = env::var("ROSTER_PROTECTED_USERS")
            .map(|raw| parse_protected(&raw))
            .unwrap_or_default();

        if header_row == 0 {
            return Err("ROSTER_HEADER_ROW is one-based and must be at least 1".to_string());
        }

        Ok(Self {
            spreadsheet_id,
            roster_tab,
            audit_tab,
            header_row,
            layout,
            columns,
            admin_subject,
            credentials_path,
            protected_users,
        })
    }

    /// Range covering the roster from its header row downwards.
    #[must_use]
    pub fn roster_range(&self) -> CellRange {
        CellRange::new(self.roster_tab.clone(), format!("A{}:Z", self.header_row))
    }

    /// Range holding only the roster header row (group discovery for the
    /// audit).
    #[must_use]
    pub fn roster_header_range(&self) -> CellRange {
        CellRange::new(
            self.roster_tab.clone(),
            format!("A{row}:Z{row}", row = self.header_row),
        )
    }

    /// Range the audit report erases before writing.
    #[must_use]
    pub fn audit_clear_range(&self) -> CellRange {
        CellRange::new(self.audit_tab.clone(), "A1:Z1000")
    }

    /// Origin cell of the audit report.
    #[must_use]
    pub fn audit_write_range(&self) -> CellRange {
        CellRange::new(self.audit_tab.clone(), "A1")
    }
}

fn require(name: &str) -> Result<String, String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(format!("{name} environment variable not set")),
    }
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, String> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| format!("{name} is not a valid number: {raw}")),
        Err(_) => Ok(default),
    }
}

/// Splits the comma-separated protected-user list, dropping empty entries.
#[must_use]
pub fn parse_protected(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> Config {
        Config {
            spreadsheet_id: "sheet-id".into(),
            roster_tab: "MAIN".into(),
            audit_tab: "AUDIT".into(),
            header_row: 6,
            layout: Layout::Matrix,
            columns: ColumnMap { user: 3, status: 4, groups_start: 5 },
            admin_subject: "admin@x.org".into(),
            credentials_path: PathBuf::from("/tmp/key.json"),
            protected_users: vec![],
        }
    }

    #[test]
    fn roster_range_starts_at_header_row() {
        assert_eq!(sample_config().roster_range().to_string(), "MAIN!A6:Z");
    }

    #[test]
    fn header_range_covers_one_row() {
        assert_eq!(sample_config().roster_header_range().to_string(), "MAIN!A6:Z6");
    }

    #[test]
    fn audit_ranges_target_audit_tab() {
        let config = sample_config();
        assert_eq!(config.audit_clear_range().to_string(), "AUDIT!A1:Z1000");
        assert_eq!(config.audit_write_range().to_string(), "AUDIT!A1");
    }

    #[test]
    fn parse_protected_splits_and_trims() {
        let parsed = parse_protected("admin@x.org, info@x.org ,,");
        assert_eq!(parsed, vec!["admin@x.org", "info@x.org"]);
    }

    #[test]
    fn parse_protected_empty_string_is_empty() {
        assert!(parse_protected("").is_empty());
    }
}
