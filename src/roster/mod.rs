//! Roster parsing — turning the raw spreadsheet grid into users, statuses
//! and the group universe the reconciler plans against.
//!
//! The grid's first row is the header. In the matrix layout every group
//! owns a fixed column discovered from the header (only email-shaped
//! headers count); a cell value of `yes` marks desired membership. In the
//! list layout the trailing columns of each row hold free-form group
//! emails, and the universe is the union of every listed group.

use std::collections::HashSet;
use std::str::FromStr;

/// A user's activation status from the roster.
///
/// Anything other than an exact (trimmed, case-insensitive) `active` is
/// inactive — the conservative default that removes the user from every
/// group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The user should hold exactly the memberships their row describes.
    Active,
    /// The user should hold no memberships.
    Inactive,
}

impl Status {
    /// Parses a status cell. Absent or unrecognized values are inactive.
    #[must_use]
    pub fn parse(cell: Option<&str>) -> Self {
        match cell {
            Some(raw) if raw.trim().eq_ignore_ascii_case("active") => Self::Active,
            _ => Self::Inactive,
        }
    }
}

/// How group membership is expressed in the roster columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// One header-named column per group, marked `yes` per user.
    Matrix,
    /// Free-form group emails listed in the trailing columns of each row.
    List,
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "matrix" => Ok(Self::Matrix),
            "list" => Ok(Self::List),
            other => Err(format!("Unknown roster layout: {other}. Expected matrix or list")),
        }
    }
}

/// Column positions of the roster fields within a row.
#[derive(Debug, Clone, Copy)]
pub struct ColumnMap {
    /// Zero-based column holding the user email.
    pub user: usize,
    /// Zero-based column holding the status cell.
    pub status: usize,
    /// First zero-based column that can hold group data.
    pub groups_start: usize,
}

/// Group columns discovered from the header row (matrix layout).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupColumns {
    columns: Vec<(usize, String)>,
}

impl GroupColumns {
    /// Scans a header row for group columns.
    ///
    /// Only columns at or after `groups_start` whose trimmed value is
    /// email-shaped are kept, in header order.
    #[must_use]
    pub fn from_header(header: &[String], groups_start: usize) -> Self {
        let columns = header
            .iter()
            .enumerate()
            .skip(groups_start)
            .filter_map(|(idx, cell)| {
                let trimmed = cell.trim();
                looks_like_email(trimmed).then(|| (idx, trimmed.to_string()))
            })
            .collect();
        Self { columns }
    }

    /// Iterates over `(column index, group email)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.columns.iter().map(|(idx, group)| (*idx, group.as_str()))
    }

    /// The group emails in header order.
    #[must_use]
    pub fn groups(&self) -> Vec<String> {
        self.columns.iter().map(|(_, group)| group.clone()).collect()
    }
}

/// One usable data row: a user, their status, and the groups their row
/// marks as desired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    /// The user's email, trimmed.
    pub user: String,
    /// The user's activation status.
    pub status: Status,
    /// Groups the row marks the user as belonging to.
    pub desired: HashSet<String>,
}

impl UserRow {
    /// True when the row asks for membership in `group` and the user is
    /// active. Inactive users desire nothing regardless of their cells.
    #[must_use]
    pub fn wants(&self, group: &str) -> bool {
        self.status == Status::Active && self.desired.contains(group)
    }
}

/// The parsed roster: usable user rows plus the group universe, computed
/// once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    /// Usable data rows, in sheet order.
    pub users: Vec<UserRow>,
    /// Every group the reconciler manages, in discovery order.
    pub universe: Vec<String>,
}

/// Parses a raw grid (header row first) into a [`Roster`].
///
/// Rows without a usable user email are skipped silently. Rows may be
/// shorter than the header; missing cells read as empty.
#[must_use]
pub fn parse_roster(grid: &[Vec<String>], layout: Layout, columns: ColumnMap) -> Roster {
    let Some((header, data)) = grid.split_first() else {
        return Roster { users: Vec::new(), universe: Vec::new() };
    };

    match layout {
        Layout::Matrix => parse_matrix(header, data, columns),
        Layout::List => parse_list(data, columns),
    }
}

fn parse_matrix(header: &[String], data: &[Vec<String>], columns: ColumnMap) -> Roster {
    let group_columns = GroupColumns::from_header(header, columns.groups_start);
    let users = data
        .iter()
        .filter_map(|row| {
            let user = usable_user(row, columns.user)?;
            let status = Status::parse(cell(row, columns.status));
            let desired = group_columns
                .iter()
                .filter(|(idx, _)| marked_yes(cell(row, *idx)))
                .map(|(_, group)| group.to_string())
                .collect();
            Some(UserRow { user, status, desired })
        })
        .collect();

    Roster { users, universe: group_columns.groups() }
}

fn parse_list(data: &[Vec<String>], columns: ColumnMap) -> Roster {
    let mut universe: Vec<String> = Vec::new();
    let users = data
        .iter()
        .filter_map(|row| {
            let user = usable_user(row, columns.user)?;
            let status = Status::parse(cell(row, columns.status));
            let mut desired = HashSet::new();
            for raw in row.iter().skip(columns.groups_start) {
                let group = raw.trim();
                if !looks_like_email(group) {
                    continue;
                }
                if !universe.iter().any(|known| known == group) {
                    universe.push(group.to_string());
                }
                desired.insert(group.to_string());
            }
            Some(UserRow { user, status, desired })
        })
        .collect();

    Roster { users, universe }
}

fn usable_user(row: &[String], user_column: usize) -> Option<String> {
    let user = cell(row, user_column)?.trim();
    (!user.is_empty()).then(|| user.to_string())
}

fn cell(row: &[String], idx: usize) -> Option<&str> {
    row.get(idx).map(String::as_str)
}

fn marked_yes(cell: Option<&str>) -> bool {
    cell.is_some_and(|value| value.trim().eq_ignore_ascii_case("yes"))
}

/// Minimal email-shape check, matching the sheet conventions: non-empty
/// after trimming and containing an `@`.
#[must_use]
pub fn looks_like_email(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && trimmed.contains('@')
}
