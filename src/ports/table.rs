//! Table store port for reading and writing spreadsheet ranges.

use std::error::Error;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// Error type shared by all port methods.
pub type BoxError = Box<dyn Error + Send + Sync>;

/// Boxed future type alias used by port traits to keep them dyn-compatible.
pub type PortFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, BoxError>> + Send + 'a>>;

/// A rectangular cell range on a named sheet tab, in A1 notation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRange {
    /// The sheet tab name (e.g. `"MAIN"`).
    pub tab: String,
    /// The A1-style rectangle (e.g. `"A1:Z"` or `"F6:Z6"`).
    pub cells: String,
}

impl CellRange {
    /// Creates a range from a tab name and an A1 rectangle.
    #[must_use]
    pub fn new(tab: impl Into<String>, cells: impl Into<String>) -> Self {
        Self { tab: tab.into(), cells: cells.into() }
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!{}", self.tab, self.cells)
    }
}

/// Reads and writes rectangular grids of cell values.
///
/// Rows returned by `read` may be shorter than the header row; callers
/// must index defensively. Abstracting the table keeps the jobs testable
/// with in-memory grids.
pub trait TableStore: Send + Sync {
    /// Reads the cell values in `range` as a grid of strings.
    ///
    /// Trailing empty rows and cells are omitted by the backing API, so
    /// an empty sheet yields an empty grid rather than an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the range cannot be read.
    fn read(&self, range: &CellRange) -> PortFuture<'_, Vec<Vec<String>>>;

    /// Clears every cell value in `range`.
    ///
    /// # Errors
    ///
    /// Returns an error if the range cannot be cleared.
    fn clear(&self, range: &CellRange) -> PortFuture<'_, ()>;

    /// Writes `values` starting at the top-left corner of `range`.
    ///
    /// # Errors
    ///
    /// Returns an error if the values cannot be written.
    fn write(&self, range: &CellRange, values: Vec<Vec<String>>) -> PortFuture<'_, ()>;
}
