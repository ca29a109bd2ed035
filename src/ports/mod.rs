//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the application core and an
//! external system (the spreadsheet holding the roster, the group
//! directory holding memberships). Implementations live in `src/adapters/`.

pub mod directory;
pub mod table;

pub use directory::{AddOutcome, GroupDirectory, Member, RemoveOutcome};
pub use table::{BoxError, CellRange, PortFuture, TableStore};
