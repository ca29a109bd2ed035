//! Live adapters for the Google Sheets and Admin SDK Directory APIs.

pub mod auth;
pub mod directory;
pub mod sheets;

pub use auth::{fetch_access_token, ServiceAccountKey, SCOPES};
pub use directory::DirectoryClient;
pub use sheets::SheetsClient;
