//! Service bundle wiring the port trait objects.

use reqwest::Client;
use tracing::info;

use crate::adapters::google::{fetch_access_token, DirectoryClient, ServiceAccountKey, SheetsClient};
use crate::config::Config;
use crate::ports::{GroupDirectory, TableStore};

/// Bundles both port trait objects behind one handle.
///
/// Constructors wire up different adapter implementations; the jobs only
/// ever see the traits.
pub struct Services {
    /// Spreadsheet access.
    pub table: Box<dyn TableStore>,
    /// Group membership access.
    pub directory: Box<dyn GroupDirectory>,
}

impl Services {
    /// Creates the live Google-backed services.
    ///
    /// Authenticates once, up front: a failure here aborts the run before
    /// any table read or membership call happens.
    ///
    /// # Errors
    ///
    /// Returns an error if the key file is unusable or the token exchange
    /// fails.
    pub async fn live(config: &Config) -> Result<Self, String> {
        let http = Client::new();
        let key = ServiceAccountKey::from_file(&config.credentials_path)
            .map_err(|e| format!("FATAL: {e}"))?;
        let token = fetch_access_token(&http, &key, &config.admin_subject)
            .await
            .map_err(|e| format!("FATAL: Auth failed. {e}"))?;
        info!(subject = %config.admin_subject, "authenticated with delegated credentials");

        Ok(Self {
            table: Box::new(SheetsClient::new(
                http.clone(),
                token.clone(),
                config.spreadsheet_id.clone(),
            )),
            directory: Box::new(DirectoryClient::new(http, token)),
        })
    }

    /// Wires explicit adapters (used by tests with in-memory fakes).
    #[must_use]
    pub fn with_adapters(
        table: Box<dyn TableStore>,
        directory: Box<dyn GroupDirectory>,
    ) -> Self {
        Self { table, directory }
    }
}
