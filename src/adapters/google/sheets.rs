//! Live `TableStore` adapter over the Sheets v4 values API.

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::ports::table::PortFuture;
use crate::ports::{BoxError, CellRange, TableStore};

const SHEETS_API_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Sheets values client scoped to one spreadsheet.
pub struct SheetsClient {
    http: Client,
    token: String,
    spreadsheet_id: String,
}

/// Response of a values read; `values` is absent for an empty range.
#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Body of a values write.
#[derive(Serialize)]
struct WriteBody {
    values: Vec<Vec<String>>,
}

impl SheetsClient {
    /// Creates a client using an already-fetched bearer token.
    #[must_use]
    pub fn new(http: Client, token: String, spreadsheet_id: String) -> Self {
        Self { http, token, spreadsheet_id }
    }

    /// Builds a values endpoint URL with percent-encoded path segments,
    /// so tab names with spaces or other reserved characters survive.
    fn values_url(&self, range: &CellRange, suffix: &str) -> Result<Url, BoxError> {
        let mut url = Url::parse(SHEETS_API_URL)
            .map_err(|e| format!("Invalid Sheets endpoint: {e}"))?;
        url.path_segments_mut()
            .map_err(|()| "Sheets endpoint cannot be a base URL".to_string())?
            .push(&self.spreadsheet_id)
            .push("values")
            .push(&format!("{range}{suffix}"));
        Ok(url)
    }
}

impl TableStore for SheetsClient {
    fn read(&self, range: &CellRange) -> PortFuture<'_, Vec<Vec<String>>> {
        let range = range.clone();
        Box::pin(async move {
            let url = self.values_url(&range, "")?;
            let response = self
                .http
                .get(url)
                .bearer_auth(&self.token)
                .send()
                .await
                .map_err(|e| format!("Sheets read request failed for {range}: {e}"))?;
            let body: ValueRange = check(response, "read", &range).await?.json().await
                .map_err(|e| format!("Failed to parse Sheets response for {range}: {e}"))?;
            Ok(body.values)
        })
    }

    fn clear(&self, range: &CellRange) -> PortFuture<'_, ()> {
        let range = range.clone();
        Box::pin(async move {
            let url = self.values_url(&range, ":clear")?;
            let response = self
                .http
                .post(url)
                .bearer_auth(&self.token)
                .json(&serde_json::json!({}))
                .send()
                .await
                .map_err(|e| format!("Sheets clear request failed for {range}: {e}"))?;
            check(response, "clear", &range).await?;
            Ok(())
        })
    }

    fn write(&self, range: &CellRange, values: Vec<Vec<String>>) -> PortFuture<'_, ()> {
        let range = range.clone();
        Box::pin(async move {
            let url = self.values_url(&range, "")?;
            let response = self
                .http
                .put(url)
                .query(&[("valueInputOption", "RAW")])
                .bearer_auth(&self.token)
                .json(&WriteBody { values })
                .send()
                .await
                .map_err(|e| format!("Sheets write request failed for {range}: {e}"))?;
            check(response, "write", &range).await?;
            Ok(())
        })
    }
}

/// Turns a non-success response into an error carrying the body text.
async fn check(
    response: reqwest::Response,
    operation: &str,
    range: &CellRange,
) -> Result<reqwest::Response, crate::ports::BoxError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(format!("Sheets {operation} failed for {range} ({}): {body}", status.as_u16()).into())
}
