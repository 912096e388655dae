use super::auth::AuthSession;
use super::record::SheetRecord;
use super::PersistenceSink;
use crate::models::{GenerationInputs, GenerationResult, Platform};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;

pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com";

/// Appends rows with the Sheets `values.append` call.
pub struct SheetsClient {
    client: Client,
    spreadsheet_id: String,
    auth: Arc<AuthSession>,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: Option<String>,
}

impl SheetsClient {
    pub fn new(spreadsheet_id: String, auth: Arc<AuthSession>) -> Self {
        Self::new_with_client(spreadsheet_id, auth, Client::new())
    }

    pub fn new_with_client(spreadsheet_id: String, auth: Arc<AuthSession>, client: Client) -> Self {
        Self {
            client,
            spreadsheet_id,
            auth,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    async fn append_row(&self, token: &str, row: Vec<String>) -> Result<()> {
        let url = format!(
            "{}/v4/spreadsheets/{}/values/A1:append",
            self.base_url, self.spreadsheet_id
        );

        let response = self
            .client
            .post(&url)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .bearer_auth(token)
            .json(&serde_json::json!({ "values": [row] }))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to Sheets: {}", e);
                e
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;
            tracing::error!("Sheets API error (status {}): {}", status, body);
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|parsed| parsed.error)
                .and_then(|error| error.message)
                .unwrap_or_else(|| format!("Failed to save to Sheets (status {})", status));
            return Err(Error::Persistence(message));
        }

        Ok(())
    }
}

#[async_trait]
impl PersistenceSink for SheetsClient {
    async fn append(
        &self,
        inputs: &GenerationInputs,
        result: &GenerationResult,
        platform: Platform,
    ) -> Result<()> {
        let token = self.auth.token().ok_or(Error::AuthorizationRequired)?;
        let row = SheetRecord::now(inputs, result, platform).into_row();

        self.append_row(&token, row).await?;
        tracing::info!("Appended result to spreadsheet {}", self.spreadsheet_id);
        Ok(())
    }
}
