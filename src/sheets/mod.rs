//! Spreadsheet persistence for finished results
//!
//! Results are appended as one flat row either straight to the Google Sheets
//! API with a bearer token, or through a proxy endpoint that takes the whole
//! inputs and result.

pub mod auth;
pub mod client;
pub mod mock;
pub mod proxy;
pub mod record;

pub use auth::AuthSession;
pub use client::SheetsClient;
pub use mock::MockSheetSink;
pub use proxy::ProxyClient;
pub use record::SheetRecord;

use crate::config::{Config, LocalSettings};
use crate::models::{GenerationInputs, GenerationResult, Platform};
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait PersistenceSink: Send + Sync {
    /// Append one result. `platform` picks the multi-format variant to store.
    async fn append(
        &self,
        inputs: &GenerationInputs,
        result: &GenerationResult,
        platform: Platform,
    ) -> Result<()>;
}

/// Pick a transport: the proxy when a URL is configured, otherwise the
/// direct API once a spreadsheet is known. `None` means saving is off.
pub fn build_sink(
    config: &Config,
    settings: &LocalSettings,
    auth: Arc<AuthSession>,
    http_client: reqwest::Client,
) -> Option<Box<dyn PersistenceSink>> {
    if let Some(url) = &config.apps_script_url {
        tracing::info!("Persistence: proxy endpoint");
        return Some(Box::new(ProxyClient::new_with_client(url.clone(), http_client)));
    }

    if settings.is_complete() {
        tracing::info!("Persistence: Google Sheets ({})", settings.spreadsheet_id);
        return Some(Box::new(SheetsClient::new_with_client(
            settings.spreadsheet_id.clone(),
            auth,
            http_client,
        )));
    }

    tracing::debug!("Persistence disabled: no proxy URL and incomplete sheet settings");
    None
}
