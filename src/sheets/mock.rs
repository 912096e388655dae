use super::record::SheetRecord;
use super::PersistenceSink;
use crate::models::{GenerationInputs, GenerationResult, Platform};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// In-memory sink that stores rows and can be told to refuse saves.
#[derive(Clone)]
pub struct MockSheetSink {
    rows: Arc<Mutex<Vec<Vec<String>>>>,
    append_count: Arc<Mutex<usize>>,
    unauthorized: Arc<Mutex<bool>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl MockSheetSink {
    pub fn new() -> Self {
        Self {
            rows: Arc::new(Mutex::new(Vec::new())),
            append_count: Arc::new(Mutex::new(0)),
            unauthorized: Arc::new(Mutex::new(false)),
            failure: Arc::new(Mutex::new(None)),
        }
    }

    /// Every append answers `AuthorizationRequired` until [`Self::authorize`].
    pub fn unauthorized(self) -> Self {
        *self.unauthorized.lock().unwrap() = true;
        self
    }

    pub fn with_failure(self, message: impl Into<String>) -> Self {
        *self.failure.lock().unwrap() = Some(message.into());
        self
    }

    pub fn authorize(&self) {
        *self.unauthorized.lock().unwrap() = false;
    }

    pub fn get_append_count(&self) -> usize {
        *self.append_count.lock().unwrap()
    }

    pub fn get_rows(&self) -> Vec<Vec<String>> {
        self.rows.lock().unwrap().clone()
    }
}

impl Default for MockSheetSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PersistenceSink for MockSheetSink {
    async fn append(
        &self,
        inputs: &GenerationInputs,
        result: &GenerationResult,
        platform: Platform,
    ) -> Result<()> {
        *self.append_count.lock().unwrap() += 1;

        if *self.unauthorized.lock().unwrap() {
            return Err(Error::AuthorizationRequired);
        }
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(Error::Persistence(message));
        }

        let row = SheetRecord::now(inputs, result, platform).into_row();
        self.rows.lock().unwrap().push(row);
        Ok(())
    }
}
