//! Caller-side state for one interactive session: the current inputs, the
//! latest result and whether it has been saved.

use crate::app::App;
use crate::models::{GenerationInputs, GenerationResult, Platform};
use crate::{Error, Result};

/// What happened when a save was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    AlreadySaved,
    NothingToSave,
    NotConfigured,
    /// The sink needs a token first. The result is kept for a retry.
    AuthorizationRequired,
}

#[derive(Debug, Default)]
pub struct Session {
    pub inputs: GenerationInputs,
    pub active_platform: Platform,
    /// The latest result with the inputs it was generated from.
    result: Option<(GenerationInputs, GenerationResult)>,
    saved: bool,
}

impl Session {
    pub fn new(inputs: GenerationInputs) -> Self {
        Self {
            inputs,
            ..Self::default()
        }
    }

    pub fn result(&self) -> Option<&GenerationResult> {
        self.result.as_ref().map(|(_, result)| result)
    }

    pub fn is_saved(&self) -> bool {
        self.saved
    }

    /// Replace the current result. The previous one is dropped up front, so
    /// a failed run leaves the session without a result.
    pub async fn generate(&mut self, app: &App) -> Result<&GenerationResult> {
        self.result = None;
        self.saved = false;
        self.active_platform = Platform::default();

        let result = app.generate(&self.inputs).await?;
        let (_, result) = self.result.insert((self.inputs.clone(), result));
        Ok(result)
    }

    /// Save the current result once, alongside the inputs that produced it.
    /// Transport failures are returned as errors and never discard the result.
    pub async fn save(&mut self, app: &App) -> Result<SaveOutcome> {
        let Some((inputs, result)) = &self.result else {
            return Ok(SaveOutcome::NothingToSave);
        };
        if self.saved {
            return Ok(SaveOutcome::AlreadySaved);
        }
        let Some(sink) = app.sink() else {
            return Ok(SaveOutcome::NotConfigured);
        };

        match sink.append(inputs, result, self.active_platform).await {
            Ok(()) => {
                self.saved = true;
                Ok(SaveOutcome::Saved)
            }
            Err(Error::AuthorizationRequired) => {
                tracing::warn!("Save skipped: authorization required");
                Ok(SaveOutcome::AuthorizationRequired)
            }
            Err(e) => {
                tracing::error!("Save failed: {}", e);
                Err(e)
            }
        }
    }

    /// Back to default inputs with no result.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
