//! Generation provider integration
//!
//! A provider takes one composed request and returns the model's raw text,
//! which is JSON text when the request asked for a structured shape.

pub mod gemini;
pub mod mock;
pub mod openai;

pub use gemini::GeminiGenerationClient;
pub use mock::{MockGenerationClient, MockReply};
pub use openai::OpenAiGenerationClient;

use crate::compose::ProviderRequest;
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate(&self, request: &ProviderRequest) -> Result<String>;
}
