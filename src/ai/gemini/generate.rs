use super::client::GeminiHttpClient;
use super::types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig};
use crate::ai::GenerationService;
use crate::compose::ProviderRequest;
use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;

pub struct GeminiGenerationClient {
    http: GeminiHttpClient,
}

impl GeminiGenerationClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, None, reqwest::Client::new())
    }

    pub fn new_with_client(
        api_key: String,
        model: String,
        timeout: Option<Duration>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(api_key, model, timeout, client),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    fn build_request(request: &ProviderRequest) -> GenerateContentRequest {
        let schema = request.response_shape.schema();

        GenerateContentRequest {
            system_instruction: request
                .system_instruction
                .map(|instruction| Content::text(None, instruction)),
            contents: vec![Content::text(Some("user"), &request.prompt_text())],
            generation_config: GenerationConfig {
                temperature: request.temperature,
                response_mime_type: schema.as_ref().map(|_| "application/json".to_string()),
                response_schema: schema,
            },
        }
    }

    /// Joins the non-thought text parts of the first candidate. A candidate
    /// without text yields an empty string.
    fn extract_text(response: &GenerateContentResponse) -> Option<String> {
        response.candidates.first().map(|candidate| {
            candidate
                .content
                .as_ref()
                .map(|content| {
                    content
                        .parts
                        .iter()
                        .filter(|part| part.thought != Some(true))
                        .filter_map(|part| part.text.as_deref())
                        .collect::<String>()
                })
                .unwrap_or_default()
        })
    }
}

#[async_trait]
impl GenerationService for GeminiGenerationClient {
    async fn generate(&self, request: &ProviderRequest) -> Result<String> {
        let payload = Self::build_request(request);
        tracing::debug!(
            "Sending Gemini request to {} ({} prompt chars, structured: {})",
            self.http.model(),
            request.prompt_text().len(),
            request.response_shape.is_structured()
        );

        let response: GenerateContentResponse = self.http.generate_content(&payload).await?;

        Self::extract_text(&response)
            .ok_or_else(|| Error::AiProvider("No candidates in Gemini response".to_string()))
    }
}
