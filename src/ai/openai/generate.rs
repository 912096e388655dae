use super::client::OpenAiHttpClient;
use super::types::{ChatCompletionRequest, ChatMessage, JsonSchema, ResponseFormat};
use crate::ai::GenerationService;
use crate::compose::{ProviderRequest, ResponseShape};
use crate::{Error, Result};
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::time::Duration;

/// Key that wraps array-shaped payloads, since strict mode needs an object root.
const ARRAY_WRAPPER_KEY: &str = "items";

pub struct OpenAiGenerationClient {
    http: OpenAiHttpClient,
    model: String,
}

impl OpenAiGenerationClient {
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
            http: OpenAiHttpClient::new_with_client(api_key, timeout, client),
            model,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    fn build_request(&self, request: &ProviderRequest) -> ChatCompletionRequest {
        let mut messages = Vec::new();
        if let Some(instruction) = request.system_instruction {
            messages.push(ChatMessage::new("system", instruction));
        }
        messages.push(ChatMessage::new("user", &request.prompt_text()));

        ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            temperature: request.temperature,
            response_format: response_format(request.response_shape),
        }
    }
}

#[async_trait]
impl GenerationService for OpenAiGenerationClient {
    async fn generate(&self, request: &ProviderRequest) -> Result<String> {
        let payload = self.build_request(request);
        tracing::debug!(
            "Sending OpenAI request to {} ({} prompt chars, structured: {})",
            self.model,
            request.prompt_text().len(),
            request.response_shape.is_structured()
        );

        let response = self.http.chat_completion(&payload).await?;
        let text = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or_else(|| Error::AiProvider("No response from OpenAI chat API".to_string()))?;

        if request.response_shape.is_array() {
            Ok(unwrap_array(text))
        } else {
            Ok(text)
        }
    }
}

fn response_format(shape: ResponseShape) -> Option<ResponseFormat> {
    let schema = strict_schema(&shape.schema()?);
    let (name, schema) = if shape.is_array() {
        (
            "medcopy_list",
            json!({
                "type": "object",
                "properties": { "items": schema },
                "required": ["items"],
                "additionalProperties": false
            }),
        )
    } else {
        ("medcopy_object", schema)
    };

    Some(ResponseFormat {
        format_type: "json_schema".to_string(),
        json_schema: JsonSchema {
            name: name.to_string(),
            schema,
            strict: true,
        },
    })
}

/// Rewrite a Gemini-style schema into JSON Schema accepted by strict mode:
/// lowercase type names, closed objects and no item-count bounds.
fn strict_schema(schema: &Value) -> Value {
    let Value::Object(fields) = schema else {
        return schema.clone();
    };

    let mut out = Map::new();
    for (key, value) in fields {
        match key.as_str() {
            "minItems" | "maxItems" => {}
            "type" => {
                let lowered = value
                    .as_str()
                    .map(|t| Value::String(t.to_lowercase()))
                    .unwrap_or_else(|| value.clone());
                out.insert(key.clone(), lowered);
            }
            "items" => {
                out.insert(key.clone(), strict_schema(value));
            }
            "properties" => {
                let properties = value
                    .as_object()
                    .map(|props| {
                        props
                            .iter()
                            .map(|(name, prop)| (name.clone(), strict_schema(prop)))
                            .collect::<Map<_, _>>()
                    })
                    .unwrap_or_default();
                out.insert(key.clone(), Value::Object(properties));
                out.insert("additionalProperties".to_string(), Value::Bool(false));
            }
            _ => {
                out.insert(key.clone(), value.clone());
            }
        }
    }
    Value::Object(out)
}

/// Pull the array back out of its wrapper object. Anything unexpected is
/// returned untouched for the normalizer to judge.
fn unwrap_array(text: String) -> String {
    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(mut wrapper)) => match wrapper.remove(ARRAY_WRAPPER_KEY) {
            Some(items) => items.to_string(),
            None => text,
        },
        _ => text,
    }
}
