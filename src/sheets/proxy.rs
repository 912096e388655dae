use super::PersistenceSink;
use crate::models::{GenerationInputs, GenerationResult, Platform};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

/// Forwards the full inputs and result to a proxy endpoint. No token needed.
pub struct ProxyClient {
    client: Client,
    url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProxyPayload<'a> {
    inputs: &'a GenerationInputs,
    result: &'a GenerationResult,
    active_platform: Platform,
}

impl ProxyClient {
    pub fn new(url: String) -> Self {
        Self::new_with_client(url, Client::new())
    }

    pub fn new_with_client(url: String, client: Client) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl PersistenceSink for ProxyClient {
    async fn append(
        &self,
        inputs: &GenerationInputs,
        result: &GenerationResult,
        platform: Platform,
    ) -> Result<()> {
        let payload = ProxyPayload {
            inputs,
            result,
            active_platform: platform,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to proxy: {}", e);
                e
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;
            tracing::error!("Proxy error (status {}): {}", status, body);
            return Err(Error::Persistence(format!(
                "Proxy save failed (status {}): {}",
                status, body
            )));
        }

        tracing::info!("Forwarded result to proxy endpoint");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample() -> (GenerationInputs, GenerationResult) {
        let mut inputs = GenerationInputs::new("You are a GP", "sleep hygiene");
        inputs.set_carousel_mode(true);
        let result = GenerationResult {
            content: "Carousel Generated.".to_string(),
            distilled_insight: None,
            structured: None,
            drift_score: Some(100),
            drift_reasoning: None,
        };
        (inputs, result)
    }

    #[tokio::test]
    async fn test_posts_inputs_and_result() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/exec"))
            .and(body_partial_json(serde_json::json!({
                "inputs": { "persona": "You are a GP", "carouselMode": true },
                "result": { "content": "Carousel Generated.", "driftScore": 100 },
                "activePlatform": "email"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let client = ProxyClient::new(format!("{}/exec", server.uri()));
        let (inputs, result) = sample();
        client.append(&inputs, &result, Platform::Email).await.unwrap();
    }

    #[tokio::test]
    async fn test_proxy_failure_is_a_persistence_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let client = ProxyClient::new(format!("{}/exec", server.uri()));
        let (inputs, result) = sample();
        let err = client
            .append(&inputs, &result, Platform::LinkedIn)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Persistence(_)));
    }
}
