use super::GenerationService;
use crate::compose::{ProviderRequest, ResponseShape};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// One scripted provider reply.
#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    Text(String),
    Fail(String),
}

/// Scripted provider. Replies cycle in order; with none queued each request
/// gets a valid default for its response shape.
#[derive(Clone)]
pub struct MockGenerationClient {
    replies: Arc<Mutex<Vec<MockReply>>>,
    requests: Arc<Mutex<Vec<ProviderRequest>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockGenerationClient {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push(MockReply::Text(response.into()));
        self
    }

    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push(MockReply::Fail(message.into()));
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Every request received so far, in call order.
    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn default_reply(shape: ResponseShape) -> String {
        match shape {
            ResponseShape::FreeText => "Mock content".to_string(),
            ResponseShape::StringArray { max_items } => {
                let posts: Vec<String> = (1..=max_items).map(|i| format!("Mock post {}", i)).collect();
                serde_json::json!(posts).to_string()
            }
            ResponseShape::SlideArray => {
                let slides: Vec<serde_json::Value> = (1..=5)
                    .map(|i| {
                        serde_json::json!({
                            "slideNumber": i,
                            "title": format!("Slide {}", i),
                            "content": "Mock slide",
                            "visualDescription": "Plain background"
                        })
                    })
                    .collect();
                serde_json::Value::Array(slides).to_string()
            }
            ResponseShape::MultiFormatObject => serde_json::json!({
                "instagram": "Mock instagram",
                "linkedin": "Mock linkedin",
                "email": "Mock email",
                "twitter": "Mock twitter"
            })
            .to_string(),
            ResponseShape::DriftResult => serde_json::json!({
                "score": 92,
                "reasoning": "Mock alignment",
                "finalContent": ""
            })
            .to_string(),
        }
    }
}

impl Default for MockGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationService for MockGenerationClient {
    async fn generate(&self, request: &ProviderRequest) -> Result<String> {
        let count = {
            let mut count = self.call_count.lock().unwrap();
            *count += 1;
            *count
        };
        self.requests.lock().unwrap().push(request.clone());

        let replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            return Ok(Self::default_reply(request.response_shape));
        }

        match &replies[(count - 1) % replies.len()] {
            MockReply::Text(text) => Ok(text.clone()),
            MockReply::Fail(message) => Err(Error::AiProvider(message.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::{distillation_request, drift_request};
    use crate::models::DriftAssessment;

    #[tokio::test]
    async fn test_mock_client_default_replies_fit_shape() {
        let client = MockGenerationClient::new();

        let text = client.generate(&distillation_request("notes")).await.unwrap();
        assert_eq!(text, "Mock content");

        let drift = client.generate(&drift_request("p", "d")).await.unwrap();
        let assessment: DriftAssessment = serde_json::from_str(&drift).unwrap();
        assert_eq!(assessment.score, 92);
    }

    #[tokio::test]
    async fn test_mock_client_custom_responses_cycle() {
        let client = MockGenerationClient::new()
            .with_response("first")
            .with_failure("quota exceeded");
        let request = distillation_request("notes");

        assert_eq!(client.generate(&request).await.unwrap(), "first");
        let err = client.generate(&request).await.unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));

        // Should cycle back
        assert_eq!(client.generate(&request).await.unwrap(), "first");
    }

    #[tokio::test]
    async fn test_mock_client_records_requests() {
        let client = MockGenerationClient::new();
        let handle = client.clone();

        assert_eq!(handle.get_call_count(), 0);
        client.generate(&distillation_request("notes")).await.unwrap();
        client.generate(&drift_request("p", "d")).await.unwrap();

        assert_eq!(handle.get_call_count(), 2);
        let requests = handle.requests();
        assert_eq!(requests[1].response_shape, ResponseShape::DriftResult);
    }
}
