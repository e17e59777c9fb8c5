//! Streaming chat-completions invoker

use crate::openai::error::OpenAiError;
use crate::openai::types::{ChatChunk, ChatRequest};
use async_trait::async_trait;
use eventsource_stream::{EventStreamError, Eventsource};
use futures::StreamExt;
use multimind_application::{InvokeOutcome, InvokeRequest, ModelInvoker};
use multimind_domain::StreamEvent;
use std::time::Instant;
use tracing::{debug, trace, warn};

/// [`ModelInvoker`] for any OpenAI-compatible endpoint.
///
/// One client is shared across channels; base URL, key and timeout come
/// with each request.
#[derive(Debug, Clone, Default)]
pub struct OpenAiInvoker {
    client: reqwest::Client,
}

impl OpenAiInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn stream_completion(
        &self,
        request: &InvokeRequest,
        on_event: &mut (dyn FnMut(StreamEvent) + Send),
    ) -> Result<String, OpenAiError> {
        if request.api_key.trim().is_empty() {
            return Err(OpenAiError::MissingApiKey);
        }

        let url = format!("{}/chat/completions", request.base_url.trim_end_matches('/'));
        let payload = ChatRequest::from_invoke(request);
        debug!(url, model = %request.model_name, "POST (chat)");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&request.api_key)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .timeout(request.timeout)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OpenAiError::Status { status, body });
        }

        let mut events = response.bytes_stream().eventsource();
        let mut accumulated = String::new();

        while let Some(event) = events.next().await {
            let event = event.map_err(|e| match e {
                EventStreamError::Transport(err) => OpenAiError::Http(err),
                other => OpenAiError::Stream(other.to_string()),
            })?;

            if event.data.trim() == "[DONE]" {
                break;
            }

            let chunk: ChatChunk = match serde_json::from_str(&event.data) {
                Ok(chunk) => chunk,
                Err(e) => {
                    trace!("Skipping unparsable SSE payload: {}", e);
                    continue;
                }
            };
            if let Some(error) = chunk.error {
                return Err(OpenAiError::Stream(error.message));
            }

            for content in chunk.choices.into_iter().filter_map(|c| c.delta.content) {
                if content.is_empty() {
                    continue;
                }
                accumulated.push_str(&content);
                on_event(StreamEvent::Delta {
                    chunk: content,
                    accumulated: accumulated.clone(),
                });
            }
        }

        if accumulated.trim().is_empty() {
            return Err(OpenAiError::EmptyResponse);
        }
        on_event(StreamEvent::Completed(accumulated.clone()));
        Ok(accumulated)
    }
}

#[async_trait]
impl ModelInvoker for OpenAiInvoker {
    async fn invoke(
        &self,
        request: InvokeRequest,
        on_event: &mut (dyn FnMut(StreamEvent) + Send),
    ) -> InvokeOutcome {
        let started = Instant::now();
        let result = self.stream_completion(&request, on_event).await;
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match result {
            Ok(text) => {
                debug!("{} replied in {}ms ({} chars)", request.model_name, duration_ms, text.len());
                InvokeOutcome::success(text, duration_ms)
            }
            Err(e) => {
                let error = e.into_invocation_error(request.timeout);
                warn!("{} invocation failed: {}", request.model_name, error);
                InvokeOutcome::from_error(&error, &request.model_name, duration_ms)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use multimind_application::category;
    use multimind_domain::ImageAttachment;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sse(chunks: &[&str]) -> String {
        let mut body = String::new();
        for chunk in chunks {
            let payload = serde_json::json!({"choices": [{"delta": {"content": chunk}}]});
            body.push_str(&format!("data: {}\n\n", payload));
        }
        body.push_str("data: [DONE]\n\n");
        body
    }

    fn request(base_url: &str) -> InvokeRequest {
        InvokeRequest {
            prompt: "What is 2+2?".into(),
            model_name: "gpt-4.1-mini".into(),
            system_instruction: Some("You are Cognito.".into()),
            reduced_capacity: false,
            max_tokens: 4096,
            temperature: 0.7,
            image: None,
            base_url: base_url.to_string(),
            api_key: "sk-test".into(),
            timeout: Duration::from_secs(5),
        }
    }

    async fn mount(server: &MockServer, template: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(template)
            .mount(server)
            .await;
    }

    fn stream_response(body: String) -> ResponseTemplate {
        ResponseTemplate::new(200)
            .insert_header("content-type", "text/event-stream")
            .set_body_raw(body, "text/event-stream")
    }

    async fn invoke(request: InvokeRequest) -> (InvokeOutcome, Vec<StreamEvent>) {
        let mut events = Vec::new();
        let outcome = OpenAiInvoker::new()
            .invoke(request, &mut |event| events.push(event))
            .await;
        (outcome, events)
    }

    #[tokio::test]
    async fn test_streams_accumulated_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(stream_response(sse(&["Fo", "ur."])))
            .expect(1)
            .mount(&server)
            .await;

        let (outcome, events) = invoke(request(&format!("{}/v1/", server.uri()))).await;

        assert!(outcome.is_success(), "{:?}", outcome);
        assert_eq!(outcome.text, "Four.");
        assert_eq!(
            events,
            vec![
                StreamEvent::Delta {
                    chunk: "Fo".into(),
                    accumulated: "Fo".into()
                },
                StreamEvent::Delta {
                    chunk: "ur.".into(),
                    accumulated: "Four.".into()
                },
                StreamEvent::Completed("Four.".into()),
            ]
        );
    }

    #[tokio::test]
    async fn test_request_body_carries_image() {
        let server = MockServer::start().await;
        mount(&server, stream_response(sse(&["ok"]))).await;

        let mut req = request(&format!("{}/v1", server.uri()));
        req.image = Some(ImageAttachment {
            mime_type: "image/jpeg".into(),
            base64_data: "/9j/".into(),
            name: "cat.jpg".into(),
            size_bytes: 3,
        });
        let (outcome, _) = invoke(req).await;
        assert!(outcome.is_success());

        let received = server.received_requests().await.unwrap();
        let body: serde_json::Value = received[0].body_json().unwrap();
        assert_eq!(body["stream"], true);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(
            body["messages"][1]["content"][1]["image_url"]["url"],
            "data:image/jpeg;base64,/9j/"
        );
    }

    #[tokio::test]
    async fn test_unauthorized_is_auth_error() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(401).set_body_json(serde_json::json!({"error": {"message": "Incorrect API key"}})),
        )
        .await;

        let (outcome, events) = invoke(request(&format!("{}/v1", server.uri()))).await;

        assert!(outcome.is_auth_error());
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_status_categories() {
        for (status, expected) in [(429, category::RATE_LIMIT), (404, category::MODEL_NOT_FOUND)] {
            let server = MockServer::start().await;
            mount(&server, ResponseTemplate::new(status)).await;

            let (outcome, _) = invoke(request(&format!("{}/v1", server.uri()))).await;
            assert_eq!(outcome.error.as_deref(), Some(expected));
        }
    }

    #[tokio::test]
    async fn test_server_error_keeps_api_message() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(500).set_body_json(serde_json::json!({"error": {"message": "boom"}})),
        )
        .await;

        let (outcome, _) = invoke(request(&format!("{}/v1", server.uri()))).await;
        assert_eq!(outcome.error.as_deref(), Some("API error (500): boom"));
    }

    #[tokio::test]
    async fn test_empty_stream_is_error() {
        let server = MockServer::start().await;
        mount(&server, stream_response(sse(&[]))).await;

        let (outcome, events) = invoke(request(&format!("{}/v1", server.uri()))).await;
        assert_eq!(outcome.error.as_deref(), Some(category::EMPTY_RESPONSE));
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_missing_key_skips_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(stream_response(sse(&["never"])))
            .expect(0)
            .mount(&server)
            .await;

        let mut req = request(&format!("{}/v1", server.uri()));
        req.api_key = "  ".into();
        let (outcome, _) = invoke(req).await;
        assert!(outcome.is_auth_error());
    }

    #[tokio::test]
    async fn test_timeout_is_network_error() {
        let server = MockServer::start().await;
        mount(
            &server,
            stream_response(sse(&["late"])).set_delay(Duration::from_millis(500)),
        )
        .await;

        let mut req = request(&format!("{}/v1", server.uri()));
        req.timeout = Duration::from_millis(50);
        let (outcome, _) = invoke(req).await;
        assert_eq!(outcome.error.as_deref(), Some(category::NETWORK));
    }
}
