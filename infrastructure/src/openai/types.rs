//! Wire types for the chat-completions API
//!
//! Only the fields the invoker reads or writes are modelled.

use multimind_application::InvokeRequest;
use serde::{Deserialize, Serialize};

pub const REDUCED_TEMPERATURE: f32 = 0.3;
pub const REDUCED_MAX_TOKENS: u32 = 1000;

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ChatRequest {
    pub fn from_invoke(request: &InvokeRequest) -> Self {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request
            .system_instruction
            .as_deref()
            .filter(|s| !s.trim().is_empty())
        {
            messages.push(ChatMessage {
                role: "system",
                content: MessageContent::Text(system.to_string()),
            });
        }

        let content = match &request.image {
            Some(image) => MessageContent::Parts(vec![
                ContentPart::Text {
                    text: request.prompt.clone(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image.data_url(),
                        detail: "auto",
                    },
                },
            ]),
            None => MessageContent::Text(request.prompt.clone()),
        };
        messages.push(ChatMessage {
            role: "user",
            content,
        });

        let (temperature, max_tokens) = if request.reduced_capacity {
            (REDUCED_TEMPERATURE, REDUCED_MAX_TOKENS)
        } else {
            (request.temperature, request.max_tokens)
        };

        Self {
            model: request.model_name.clone(),
            messages,
            stream: true,
            temperature,
            max_tokens,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: MessageContent,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageUrl {
    pub url: String,
    pub detail: &'static str,
}

/// One streamed `data:` payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatChunk {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
    /// Some providers report failures inside the stream
    #[serde(default)]
    pub error: Option<ApiErrorDetail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub delta: ChunkDelta,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkDelta {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use multimind_domain::ImageAttachment;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn request() -> InvokeRequest {
        InvokeRequest {
            prompt: "What is 2+2?".into(),
            model_name: "gpt-4.1-mini".into(),
            system_instruction: Some("You are Cognito.".into()),
            reduced_capacity: false,
            max_tokens: 2048,
            temperature: 0.5,
            image: None,
            base_url: "https://api.openai.com/v1".into(),
            api_key: "sk-test".into(),
            timeout: Duration::from_secs(30),
        }
    }

    #[test]
    fn test_text_request_shape() {
        let body = serde_json::to_value(ChatRequest::from_invoke(&request())).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "model": "gpt-4.1-mini",
                "messages": [
                    {"role": "system", "content": "You are Cognito."},
                    {"role": "user", "content": "What is 2+2?"}
                ],
                "stream": true,
                "temperature": 0.5f32,
                "max_tokens": 2048
            })
        );
    }

    #[test]
    fn test_image_and_reduced_capacity() {
        let mut req = request();
        req.system_instruction = None;
        req.reduced_capacity = true;
        req.image = Some(ImageAttachment {
            mime_type: "image/png".into(),
            base64_data: "AAAA".into(),
            name: "a.png".into(),
            size_bytes: 3,
        });

        let body = serde_json::to_value(ChatRequest::from_invoke(&req)).unwrap();
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["max_tokens"], 1000);
        assert_eq!(body["temperature"], serde_json::json!(REDUCED_TEMPERATURE));
        assert_eq!(
            body["messages"][0]["content"],
            serde_json::json!([
                {"type": "text", "text": "What is 2+2?"},
                {"type": "image_url", "image_url": {"url": "data:image/png;base64,AAAA", "detail": "auto"}}
            ])
        );
    }

    #[test]
    fn test_chunk_parsing_tolerates_missing_fields() {
        let chunk: ChatChunk = serde_json::from_str(r#"{"choices":[{"delta":{}}]}"#).unwrap();
        assert_eq!(chunk.choices[0].delta.content, None);

        let chunk: ChatChunk = serde_json::from_str(r#"{"choices":[{"delta":{"content":"Hi"}}]}"#).unwrap();
        assert_eq!(chunk.choices[0].delta.content.as_deref(), Some("Hi"));
    }
}
