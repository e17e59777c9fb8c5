//! Error types for the chat-completions adapter

use crate::openai::types::ApiErrorBody;
use multimind_application::InvocationError;
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while talking to a chat-completions endpoint
#[derive(Error, Debug)]
pub enum OpenAiError {
    #[error("API key is missing")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Model returned an empty response")]
    EmptyResponse,
}

impl OpenAiError {
    /// Map onto the port's error vocabulary. `timeout` is the limit the
    /// request ran with.
    pub fn into_invocation_error(self, timeout: Duration) -> InvocationError {
        match self {
            OpenAiError::MissingApiKey => InvocationError::MissingApiKey,
            OpenAiError::EmptyResponse => InvocationError::EmptyResponse,
            OpenAiError::Http(e) if e.is_timeout() => InvocationError::Timeout(timeout),
            OpenAiError::Http(e) => InvocationError::Network(e.to_string()),
            OpenAiError::Stream(message) => InvocationError::Network(message),
            OpenAiError::Status { status, body } => {
                let message = api_error_message(&body).unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("unknown error")
                        .to_string()
                });
                match status {
                    StatusCode::UNAUTHORIZED => InvocationError::Unauthorized(message),
                    StatusCode::TOO_MANY_REQUESTS => InvocationError::RateLimited(message),
                    StatusCode::NOT_FOUND => InvocationError::ModelNotFound(message),
                    other => InvocationError::Api {
                        status: other.as_u16(),
                        message,
                    },
                }
            }
        }
    }
}

/// `error.message` from an API error body, if the body has one.
fn api_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .map(|b| b.error.message)
        .filter(|m| !m.trim().is_empty())
}
