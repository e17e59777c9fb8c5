//! Model invoker port
//!
//! Defines the interface for calling a chat model on behalf of a role.
//! The engine never sees transport details: it builds an [`InvokeRequest`],
//! receives streamed [`StreamEvent`]s, and gets back an [`InvokeOutcome`].

use async_trait::async_trait;
use multimind_domain::{ActiveRole, ImageAttachment, StreamEvent};
use std::time::Duration;
use thiserror::Error;

/// Error category strings carried in [`InvokeOutcome::error`].
pub mod category {
    pub const AUTH: &str = "API key not valid";
    pub const RATE_LIMIT: &str = "Rate limit exceeded";
    pub const MODEL_NOT_FOUND: &str = "Model not found";
    pub const NETWORK: &str = "Network error";
    pub const EMPTY_RESPONSE: &str = "Empty response";
}

/// Errors an invoker adapter can hit.
///
/// Adapters convert these into an [`InvokeOutcome`] with
/// [`InvokeOutcome::from_error`]; the engine only ever sees outcomes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvocationError {
    #[error("API key is missing")]
    MissingApiKey,

    #[error("API key invalid or expired: {0}")]
    Unauthorized(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Model not found or not accessible: {0}")]
    ModelNotFound(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Model returned an empty response")]
    EmptyResponse,
}

impl InvocationError {
    /// Category string placed in [`InvokeOutcome::error`].
    pub fn category(&self) -> String {
        match self {
            InvocationError::MissingApiKey | InvocationError::Unauthorized(_) => {
                category::AUTH.to_string()
            }
            InvocationError::RateLimited(_) => category::RATE_LIMIT.to_string(),
            InvocationError::ModelNotFound(_) => category::MODEL_NOT_FOUND.to_string(),
            InvocationError::Timeout(_) | InvocationError::Network(_) => {
                category::NETWORK.to_string()
            }
            InvocationError::EmptyResponse => category::EMPTY_RESPONSE.to_string(),
            InvocationError::Api { .. } => self.to_string(),
        }
    }

    /// User-facing explanation placed in [`InvokeOutcome::text`].
    pub fn user_message(&self, model_name: &str) -> String {
        match self {
            InvocationError::MissingApiKey | InvocationError::Unauthorized(_) => {
                "The API key is invalid or expired. Check the API key configured for this channel."
                    .to_string()
            }
            InvocationError::RateLimited(_) => {
                "API rate limit exceeded. Please try again later.".to_string()
            }
            InvocationError::ModelNotFound(_) => format!(
                "Model {} does not exist or is not accessible. Check the model name or API permissions.",
                model_name
            ),
            InvocationError::Timeout(_) | InvocationError::Network(_) => format!(
                "Network error while contacting the API ({}). Check your connection and try again.",
                self
            ),
            InvocationError::EmptyResponse => {
                "The AI response was empty. Check the model configuration or try again.".to_string()
            }
            InvocationError::Api { .. } => format!("Error while talking to the API: {}", self),
        }
    }
}

/// One model call on behalf of a role.
#[derive(Debug, Clone)]
pub struct InvokeRequest {
    pub prompt: String,
    /// API-facing model name
    pub model_name: String,
    pub system_instruction: Option<String>,
    pub reduced_capacity: bool,
    /// Model limits, overridden by the reduced-capacity preset
    pub max_tokens: u32,
    pub temperature: f32,
    pub image: Option<ImageAttachment>,
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl InvokeRequest {
    /// Build a request from a resolved role.
    pub fn for_role(
        role: &ActiveRole,
        prompt: impl Into<String>,
        image: Option<&ImageAttachment>,
        reduced_capacity_enabled: bool,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            model_name: role.model.api_name.clone(),
            system_instruction: role.system_prompt().map(str::to_string),
            reduced_capacity: role.use_reduced_capacity(reduced_capacity_enabled),
            max_tokens: role.model.max_tokens,
            temperature: role.model.temperature,
            image: image.cloned(),
            base_url: role.channel.base_url.clone(),
            api_key: role.channel.api_key.clone(),
            timeout: role.channel.timeout(),
        }
    }
}

/// Resolution of an invocation. Either `text` holds the reply and `error`
/// is `None`, or `error` holds a category and `text` an explanation.
#[derive(Debug, Clone, PartialEq)]
pub struct InvokeOutcome {
    pub text: String,
    pub duration_ms: u64,
    pub error: Option<String>,
}

impl InvokeOutcome {
    pub fn success(text: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            text: text.into(),
            duration_ms,
            error: None,
        }
    }

    pub fn from_error(error: &InvocationError, model_name: &str, duration_ms: u64) -> Self {
        Self {
            text: error.user_message(model_name),
            duration_ms,
            error: Some(error.category()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Authentication failures halt the discussion with a channel hint.
    pub fn is_auth_error(&self) -> bool {
        self.error
            .as_deref()
            .is_some_and(|e| e.contains(category::AUTH) || e.contains("401"))
    }
}

/// Calls a chat model and streams its output.
///
/// Implementations must always resolve with an [`InvokeOutcome`]; transport
/// failures, timeouts and empty replies are reported through
/// [`InvokeOutcome::error`]. `on_event` receives the accumulated text in
/// order; the final resolved `text` is authoritative.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    async fn invoke(
        &self,
        request: InvokeRequest,
        on_event: &mut (dyn FnMut(StreamEvent) + Send),
    ) -> InvokeOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_detection() {
        let outcome = InvokeOutcome::from_error(
            &InvocationError::Unauthorized("bad key".into()),
            "gpt-4.1-mini",
            12,
        );
        assert!(outcome.is_auth_error());
        assert_eq!(outcome.error.as_deref(), Some("API key not valid"));

        let raw = InvokeOutcome {
            text: "x".into(),
            duration_ms: 1,
            error: Some("HTTP 401 Unauthorized".into()),
        };
        assert!(raw.is_auth_error());
    }

    #[test]
    fn test_other_errors_are_not_auth() {
        for error in [
            InvocationError::RateLimited("slow down".into()),
            InvocationError::ModelNotFound("gpt-x".into()),
            InvocationError::Network("connection refused".into()),
            InvocationError::EmptyResponse,
        ] {
            let outcome = InvokeOutcome::from_error(&error, "gpt-x", 1);
            assert!(!outcome.is_auth_error(), "{:?}", error);
            assert!(!outcome.is_success());
        }
    }

    #[test]
    fn test_categories() {
        assert_eq!(InvocationError::Timeout(Duration::from_secs(30)).category(), "Network error");
        assert_eq!(InvocationError::MissingApiKey.category(), "API key not valid");
        assert_eq!(
            InvocationError::Api {
                status: 500,
                message: "boom".into()
            }
            .category(),
            "API error (500): boom"
        );
    }

    #[test]
    fn test_model_not_found_message_names_model() {
        let text = InvocationError::ModelNotFound("x".into()).user_message("gpt-9");
        assert!(text.contains("gpt-9"));
    }

    #[test]
    fn test_request_takes_model_limits() {
        let role = ActiveRole {
            role: multimind_domain::Role::new("cognito", "Cognito", "m1"),
            model: multimind_domain::Model::new("m1", "Mini", "gpt-4.1-mini", "c1").with_limits(2048, 0.2),
            channel: multimind_domain::Channel::new("c1", "Official", "https://api.openai.com/v1"),
        };
        let request = InvokeRequest::for_role(&role, "hi", None, false);
        assert_eq!(request.max_tokens, 2048);
        assert_eq!(request.temperature, 0.2);
        assert!(!request.reduced_capacity);
    }
}
