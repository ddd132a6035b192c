use std::fmt;

use serde_json::Value as JsonValue;

use crate::domain::Message;

/// A structured conversation request to a language model.
///
/// When `output_schema` is present the provider guarantees the response
/// content is valid JSON conforming to that schema (constrained decoding),
/// not free text. Backends without the feature must parse and validate raw
/// text output themselves and surface the same error taxonomy.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub messages: Vec<Message>,
    pub system_prompt: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub output_schema: Option<JsonValue>,
}

#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: String,
    pub model: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub stop_reason: Option<String>,
}

/// The single provider-facing operation. Implementations retry internally on
/// retryable failures (rate limit, transient server errors) and never on
/// fatal ones (authentication, malformed request, unsupported content).
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, ProviderError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorCode {
    RateLimited,
    ServerError,
    Network,
    Authentication,
    InvalidRequest,
    UnsupportedContent,
    MalformedResponse,
}

impl ProviderErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::Network => "network",
            Self::Authentication => "authentication",
            Self::InvalidRequest => "invalid_request",
            Self::UnsupportedContent => "unsupported_content",
            Self::MalformedResponse => "malformed_response",
        }
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider failure carrying the single classification signal (`retryable`)
/// the worker and provider-internal retry logic key off of.
#[derive(Debug, thiserror::Error)]
#[error("{provider} [{code}]: {message}")]
pub struct ProviderError {
    pub provider: &'static str,
    pub code: ProviderErrorCode,
    pub message: String,
    pub retryable: bool,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ProviderError {
    fn new(
        provider: &'static str,
        code: ProviderErrorCode,
        message: impl Into<String>,
        retryable: bool,
    ) -> Self {
        Self {
            provider,
            code,
            message: message.into(),
            retryable,
            source: None,
        }
    }

    pub fn with_source(
        mut self,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn rate_limited(provider: &'static str, message: impl Into<String>) -> Self {
        Self::new(provider, ProviderErrorCode::RateLimited, message, true)
    }

    pub fn server(provider: &'static str, message: impl Into<String>) -> Self {
        Self::new(provider, ProviderErrorCode::ServerError, message, true)
    }

    pub fn network(provider: &'static str, message: impl Into<String>) -> Self {
        Self::new(provider, ProviderErrorCode::Network, message, true)
    }

    pub fn authentication(provider: &'static str, message: impl Into<String>) -> Self {
        Self::new(provider, ProviderErrorCode::Authentication, message, false)
    }

    pub fn invalid_request(provider: &'static str, message: impl Into<String>) -> Self {
        Self::new(provider, ProviderErrorCode::InvalidRequest, message, false)
    }

    pub fn unsupported_content(provider: &'static str, message: impl Into<String>) -> Self {
        Self::new(provider, ProviderErrorCode::UnsupportedContent, message, false)
    }

    pub fn malformed_response(provider: &'static str, message: impl Into<String>) -> Self {
        Self::new(provider, ProviderErrorCode::MalformedResponse, message, false)
    }
}
