use std::time::Duration;

use base64::{engine::general_purpose, Engine as _};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use tracing::{debug, instrument, warn};

use crate::application::ports::{LlmProvider, LlmRequest, LlmResponse, ProviderError};
use crate::domain::{ContentBlock, Message};

const PROVIDER: &str = "anthropic";
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);
const MAX_RETRIES: u32 = 3;

/// Name of the forced tool used for schema-constrained output. The model
/// must call it with arguments matching the request's `output_schema`, which
/// is what makes the response guaranteed-valid JSON.
const EXTRACTION_TOOL: &str = "record_extraction";

/// Messages-API client with bounded internal retry.
///
/// Retries with exponential backoff on 429, 5xx and transport failures only;
/// authentication and request errors surface immediately as fatal.
pub struct AnthropicClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl AnthropicClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the client at a different endpoint (proxies, test servers).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client build never fails with valid TLS config");
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn build_body(&self, request: &LlmRequest) -> JsonValue {
        let messages: Vec<JsonValue> = request.messages.iter().map(encode_message).collect();

        let mut body = json!({
            "model": request.model,
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
            "messages": messages,
        });

        if let Some(system) = &request.system_prompt {
            body["system"] = json!(system);
        }

        if let Some(schema) = &request.output_schema {
            body["tools"] = json!([{
                "name": EXTRACTION_TOOL,
                "description": "Record the structured data extracted from the document.",
                "input_schema": schema,
            }]);
            body["tool_choice"] = json!({ "type": "tool", "name": EXTRACTION_TOOL });
        }

        body
    }

    async fn send_once(&self, body: &JsonValue) -> Result<ApiResponse, ProviderError> {
        let url = format!("{}/v1/messages", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::network(PROVIDER, e.to_string()).with_source(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(classify_status(status.as_u16(), message));
        }

        response
            .json::<ApiResponse>()
            .await
            .map_err(|e| ProviderError::malformed_response(PROVIDER, e.to_string()).with_source(e))
    }
}

#[async_trait::async_trait]
impl LlmProvider for AnthropicClient {
    #[instrument(skip(self, request), fields(model = %request.model, constrained = request.output_schema.is_some()))]
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, ProviderError> {
        let constrained = request.output_schema.is_some();
        let body = self.build_body(&request);

        let mut last_error: Option<ProviderError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Provider call failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }

            match self.send_once(&body).await {
                Ok(api) => {
                    let content = extract_content(&api, constrained)?;
                    debug!(
                        input_tokens = api.usage.input_tokens,
                        output_tokens = api.usage.output_tokens,
                        "Provider call succeeded"
                    );
                    return Ok(LlmResponse {
                        content,
                        model: api.model,
                        input_tokens: api.usage.input_tokens,
                        output_tokens: api.usage.output_tokens,
                        stop_reason: api.stop_reason,
                    });
                }
                Err(e) if e.retryable => last_error = Some(e),
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ProviderError::server(PROVIDER, format!("gave up after {MAX_RETRIES} attempts"))
        }))
    }
}

fn encode_message(message: &Message) -> JsonValue {
    let content: Vec<JsonValue> = message.content.iter().map(encode_block).collect();
    json!({ "role": message.role.as_str(), "content": content })
}

fn encode_block(block: &ContentBlock) -> JsonValue {
    match block {
        ContentBlock::Text { text } => json!({ "type": "text", "text": text }),
        ContentBlock::Image { media_type, data } => {
            let source = json!({
                "type": "base64",
                "media_type": media_type.as_mime(),
                "data": general_purpose::STANDARD.encode(data),
            });
            if media_type.is_image() {
                json!({ "type": "image", "source": source })
            } else {
                // PDFs ride the document block; same base64 source shape.
                json!({ "type": "document", "source": source })
            }
        }
    }
}

fn classify_status(status: u16, message: String) -> ProviderError {
    match status {
        401 | 403 => ProviderError::authentication(PROVIDER, message),
        413 | 415 => ProviderError::unsupported_content(PROVIDER, message),
        429 => ProviderError::rate_limited(PROVIDER, message),
        500..=599 => ProviderError::server(PROVIDER, format!("HTTP {status}: {message}")),
        _ => ProviderError::invalid_request(PROVIDER, format!("HTTP {status}: {message}")),
    }
}

/// Pull the response content out of the API payload. For constrained
/// requests that is the forced tool call's input serialized back to JSON;
/// otherwise the concatenated text blocks.
fn extract_content(api: &ApiResponse, constrained: bool) -> Result<String, ProviderError> {
    if constrained {
        let input = api
            .content
            .iter()
            .find(|block| block.block_type == "tool_use")
            .and_then(|block| block.input.as_ref())
            .ok_or_else(|| {
                ProviderError::malformed_response(PROVIDER, "no tool_use block in response")
            })?;
        return serde_json::to_string(input)
            .map_err(|e| ProviderError::malformed_response(PROVIDER, e.to_string()));
    }

    let text: String = api
        .content
        .iter()
        .filter(|block| block.block_type == "text")
        .filter_map(|block| block.text.as_deref())
        .collect::<Vec<_>>()
        .join("\n");

    if text.is_empty() {
        return Err(ProviderError::malformed_response(
            PROVIDER,
            "response contained no text blocks",
        ));
    }
    Ok(text)
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    content: Vec<ApiContentBlock>,
    model: String,
    #[serde(default)]
    stop_reason: Option<String>,
    usage: ApiUsage,
}

#[derive(Debug, Deserialize)]
struct ApiContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    input: Option<JsonValue>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::ProviderErrorCode;
    use crate::domain::MediaType;

    #[test]
    fn given_rate_limit_status_when_classifying_then_error_is_retryable() {
        let err = classify_status(429, "slow down".to_string());
        assert_eq!(err.code, ProviderErrorCode::RateLimited);
        assert!(err.retryable);
    }

    #[test]
    fn given_server_error_status_when_classifying_then_error_is_retryable() {
        let err = classify_status(503, "overloaded".to_string());
        assert_eq!(err.code, ProviderErrorCode::ServerError);
        assert!(err.retryable);
    }

    #[test]
    fn given_auth_status_when_classifying_then_error_is_fatal() {
        let err = classify_status(401, "bad key".to_string());
        assert_eq!(err.code, ProviderErrorCode::Authentication);
        assert!(!err.retryable);
    }

    #[test]
    fn given_bad_request_status_when_classifying_then_error_is_fatal() {
        let err = classify_status(400, "bad schema".to_string());
        assert_eq!(err.code, ProviderErrorCode::InvalidRequest);
        assert!(!err.retryable);
    }

    #[test]
    fn given_tool_use_response_when_extracting_constrained_then_returns_tool_input() {
        let api: ApiResponse = serde_json::from_str(
            r#"{
                "content": [{"type": "tool_use", "input": {"name": "Jane Doe"}}],
                "model": "m",
                "stop_reason": "tool_use",
                "usage": {"input_tokens": 10, "output_tokens": 5}
            }"#,
        )
        .unwrap();

        let content = extract_content(&api, true).unwrap();
        assert_eq!(content, r#"{"name":"Jane Doe"}"#);
    }

    #[test]
    fn given_text_response_when_extracting_unconstrained_then_joins_text_blocks() {
        let api: ApiResponse = serde_json::from_str(
            r#"{
                "content": [
                    {"type": "text", "text": "page one"},
                    {"type": "text", "text": "page two"}
                ],
                "model": "m",
                "usage": {"input_tokens": 1, "output_tokens": 2}
            }"#,
        )
        .unwrap();

        let content = extract_content(&api, false).unwrap();
        assert_eq!(content, "page one\npage two");
    }

    #[test]
    fn given_missing_tool_block_when_extracting_constrained_then_fails_fatal() {
        let api: ApiResponse = serde_json::from_str(
            r#"{
                "content": [{"type": "text", "text": "not a tool call"}],
                "model": "m",
                "usage": {"input_tokens": 1, "output_tokens": 2}
            }"#,
        )
        .unwrap();

        let err = extract_content(&api, true).unwrap_err();
        assert_eq!(err.code, ProviderErrorCode::MalformedResponse);
        assert!(!err.retryable);
    }

    #[test]
    fn given_pdf_block_when_encoding_then_uses_document_type() {
        let block = encode_block(&ContentBlock::Image {
            media_type: MediaType::Pdf,
            data: vec![1, 2, 3],
        });
        assert_eq!(block["type"], "document");
        assert_eq!(block["source"]["media_type"], "application/pdf");
    }

    #[test]
    fn given_png_block_when_encoding_then_uses_image_type() {
        let block = encode_block(&ContentBlock::Image {
            media_type: MediaType::Png,
            data: vec![1, 2, 3],
        });
        assert_eq!(block["type"], "image");
        assert_eq!(block["source"]["media_type"], "image/png");
    }
}
