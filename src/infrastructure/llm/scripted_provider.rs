use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use serde_json::Value as JsonValue;

use crate::application::ports::{LlmProvider, LlmRequest, LlmResponse, ProviderError};

/// Provider returning pre-scripted responses in order. Used by tests and
/// scaffold mode; every call pops the next scripted result.
pub struct ScriptedLlmProvider {
    responses: Mutex<VecDeque<Result<LlmResponse, ProviderError>>>,
    calls: AtomicUsize,
}

impl ScriptedLlmProvider {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn push_text(&self, text: impl Into<String>) {
        self.push_response(mock_response(text.into()));
    }

    /// Script a structured response, the way a schema-constrained call would
    /// return it.
    pub fn push_json(&self, value: JsonValue) {
        self.push_response(mock_response(value.to_string()));
    }

    pub fn push_response(&self, response: LlmResponse) {
        self.responses
            .lock()
            .expect("scripted provider lock poisoned")
            .push_back(Ok(response));
    }

    pub fn push_error(&self, error: ProviderError) {
        self.responses
            .lock()
            .expect("scripted provider lock poisoned")
            .push_back(Err(error));
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for ScriptedLlmProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn mock_response(content: String) -> LlmResponse {
    LlmResponse {
        content,
        model: "scripted-model".to_string(),
        input_tokens: 128,
        output_tokens: 64,
        stop_reason: Some("end_turn".to_string()),
    }
}

#[async_trait::async_trait]
impl LlmProvider for ScriptedLlmProvider {
    async fn complete(&self, _request: LlmRequest) -> Result<LlmResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .expect("scripted provider lock poisoned")
            .pop_front()
            .unwrap_or_else(|| {
                Err(ProviderError::invalid_request(
                    "scripted",
                    "no scripted response left",
                ))
            })
    }
}
