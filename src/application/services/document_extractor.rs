use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::instrument;

use crate::application::ports::{LlmProvider, LlmRequest, LlmResponse, ProviderError};
use crate::domain::{ExtractedLetterData, ExtractedResumeData, ExtractionMetadata, MediaType, Message};

use super::prompts::{
    letter_schema, resume_schema, LETTER_EXTRACTION_PROMPT, LETTER_PROMPT_VERSION,
    RESUME_EXTRACTION_PROMPT, RESUME_PROMPT_VERSION, TEXT_EXTRACTION_PROMPT,
};
use super::text_sanitizer::sanitize_extracted_text;

/// Domain-level composition over the LLM provider: raw text extraction from
/// an image or PDF, then structured extraction into the resume or
/// reference-letter schema.
pub struct DocumentExtractor {
    provider: Arc<dyn LlmProvider>,
    model: String,
    max_tokens: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("provider: {0}")]
    Provider(#[from] ProviderError),
    #[error("model returned no usable text from {0} document")]
    NoText(&'static str),
    #[error("malformed model output: {0}")]
    MalformedOutput(String),
}

impl ExtractionError {
    /// Only provider-classified transient failures are worth re-asking;
    /// empty or malformed output with the same input is not.
    pub fn is_retryable(&self) -> bool {
        match self {
            ExtractionError::Provider(e) => e.retryable,
            ExtractionError::NoText(_) | ExtractionError::MalformedOutput(_) => false,
        }
    }
}

impl DocumentExtractor {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            provider,
            model: model.into(),
            max_tokens,
        }
    }

    /// One unschema'd vision call producing raw text from the document.
    #[instrument(skip(self, document), fields(media_type = media_type.as_mime(), bytes = document.len()))]
    pub async fn extract_text(
        &self,
        document: &[u8],
        media_type: MediaType,
    ) -> Result<String, ExtractionError> {
        let request = LlmRequest {
            messages: vec![Message::user_document(
                media_type,
                document.to_vec(),
                TEXT_EXTRACTION_PROMPT,
            )],
            system_prompt: None,
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: 0.0,
            output_schema: None,
        };

        let response = self.provider.complete(request).await?;
        let text = sanitize_extracted_text(&response.content);
        if text.is_empty() {
            return Err(ExtractionError::NoText(media_type.as_mime()));
        }

        tracing::debug!(chars = text.len(), "Raw text extracted");
        Ok(text)
    }

    /// Schema-constrained resume extraction; stamps prompt/model versions
    /// and token accounting into the result's metadata.
    #[instrument(skip(self, text), fields(chars = text.len()))]
    pub async fn extract_resume_data(
        &self,
        text: &str,
    ) -> Result<ExtractedResumeData, ExtractionError> {
        let started = Instant::now();
        let (mut data, response) = self
            .structured_call::<ExtractedResumeData>(RESUME_EXTRACTION_PROMPT, text, resume_schema())
            .await?;

        data.metadata = Some(self.metadata(&response, RESUME_PROMPT_VERSION, started));
        Ok(data)
    }

    /// Schema-constrained reference-letter extraction.
    #[instrument(skip(self, text), fields(chars = text.len()))]
    pub async fn extract_letter_data(
        &self,
        text: &str,
    ) -> Result<ExtractedLetterData, ExtractionError> {
        let started = Instant::now();
        let (mut data, response) = self
            .structured_call::<ExtractedLetterData>(LETTER_EXTRACTION_PROMPT, text, letter_schema())
            .await?;

        data.metadata = Some(self.metadata(&response, LETTER_PROMPT_VERSION, started));
        Ok(data)
    }

    async fn structured_call<T: DeserializeOwned>(
        &self,
        prompt: &str,
        text: &str,
        schema: JsonValue,
    ) -> Result<(T, LlmResponse), ExtractionError> {
        let request = LlmRequest {
            messages: vec![Message::user_text(format!("{prompt}{text}"))],
            system_prompt: None,
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: 0.0,
            output_schema: Some(schema),
        };

        let response = self.provider.complete(request).await?;
        let data = serde_json::from_str(&response.content)
            .map_err(|e| ExtractionError::MalformedOutput(e.to_string()))?;

        Ok((data, response))
    }

    fn metadata(
        &self,
        response: &LlmResponse,
        prompt_version: &str,
        started: Instant,
    ) -> ExtractionMetadata {
        ExtractionMetadata {
            extracted_at: Utc::now(),
            model_version: response.model.clone(),
            prompt_version: prompt_version.to_string(),
            input_tokens: response.input_tokens,
            output_tokens: response.output_tokens,
            duration_ms: started.elapsed().as_millis() as u64,
        }
    }
}
