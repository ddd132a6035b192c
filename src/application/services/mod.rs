mod document_extractor;
mod document_worker;
mod enqueue;
mod prompts;
mod text_sanitizer;
mod validator;

pub use document_extractor::{DocumentExtractor, ExtractionError};
pub use document_worker::{DocumentWorker, ProcessOutcome, TransientError};
pub use enqueue::DocumentEnqueuer;
pub use prompts::{
    letter_schema, resume_schema, LETTER_EXTRACTION_PROMPT, LETTER_PROMPT_VERSION,
    RESUME_EXTRACTION_PROMPT, RESUME_PROMPT_VERSION, TEXT_EXTRACTION_PROMPT,
    TEXT_PROMPT_VERSION,
};
pub use text_sanitizer::sanitize_extracted_text;
pub use validator::{
    validate_letter_data, validate_resume_data, ValidationCause, ValidationError,
};
