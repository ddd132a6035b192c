mod document_status;
mod extracted_data;
mod ids;
mod media_type;
mod message;
mod processing_request;
mod reference_letter;
mod resume;
mod storage_key;

pub use document_status::DocumentStatus;
pub use extracted_data::{
    DiscoveredSkill, Education, ExperienceMention, ExtractedLetterData, ExtractedResumeData,
    ExtractionMetadata, LetterAuthor, SkillMention, WorkExperience,
};
pub use ids::{FileId, JobId, ReferenceLetterId, ResumeId, UserId};
pub use media_type::MediaType;
pub use message::{ContentBlock, Message, MessageRole};
pub use processing_request::{ProcessingRequest, RequestValidationError};
pub use reference_letter::ReferenceLetter;
pub use resume::Resume;
pub use storage_key::StorageKey;
