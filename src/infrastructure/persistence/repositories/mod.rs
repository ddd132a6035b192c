mod memory_repository;
mod pg_reference_letter_repository;
mod pg_resume_repository;

pub use memory_repository::{InMemoryReferenceLetterRepository, InMemoryResumeRepository};
pub use pg_reference_letter_repository::PgReferenceLetterRepository;
pub use pg_resume_repository::PgResumeRepository;
