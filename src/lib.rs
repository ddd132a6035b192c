//! Document intake service.
//!
//! Uploaded resumes and reference letters (images or PDFs) are pushed through
//! an LLM extraction pipeline by background workers pulling from a durable
//! job queue. Extracted data is validated and persisted together with a
//! monotonic per-entity status, so redelivered jobs are safe to re-run.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
