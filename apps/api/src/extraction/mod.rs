//! Uploaded documents and job descriptions into schema records.

pub mod document;
pub mod extractor;
pub mod handlers;
pub mod prompts;
