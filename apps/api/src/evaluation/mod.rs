//! Evaluation: scoring a resume against a job, reviewing it, and comparing versions.
pub mod handlers;
pub mod improvements;
pub mod pipeline;
pub mod preservation;
pub mod prompts;
pub mod report;
pub mod review;
pub mod scorer;
