//! LLM Client: the single point of entry for every generation and embedding call.
//!
//! ARCHITECTURAL RULE: No other module may talk to a model provider directly.
//! Stages build a prompt, call `generate_record`, and get back a validated record.
//!
//! The provider sits behind `GenerationBackend`. Production wires in the Azure
//! OpenAI adapter; tests script replies in memory.
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::decoder;
use crate::errors::AppError;
use crate::models::Schema;

pub mod azure;
pub mod prompts;
#[cfg(test)]
pub mod testing;

/// Quality/cost selector for the model serving a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Primary,
    Economy,
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("embedding backend returned an empty vector")]
    EmptyEmbedding,

    #[error("cannot embed empty text")]
    EmptyInput,
}

/// One chat completion request as seen by a backend.
#[derive(Debug, Clone)]
pub struct CompletionRequest<'a> {
    pub system: &'a str,
    pub prompt: &'a str,
    pub tier: Tier,
    /// Name of the record shape the reply is expected to decode into.
    pub schema_hint: &'a str,
}

#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, LlmError>;

    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError>;
}

/// The LLM client shared by every pipeline stage.
#[derive(Clone)]
pub struct LlmClient {
    backend: Arc<dyn GenerationBackend>,
}

impl LlmClient {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    /// Runs one completion and returns the trimmed reply. An empty reply is an error.
    pub async fn generate(
        &self,
        prompt: &str,
        schema_hint: &str,
        tier: Tier,
    ) -> Result<String, LlmError> {
        let reply = self
            .backend
            .complete(CompletionRequest {
                system: prompts::RESUME_WRITER_PERSONA,
                prompt,
                tier,
                schema_hint,
            })
            .await?;

        let reply = reply.trim();
        if reply.is_empty() {
            return Err(LlmError::EmptyContent);
        }
        debug!(
            schema = schema_hint,
            ?tier,
            chars = reply.len(),
            preview = %preview(reply),
            "generation call returned"
        );
        Ok(reply.to_string())
    }

    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(LlmError::EmptyInput);
        }
        let vector = self.backend.embed(text).await?;
        if vector.is_empty() {
            return Err(LlmError::EmptyEmbedding);
        }
        Ok(vector)
    }

    /// Generate, then decode and validate as `T`. Failures carry `stage`.
    pub async fn generate_record<T: Schema>(
        &self,
        prompt: &str,
        tier: Tier,
        stage: &'static str,
    ) -> Result<T, AppError> {
        let raw = self
            .generate(prompt, T::NAME, tier)
            .await
            .map_err(|source| AppError::Generation { stage, source })?;

        decoder::decode::<T>(&raw).map_err(|source| AppError::Extraction { stage, source })
    }
}

fn preview(text: &str) -> &str {
    match text.char_indices().nth(120) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
