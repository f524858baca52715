use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::decoder::DecodeFailure;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Generation failed in {stage}: {source}")]
    Generation {
        stage: &'static str,
        #[source]
        source: LlmError,
    },

    #[error("Extraction failed in {stage}: {source}")]
    Extraction {
        stage: &'static str,
        #[source]
        source: DecodeFailure,
    },

    #[error("Merge failed: {0}")]
    Merge(String),

    #[error("Render failed: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stage that produced the failure, when it came from a pipeline stage.
    pub fn stage(&self) -> Option<&'static str> {
        match self {
            AppError::Generation { stage, .. } | AppError::Extraction { stage, .. } => Some(stage),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Configuration(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIGURATION_ERROR")
            }
            AppError::Generation { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "GENERATION_ERROR"),
            AppError::Extraction { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "EXTRACTION_ERROR"),
            AppError::Merge(_) => (StatusCode::INTERNAL_SERVER_ERROR, "MERGE_ERROR"),
            AppError::Render(_) => (StatusCode::INTERNAL_SERVER_ERROR, "RENDER_ERROR"),
            AppError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        if status.is_server_error() {
            tracing::error!(stage = ?self.stage(), "{self}");
        }

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string()
            }
        }));

        (status, body).into_response()
    }
}
