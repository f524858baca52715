use std::sync::Arc;

use crate::config::Config;
use crate::errors::AppError;
use crate::extraction::document::DocumentParser;
use crate::llm_client::LlmClient;
use crate::render::ResumeRenderer;
use crate::workspace::RequestWorkspace;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no per-request data; every pipeline record lives in its request's call tree.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    pub config: Arc<Config>,
    /// Pluggable document parser. Default: LocalDocumentParser.
    pub documents: Arc<dyn DocumentParser>,
    /// Pluggable resume renderer. Default: LatexRenderer.
    pub renderer: Arc<dyn ResumeRenderer>,
}

impl AppState {
    /// A fresh scratch directory for one request.
    pub async fn workspace(&self) -> Result<RequestWorkspace, AppError> {
        RequestWorkspace::create(&self.config.temp_dir).await
    }
}
