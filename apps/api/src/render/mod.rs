//! Rendering collaborator: turns a tailored resume into a PDF inside a request workspace.
pub mod latex;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::job::JobRequirements;
use crate::models::resume::TailoredResume;
use crate::workspace::RequestWorkspace;

pub use latex::LatexRenderer;

#[async_trait]
pub trait ResumeRenderer: Send + Sync {
    /// Renders `resume` for `job` and returns the path of the produced PDF,
    /// which lives inside `workspace`.
    async fn render(
        &self,
        resume: &TailoredResume,
        job: &JobRequirements,
        workspace: &RequestWorkspace,
    ) -> Result<PathBuf, AppError>;
}
