//! Turns unstructured resume and job text into validated records.

use tracing::info;

use crate::errors::AppError;
use crate::extraction::document::{DocumentParser, UploadedDocument};
use crate::extraction::prompts::{
    JOB_EXTRACTION_PROMPT_TEMPLATE, RESUME_EXTRACTION_PROMPT_TEMPLATE,
    SKILL_GROUP_EXTRACTION_PROMPT_TEMPLATE,
};
use crate::llm_client::{prompts::schema_section, LlmClient, Tier};
use crate::models::job::{JobRequirements, JobRequirementsV2};
use crate::models::resume::Resume;
use crate::workspace::RequestWorkspace;

fn require_text(text: &str) -> Result<&str, AppError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::Validation("no input".to_string()));
    }
    Ok(text)
}

fn fill(template: &str, placeholder: &str, text: &str, format: String) -> String {
    template
        .replace("{format_instructions}", &format)
        .replace(placeholder, text)
}

pub async fn extract_resume(llm: &LlmClient, resume_text: &str) -> Result<Resume, AppError> {
    let text = require_text(resume_text)?;
    let prompt = fill(
        RESUME_EXTRACTION_PROMPT_TEMPLATE,
        "{resume_text}",
        text,
        schema_section::<Resume>(),
    );
    let resume: Resume = llm
        .generate_record(&prompt, Tier::Economy, "extract_resume")
        .await?;
    info!(
        experiences = resume.work_experience.len(),
        projects = resume.projects.len(),
        "resume extracted"
    );
    Ok(resume)
}

pub async fn extract_job_v1(llm: &LlmClient, job_text: &str) -> Result<JobRequirements, AppError> {
    let text = require_text(job_text)?;
    let prompt = fill(
        JOB_EXTRACTION_PROMPT_TEMPLATE,
        "{job_description}",
        text,
        schema_section::<JobRequirements>(),
    );
    let job: JobRequirements = llm
        .generate_record(&prompt, Tier::Economy, "extract_job_v1")
        .await?;
    info!(keywords = job.keywords.len(), "job requirements extracted");
    Ok(job)
}

pub async fn extract_job_v2(
    llm: &LlmClient,
    job_text: &str,
) -> Result<JobRequirementsV2, AppError> {
    let text = require_text(job_text)?;
    let prompt = fill(
        SKILL_GROUP_EXTRACTION_PROMPT_TEMPLATE,
        "{job_description}",
        text,
        schema_section::<JobRequirementsV2>(),
    );
    let job: JobRequirementsV2 = llm
        .generate_record(&prompt, Tier::Primary, "extract_job_v2")
        .await?;
    info!(groups = job.required_skills.len(), "skill groups extracted");
    Ok(job)
}

/// Runs the v1 and v2 extractions concurrently. Either failure fails the pair.
pub async fn extract_job_both(
    llm: &LlmClient,
    job_text: &str,
) -> Result<(JobRequirements, JobRequirementsV2), AppError> {
    require_text(job_text)?;
    tokio::try_join!(extract_job_v1(llm, job_text), extract_job_v2(llm, job_text))
}

/// Job text from the request body, else from an uploaded job document.
pub async fn resolve_job_text(
    text: Option<&str>,
    document: Option<&UploadedDocument>,
    parser: &dyn DocumentParser,
    workspace: &RequestWorkspace,
) -> Result<String, AppError> {
    if let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(text.to_string());
    }
    match document {
        Some(document) => parser.parse(document, workspace).await,
        None => Err(AppError::Validation("no input".to_string())),
    }
}
