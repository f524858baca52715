//! Record Merger: folds candidate-supplied answers to review gaps back into the resume.

use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::prompts::{schema_section, to_prompt_json};
use crate::llm_client::{LlmClient, Tier};
use crate::models::resume::Resume;
use crate::models::review::MissingInfoItem;
use crate::tailoring::prompts::MERGE_MISSING_INFO_PROMPT_TEMPLATE;

const STAGE: &str = "merge_missing_info";

/// What the model sees of one item: the gap and the candidate's answer.
#[derive(Debug, Serialize)]
struct MergeInput<'a> {
    field: &'a str,
    data: &'a str,
}

/// Returns a new resume with every item's `data` merged in. Items without data are
/// ignored; when none carry data the input is returned unchanged without a call.
pub async fn merge_missing_info(
    llm: &LlmClient,
    resume: &Resume,
    items: &[MissingInfoItem],
) -> Result<Resume, AppError> {
    let inputs: Vec<MergeInput<'_>> = items
        .iter()
        .filter(|item| item.has_data())
        .map(|item| MergeInput {
            field: item.field.trim(),
            data: item.data.trim(),
        })
        .collect();

    if inputs.is_empty() {
        info!(items = items.len(), "no missing information carries data; resume unchanged");
        return Ok(resume.clone());
    }

    info!(items = inputs.len(), "merging missing information");
    let prompt = MERGE_MISSING_INFO_PROMPT_TEMPLATE
        .replace("{format_instructions}", &schema_section::<Resume>())
        .replace("{resume_data}", &to_prompt_json(resume)?)
        .replace("{missing_information}", &to_prompt_json(&inputs)?);

    let merged: Resume = llm
        .generate_record(&prompt, Tier::Primary, STAGE)
        .await
        .map_err(|e| match e {
            AppError::Extraction { source, .. } => {
                AppError::Merge(format!("merged resume did not decode: {source}"))
            }
            other => other,
        })?;

    if !merged.same_personal_info(resume) {
        warn!("merge changed personal information");
    }
    info!(
        experiences = merged.work_experience.len(),
        projects = merged.projects.len(),
        achievements = merged.achievements.len(),
        "missing information merged"
    );
    Ok(merged)
}
