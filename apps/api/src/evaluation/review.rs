use tracing::info;

use crate::errors::AppError;
use crate::evaluation::prompts::CV_REVIEW_PROMPT_TEMPLATE;
use crate::llm_client::prompts::{schema_section, to_prompt_json};
use crate::llm_client::{LlmClient, Tier};
use crate::models::alignment::AlignmentResult;
use crate::models::job::JobRequirements;
use crate::models::resume::Resume;
use crate::models::review::CvReview;

/// Reviews a resume against a job and its alignment. Returned missing-information
/// items always carry an empty `data` slot.
pub async fn review_cv(
    llm: &LlmClient,
    resume: &Resume,
    job: &JobRequirements,
    alignment: &AlignmentResult,
) -> Result<CvReview, AppError> {
    let prompt = CV_REVIEW_PROMPT_TEMPLATE
        .replace("{format_instructions}", &schema_section::<CvReview>())
        .replace("{resume_json}", &to_prompt_json(resume)?)
        .replace("{job_json}", &to_prompt_json(job)?)
        .replace("{alignment_scores}", &to_prompt_json(alignment)?);

    let review: CvReview = llm
        .generate_record(&prompt, Tier::Primary, "review_cv")
        .await?;
    let review = review.with_blank_data();

    info!(
        advantages = review.advantages.len(),
        disadvantages = review.disadvantages.len(),
        missing = review.missing_information.len(),
        "cv review generated"
    );
    Ok(review)
}
