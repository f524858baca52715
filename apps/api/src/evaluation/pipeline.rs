//! The evaluate flow: (resume extraction ∥ job pair), then scoring, then review.
//! Any stage failure aborts the flow with that stage's error.

use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::evaluation::review::review_cv;
use crate::evaluation::scorer::score_alignment;
use crate::extraction::extractor::{extract_job_both, extract_resume};
use crate::llm_client::LlmClient;
use crate::models::alignment::AlignmentResult;
use crate::models::job::{JobRequirements, JobRequirementsV2};
use crate::models::resume::Resume;
use crate::models::review::CvReview;

#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub resume_data: Resume,
    pub job_data: JobRequirements,
    pub job_data_v2: JobRequirementsV2,
    pub alignment_scores: AlignmentResult,
    pub cv_comment: CvReview,
}

pub async fn evaluate(
    llm: &LlmClient,
    resume_text: &str,
    job_text: &str,
) -> Result<Evaluation, AppError> {
    if job_text.trim().is_empty() || resume_text.trim().is_empty() {
        return Err(AppError::Validation("no input".to_string()));
    }

    let (resume_data, (job_data, job_data_v2)) = tokio::try_join!(
        extract_resume(llm, resume_text),
        extract_job_both(llm, job_text)
    )?;

    let alignment_scores = score_alignment(llm, &resume_data, &job_data, &job_data_v2).await?;
    let cv_comment = review_cv(llm, &resume_data, &job_data, &alignment_scores).await?;

    info!(groups = alignment_scores.len(), "evaluation complete");
    Ok(Evaluation {
        resume_data,
        job_data,
        job_data_v2,
        alignment_scores,
        cv_comment,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::llm_client::testing::ScriptedBackend;

    const RESUME_REPLY: &str = r#"{"name": "Jane Doe", "skill_section": [{"name": "Languages", "skills": ["Rust"]}]}"#;
    const V1_REPLY: &str = r#"{"job_title": "Backend Engineer", "company_name": "Acme"}"#;
    const V2_REPLY: &str = r#"{"required_skills": [{"group_name": "Backend Development", "requirements": ["Rust", "Kafka"]}]}"#;
    const SCORE_REPLY: &str = r#"{"alignment_scores": [{"group_name": "Backend Development", "satisfied_requirements": ["Rust"], "unsatisfied_requirements": ["Kafka"]}]}"#;
    const REVIEW_REPLY: &str = r#"{"advantages": ["Rust"], "disadvantages": ["Kafka"], "missing_information": []}"#;

    // Later-stage needles come first: their prompts embed earlier outputs.
    fn scripted(delay: Duration) -> ScriptedBackend {
        ScriptedBackend::new()
            .reply("<alignment_scores>", REVIEW_REPLY)
            .reply("<skill_groups>", SCORE_REPLY)
            .slow_reply("applicant's resume", RESUME_REPLY, delay)
            .slow_reply("skill groups", V2_REPLY, delay)
            .slow_reply("company overview", V1_REPLY, delay)
    }

    #[tokio::test(start_paused = true)]
    async fn test_evaluate_chains_stages_after_concurrent_extraction() {
        let delay = Duration::from_millis(300);
        let backend = Arc::new(scripted(delay));
        let llm = LlmClient::new(backend.clone());

        let started = tokio::time::Instant::now();
        let evaluation = evaluate(&llm, "Jane Doe resume", "Backend role at Acme").await.unwrap();

        assert!(started.elapsed() < delay * 2);
        assert_eq!(backend.call_count(), 5);
        assert_eq!(evaluation.resume_data.name.as_deref(), Some("Jane Doe"));
        let group = evaluation.alignment_scores.get("Backend Development").unwrap();
        assert_eq!(group.unsatisfied_requirements, vec!["Kafka"]);
        assert_eq!(evaluation.cv_comment.advantages, vec![Some("Rust".to_string())]);

        let calls = backend.calls();
        let review_call = calls.iter().position(|c| c.prompt.contains("<alignment_scores>")).unwrap();
        let score_call = calls.iter().position(|c| c.prompt.contains("<skill_groups>")).unwrap();
        assert!(score_call < review_call);
        assert_eq!(review_call, 4);
    }

    #[tokio::test]
    async fn test_scoring_failure_aborts_before_review() {
        let backend = Arc::new(
            ScriptedBackend::new()
                .fail("<skill_groups>", 429, "rate limited")
                .reply("applicant's resume", RESUME_REPLY)
                .reply("skill groups", V2_REPLY)
                .reply("company overview", V1_REPLY),
        );
        let llm = LlmClient::new(backend.clone());

        let err = evaluate(&llm, "resume", "job").await.unwrap_err();
        assert_eq!(err.stage(), Some("score_alignment"));
        assert!(backend.calls_matching("<alignment_scores>").is_empty());
    }
}
