use tracing::{info, warn};

use crate::errors::AppError;
use crate::evaluation::prompts::IMPROVEMENT_ANALYSIS_PROMPT_TEMPLATE;
use crate::llm_client::prompts::{schema_section, to_prompt_json};
use crate::llm_client::{LlmClient, Tier};
use crate::models::resume::Resume;
use crate::models::review::{ImprovementAnalysis, ImprovementDraft};

/// Before/after summaries and a list of improvements between two resumes.
///
/// Never fails: any generation or decoding problem yields
/// [`ImprovementAnalysis::fallback`].
pub async fn analyze_improvements(
    llm: &LlmClient,
    original: &Resume,
    enhanced: &Resume,
) -> ImprovementAnalysis {
    match try_analyze(llm, original, enhanced).await {
        Ok(analysis) => {
            info!(improvements = analysis.improvements.len(), "improvements analysed");
            analysis
        }
        Err(e) => {
            warn!(error = %e, "improvement analysis failed; returning fallback");
            ImprovementAnalysis::fallback()
        }
    }
}

async fn try_analyze(
    llm: &LlmClient,
    original: &Resume,
    enhanced: &Resume,
) -> Result<ImprovementAnalysis, AppError> {
    let prompt = IMPROVEMENT_ANALYSIS_PROMPT_TEMPLATE
        .replace("{format_instructions}", &schema_section::<ImprovementDraft>())
        .replace("{original_resume_data}", &to_prompt_json(original)?)
        .replace("{enhanced_resume_data}", &to_prompt_json(enhanced)?);

    let draft: ImprovementDraft = llm
        .generate_record(&prompt, Tier::Primary, "analyze_improvements")
        .await?;
    Ok(draft.into())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::llm_client::testing::ScriptedBackend;
    use crate::models::review::{DEFAULT_ENHANCED_SUMMARY, FALLBACK_IMPROVEMENTS};

    fn resumes() -> (Resume, Resume) {
        let original = Resume {
            name: Some("Jane Doe".to_string()),
            ..Resume::default()
        };
        let enhanced = Resume {
            name: Some("Jane Doe".to_string()),
            achievements: vec![Some("Winner, RustConf hackathon".to_string())],
            ..Resume::default()
        };
        (original, enhanced)
    }

    #[tokio::test]
    async fn test_successful_analysis_is_normalised() {
        let reply = r#"{"original_summary": "Backend engineer.", "improvements": ["Added 12 keywords", "  "]}"#;
        let llm = LlmClient::new(Arc::new(ScriptedBackend::new().reply("<original_resume>", reply)));
        let (original, enhanced) = resumes();

        let analysis = analyze_improvements(&llm, &original, &enhanced).await;
        assert_eq!(analysis.original_summary, "Backend engineer.");
        assert_eq!(analysis.enhanced_summary, DEFAULT_ENHANCED_SUMMARY);
        assert_eq!(analysis.improvements, vec!["Added 12 keywords"]);
    }

    #[tokio::test]
    async fn test_backend_failure_returns_fallback() {
        let llm = LlmClient::new(Arc::new(
            ScriptedBackend::new().fail("<original_resume>", 503, "unavailable"),
        ));
        let (original, enhanced) = resumes();

        let analysis = analyze_improvements(&llm, &original, &enhanced).await;
        assert_eq!(analysis, ImprovementAnalysis::fallback());
        assert_eq!(analysis.improvements.len(), FALLBACK_IMPROVEMENTS.len());
    }

    #[tokio::test]
    async fn test_garbage_or_wrong_shape_returns_fallback() {
        let (original, enhanced) = resumes();
        for reply in ["no json here", r#"{"improvements": "just one string"}"#, "[1, 2]"] {
            let llm = LlmClient::new(Arc::new(
                ScriptedBackend::new().reply("<original_resume>", reply),
            ));
            let analysis = analyze_improvements(&llm, &original, &enhanced).await;
            assert!(!analysis.improvements.is_empty());
            assert_eq!(analysis, ImprovementAnalysis::fallback(), "reply {reply:?}");
        }
    }
}
