use axum::{
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::evaluation::improvements::analyze_improvements;
use crate::evaluation::pipeline::{evaluate, Evaluation};
use crate::evaluation::preservation::content_preservation;
use crate::evaluation::report::render_report;
use crate::evaluation::review::review_cv;
use crate::evaluation::scorer::score_alignment;
use crate::extraction::handlers::UploadForm;
use crate::models::alignment::AlignmentResult;
use crate::models::job::{JobRequirements, JobRequirementsV2};
use crate::models::resume::Resume;
use crate::models::review::{CvReview, ImprovementAnalysis};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AlignmentRequest {
    pub resume_data: Resume,
    pub job_data: JobRequirements,
    pub job_data_v2: JobRequirementsV2,
}

#[derive(Debug, Serialize)]
pub struct AlignmentResponse {
    pub alignment_score: AlignmentResult,
}

#[derive(Debug, Deserialize)]
pub struct CvCommentRequest {
    pub resume_data: Resume,
    pub job_data: JobRequirements,
    pub alignment_scores: AlignmentResult,
}

#[derive(Debug, Serialize)]
pub struct CvCommentResponse {
    pub cv_comment: CvReview,
}

/// Two versions of one resume, as compared by preservation and improvement analysis.
#[derive(Debug, Deserialize)]
pub struct ResumePairRequest {
    pub original_resume_data: Resume,
    pub enhanced_resume_data: Resume,
}

#[derive(Debug, Serialize)]
pub struct ContentPreservationResponse {
    pub content_preservation_score: f64,
}

#[derive(Debug, Deserialize)]
pub struct GenerateReportRequest {
    pub alignment_scores: AlignmentResult,
    pub cv_comment: CvReview,
    #[serde(default)]
    pub resume_data: Resume,
    #[serde(default)]
    pub job_data: JobRequirements,
}

/// POST /resume-flow/calculate-alignment-score
pub async fn handle_calculate_alignment_score(
    State(state): State<AppState>,
    Json(req): Json<AlignmentRequest>,
) -> Result<Json<AlignmentResponse>, AppError> {
    let alignment_score =
        score_alignment(&state.llm, &req.resume_data, &req.job_data, &req.job_data_v2).await?;
    Ok(Json(AlignmentResponse { alignment_score }))
}

/// POST /resume-flow/give-cv-comment
pub async fn handle_give_cv_comment(
    State(state): State<AppState>,
    Json(req): Json<CvCommentRequest>,
) -> Result<Json<CvCommentResponse>, AppError> {
    let cv_comment = review_cv(
        &state.llm,
        &req.resume_data,
        &req.job_data,
        &req.alignment_scores,
    )
    .await?;
    Ok(Json(CvCommentResponse { cv_comment }))
}

/// POST /resume-flow/evaluate-cv
///
/// Multipart: `resume_file` (document) and `job_description` (text).
pub async fn handle_evaluate_cv(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Evaluation>, AppError> {
    let mut form = UploadForm::read(multipart).await?;
    let job_text = form
        .text("job_description")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Validation("no input".to_string()))?
        .to_string();
    let document = form.take_file("resume_file")?;

    let workspace = state.workspace().await?;
    let resume_text = state.documents.parse(&document, &workspace).await;
    workspace.close();

    Ok(Json(evaluate(&state.llm, &resume_text?, &job_text).await?))
}

/// POST /resume-flow/calculate-content-preservation
pub async fn handle_content_preservation(
    State(state): State<AppState>,
    Json(req): Json<ResumePairRequest>,
) -> Result<Json<ContentPreservationResponse>, AppError> {
    let content_preservation_score = content_preservation(
        &state.llm,
        &req.original_resume_data,
        &req.enhanced_resume_data,
    )
    .await?;
    Ok(Json(ContentPreservationResponse {
        content_preservation_score,
    }))
}

/// POST /resume-flow/analyze-resume-improvements
pub async fn handle_analyze_improvements(
    State(state): State<AppState>,
    Json(req): Json<ResumePairRequest>,
) -> Json<ImprovementAnalysis> {
    Json(
        analyze_improvements(
            &state.llm,
            &req.original_resume_data,
            &req.enhanced_resume_data,
        )
        .await,
    )
}

/// POST /resume-flow/generate-report
pub async fn handle_generate_report(
    Json(req): Json<GenerateReportRequest>,
) -> Result<Response, AppError> {
    let report = render_report(
        &req.resume_data,
        &req.job_data,
        &req.alignment_scores,
        &req.cv_comment,
        Utc::now(),
    )?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/markdown; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=resume_analysis_report.md",
            ),
        ],
        report,
    )
        .into_response())
}
