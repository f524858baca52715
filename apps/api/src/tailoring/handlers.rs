use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::job::JobRequirements;
use crate::models::resume::{Resume, TailoredResume};
use crate::models::review::MissingInfoItem;
use crate::state::AppState;
use crate::tailoring::merger::merge_missing_info;
use crate::tailoring::regenerator::{merge_and_regenerate, regenerate_resume, MergedTailoring};

#[derive(Debug, Deserialize)]
pub struct AddMissingInformationRequest {
    pub resume_data: Resume,
    #[serde(default)]
    pub missing_information: Vec<MissingInfoItem>,
}

#[derive(Debug, Serialize)]
pub struct AddMissingInformationResponse {
    pub updated_resume_data: Resume,
}

#[derive(Debug, Deserialize)]
pub struct CreateResumeRequest {
    pub resume_data: Resume,
    pub job_data: JobRequirements,
}

#[derive(Debug, Serialize)]
pub struct CreateResumeResponse {
    pub resume_data: TailoredResume,
}

#[derive(Debug, Deserialize)]
pub struct AddDataAndCreateRequest {
    pub resume_data: Resume,
    #[serde(default)]
    pub missing_information: Vec<MissingInfoItem>,
    pub job_data: JobRequirements,
}

/// POST /resume-flow/add-missing-information
pub async fn handle_add_missing_information(
    State(state): State<AppState>,
    Json(req): Json<AddMissingInformationRequest>,
) -> Result<Json<AddMissingInformationResponse>, AppError> {
    let updated_resume_data =
        merge_missing_info(&state.llm, &req.resume_data, &req.missing_information).await?;
    Ok(Json(AddMissingInformationResponse {
        updated_resume_data,
    }))
}

/// POST /resume-flow/create-resume
pub async fn handle_create_resume(
    State(state): State<AppState>,
    Json(req): Json<CreateResumeRequest>,
) -> Result<Json<CreateResumeResponse>, AppError> {
    let resume_data = regenerate_resume(&state.llm, &req.resume_data, &req.job_data).await?;
    Ok(Json(CreateResumeResponse { resume_data }))
}

/// POST /resume-flow/create-resume/pdf
///
/// Regenerates, renders, and streams the PDF. The workspace holding the
/// `.tex`, `.json` and `.pdf` artifacts is removed before responding.
pub async fn handle_create_resume_pdf(
    State(state): State<AppState>,
    Json(req): Json<CreateResumeRequest>,
) -> Result<Response, AppError> {
    let tailored = regenerate_resume(&state.llm, &req.resume_data, &req.job_data).await?;

    let workspace = state.workspace().await?;
    let rendered = async {
        let path = state.renderer.render(&tailored, &req.job_data, &workspace).await?;
        let bytes = tokio::fs::read(&path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "resume.pdf".to_string());
        Ok::<_, AppError>((file_name, bytes))
    }
    .await;
    workspace.close();
    let (file_name, bytes) = rendered?;

    info!(file = %file_name, bytes = bytes.len(), "streaming rendered resume");
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// POST /resume-flow/add-data-and-create-resume
pub async fn handle_add_data_and_create_resume(
    State(state): State<AppState>,
    Json(req): Json<AddDataAndCreateRequest>,
) -> Result<Json<MergedTailoring>, AppError> {
    let result = merge_and_regenerate(
        &state.llm,
        &req.resume_data,
        &req.missing_information,
        &req.job_data,
    )
    .await?;
    Ok(Json(result))
}
