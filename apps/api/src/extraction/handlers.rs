use std::collections::HashMap;

use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::header,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::extraction::document::UploadedDocument;
use crate::extraction::extractor::{
    extract_job_both, extract_job_v1, extract_job_v2, extract_resume, resolve_job_text,
};
use crate::models::job::{JobRequirements, JobRequirementsV2};
use crate::models::resume::Resume;
use crate::state::AppState;

/// Files and text fields of a multipart request, keyed by field name.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub files: HashMap<String, UploadedDocument>,
    pub fields: HashMap<String, String>,
}

impl UploadForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = UploadForm::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let file_name = field.file_name().map(str::to_string);
            match file_name {
                Some(file_name) => {
                    let bytes = field.bytes().await.map_err(|e| {
                        AppError::Validation(format!("could not read upload '{name}': {e}"))
                    })?;
                    form.files.insert(name, UploadedDocument { file_name, bytes });
                }
                None => {
                    let text = field.text().await.map_err(|e| {
                        AppError::Validation(format!("could not read field '{name}': {e}"))
                    })?;
                    form.fields.insert(name, text);
                }
            }
        }
        Ok(form)
    }

    pub fn take_file(&mut self, name: &str) -> Result<UploadedDocument, AppError> {
        self.files
            .remove(name)
            .ok_or_else(|| AppError::Validation(format!("missing file field '{name}'")))
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

#[derive(Debug, Deserialize)]
pub struct JobDescriptionRequest {
    #[serde(default)]
    pub job_description: Option<String>,
}

impl JobDescriptionRequest {
    fn text(&self) -> Result<&str, AppError> {
        self.job_description
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Validation("no input".to_string()))
    }
}

#[derive(Debug, Serialize)]
pub struct ExtractCvResponse {
    pub resume_data: Resume,
}

#[derive(Debug, Serialize)]
pub struct ExtractJobResponse {
    pub job_data: JobRequirements,
    pub job_data_v2: JobRequirementsV2,
}

/// POST /resume-flow/extract-cv
pub async fn handle_extract_cv(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ExtractCvResponse>, AppError> {
    let mut form = UploadForm::read(multipart).await?;
    let document = form.take_file("file")?;

    let workspace = state.workspace().await?;
    let text = state.documents.parse(&document, &workspace).await;
    workspace.close();

    let resume_data = extract_resume(&state.llm, &text?).await?;
    Ok(Json(ExtractCvResponse { resume_data }))
}

/// Job text from either a JSON body (`job_description`) or a multipart form
/// carrying a `job_description` field and/or a `job_file` document.
async fn job_text(state: &AppState, request: Request) -> Result<String, AppError> {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));

    if !is_multipart {
        let Json(req) = Json::<JobDescriptionRequest>::from_request(request, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        return req.text().map(str::to_string);
    }

    let multipart = Multipart::from_request(request, state)
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?;
    let mut form = UploadForm::read(multipart).await?;
    let document = form.files.remove("job_file");

    let workspace = state.workspace().await?;
    let text = resolve_job_text(
        form.text("job_description"),
        document.as_ref(),
        state.documents.as_ref(),
        &workspace,
    )
    .await;
    workspace.close();
    text
}

/// POST /resume-flow/extract-job-v1
pub async fn handle_extract_job_v1(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<JobRequirements>, AppError> {
    let text = job_text(&state, request).await?;
    Ok(Json(extract_job_v1(&state.llm, &text).await?))
}

/// POST /resume-flow/extract-job-v2
pub async fn handle_extract_job_v2(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<JobRequirementsV2>, AppError> {
    let text = job_text(&state, request).await?;
    Ok(Json(extract_job_v2(&state.llm, &text).await?))
}

/// POST /resume-flow/extract-job
pub async fn handle_extract_job(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<ExtractJobResponse>, AppError> {
    let text = job_text(&state, request).await?;
    let (job_data, job_data_v2) = extract_job_both(&state.llm, &text).await?;
    Ok(Json(ExtractJobResponse {
        job_data,
        job_data_v2,
    }))
}
