pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::evaluation::handlers as evaluation;
use crate::extraction::handlers as extraction;
use crate::state::AppState;
use crate::tailoring::handlers as tailoring;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .nest("/resume-flow", resume_flow_routes())
        .with_state(state)
}

fn resume_flow_routes() -> Router<AppState> {
    Router::new()
        // Extraction
        .route("/extract-cv", post(extraction::handle_extract_cv))
        .route("/extract-job-v1", post(extraction::handle_extract_job_v1))
        .route("/extract-job-v2", post(extraction::handle_extract_job_v2))
        .route("/extract-job", post(extraction::handle_extract_job))
        // Evaluation
        .route(
            "/calculate-alignment-score",
            post(evaluation::handle_calculate_alignment_score),
        )
        .route("/give-cv-comment", post(evaluation::handle_give_cv_comment))
        .route("/evaluate-cv", post(evaluation::handle_evaluate_cv))
        .route(
            "/calculate-content-preservation",
            post(evaluation::handle_content_preservation),
        )
        .route(
            "/analyze-resume-improvements",
            post(evaluation::handle_analyze_improvements),
        )
        .route("/generate-report", post(evaluation::handle_generate_report))
        // Tailoring
        .route(
            "/add-missing-information",
            post(tailoring::handle_add_missing_information),
        )
        .route("/create-resume", post(tailoring::handle_create_resume))
        .route(
            "/create-resume/pdf",
            post(tailoring::handle_create_resume_pdf),
        )
        .route(
            "/add-data-and-create-resume",
            post(tailoring::handle_add_data_and_create_resume),
        )
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::tests::test_config;
    use crate::errors::AppError;
    use crate::extraction::document::LocalDocumentParser;
    use crate::llm_client::testing::ScriptedBackend;
    use crate::llm_client::LlmClient;
    use crate::models::job::JobRequirements;
    use crate::models::resume::TailoredResume;
    use crate::render::ResumeRenderer;
    use crate::tailoring::regenerator::tests::scripted_sections;
    use crate::workspace::RequestWorkspace;

    /// Writes a fixed payload instead of invoking a TeX engine.
    struct StubRenderer;

    #[async_trait]
    impl ResumeRenderer for StubRenderer {
        async fn render(
            &self,
            _resume: &TailoredResume,
            _job: &JobRequirements,
            workspace: &RequestWorkspace,
        ) -> Result<PathBuf, AppError> {
            let path = workspace.file_path("Acme_Engineer_resume.pdf");
            tokio::fs::write(&path, b"%PDF-1.4 stub").await?;
            Ok(path)
        }
    }

    fn app(backend: ScriptedBackend, temp_dir: PathBuf) -> Router {
        let mut config = test_config();
        config.temp_dir = temp_dir;
        build_router(AppState {
            llm: LlmClient::new(Arc::new(backend)),
            config: Arc::new(config),
            documents: Arc::new(LocalDocumentParser),
            renderer: Arc::new(StubRenderer),
        })
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(ScriptedBackend::new(), dir.path().to_path_buf())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["service"], "resume-flow");
    }

    #[tokio::test]
    async fn test_extract_job_returns_both_records() {
        let dir = tempfile::tempdir().unwrap();
        let backend = ScriptedBackend::new()
            .reply(
                "skill groups",
                r#"{"required_skills": [{"group_name": "Backend Development", "requirements": ["3+ years Rust"]}]}"#,
            )
            .reply(
                "company overview",
                r#"{"job_title": "Backend Engineer", "keywords": ["Rust"]}"#,
            );

        let response = app(backend, dir.path().to_path_buf())
            .oneshot(post_json(
                "/resume-flow/extract-job",
                json!({"job_description": "We need a Rust backend engineer."}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["job_data"]["job_title"], "Backend Engineer");
        assert_eq!(
            body["job_data_v2"]["required_skills"][0]["group_name"],
            "Backend Development"
        );
    }

    #[tokio::test]
    async fn test_extract_job_v1_reads_uploaded_job_document() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(ScriptedBackend::new().reply(
            "company overview",
            r#"{"job_title": "Backend Engineer", "keywords": ["Rust"]}"#,
        ));
        let mut config = test_config();
        config.temp_dir = dir.path().to_path_buf();
        let app = build_router(AppState {
            llm: LlmClient::new(backend.clone()),
            config: Arc::new(config),
            documents: Arc::new(LocalDocumentParser),
            renderer: Arc::new(StubRenderer),
        });

        let boundary = "resume-flow-boundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"job_file\"; filename=\"jd.txt\"\r\n\
             Content-Type: text/plain\r\n\r\n\
             Senior Rust engineer at Acme\r\n\
             --{boundary}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/resume-flow/extract-job-v1")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["job_title"], "Backend Engineer");

        let calls = backend.calls_matching("Senior Rust engineer at Acme");
        assert_eq!(calls.len(), 1);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_blank_job_description_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(ScriptedBackend::new(), dir.path().to_path_buf())
            .oneshot(post_json(
                "/resume-flow/extract-job-v1",
                json!({"job_description": "   "}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_generation_failure_is_server_error() {
        let dir = tempfile::tempdir().unwrap();
        let backend = ScriptedBackend::new().fail("company overview", 500, "upstream down");
        let response = app(backend, dir.path().to_path_buf())
            .oneshot(post_json(
                "/resume-flow/extract-job-v1",
                json!({"job_description": "Rust engineer"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_create_resume_pdf_streams_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(scripted_sections(), dir.path().to_path_buf())
            .oneshot(post_json(
                "/resume-flow/create-resume/pdf",
                json!({
                    "resume_data": {"name": "Jane Doe"},
                    "job_data": {"job_title": "Engineer", "company_name": "Acme"}
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/pdf"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Acme_Engineer_resume.pdf\""
        );
        assert_eq!(body_bytes(response).await, b"%PDF-1.4 stub");

        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 0);
    }

    #[tokio::test]
    async fn test_create_resume_returns_tailored_json() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(scripted_sections(), dir.path().to_path_buf())
            .oneshot(post_json(
                "/resume-flow/create-resume",
                json!({
                    "resume_data": {"name": "Jane Doe"},
                    "job_data": {"job_title": "Engineer", "keywords": ["Rust", "Go"]}
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["resume_data"]["name"], "Jane Doe");
        assert_eq!(body["resume_data"]["keywords"], "Rust, Go");
    }
}
