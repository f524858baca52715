//! Content preservation: embedding similarity between two versions of a resume.

use tracing::info;

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::models::present;
use crate::models::resume::Resume;

const STAGE: &str = "content_preservation";

/// Labelled plain text of every populated field, in a fixed section order.
pub fn flatten_resume(resume: &Resume) -> String {
    let mut parts: Vec<String> = Vec::new();
    push_labelled(&mut parts, "Name", &resume.name);
    push_labelled(&mut parts, "Title", &resume.title);
    push_labelled(&mut parts, "Summary", &resume.summary);
    push_labelled(&mut parts, "Email", &resume.email);
    push_labelled(&mut parts, "Phone", &resume.phone);
    push_labelled(&mut parts, "Location", &resume.location);
    push_labelled(&mut parts, "LinkedIn", &resume.media.linkedin);
    push_labelled(&mut parts, "GitHub", &resume.media.github);
    push_labelled(&mut parts, "Medium", &resume.media.medium);
    push_labelled(&mut parts, "Devpost", &resume.media.devpost);

    if !resume.work_experience.is_empty() {
        parts.push("Work Experience:".to_string());
        for exp in &resume.work_experience {
            push_labelled(&mut parts, "Role", &exp.role);
            push_labelled(&mut parts, "Company", &exp.company);
            push_labelled(&mut parts, "Location", &exp.location);
            push_labelled(&mut parts, "From", &exp.from_date);
            push_labelled(&mut parts, "To", &exp.to_date);
            parts.extend(present(&exp.description).map(str::to_string));
        }
    }

    if !resume.education.is_empty() {
        parts.push("Education:".to_string());
        for edu in &resume.education {
            push_labelled(&mut parts, "Degree", &edu.degree);
            push_labelled(&mut parts, "University", &edu.university);
            push_labelled(&mut parts, "From", &edu.from_date);
            push_labelled(&mut parts, "To", &edu.to_date);
            parts.extend(present(&edu.courses).map(|c| format!("Course: {c}")));
        }
    }

    if !resume.skill_section.is_empty() {
        parts.push("Skills:".to_string());
        for section in &resume.skill_section {
            push_labelled(&mut parts, "Skill Group", &section.name);
            parts.extend(present(&section.skills).map(|s| format!("Skill: {s}")));
        }
    }

    if !resume.projects.is_empty() {
        parts.push("Projects:".to_string());
        for project in &resume.projects {
            push_labelled(&mut parts, "Project", &project.name);
            push_labelled(&mut parts, "Type", &project.project_type);
            push_labelled(&mut parts, "Link", &project.link);
            push_labelled(&mut parts, "From", &project.from_date);
            push_labelled(&mut parts, "To", &project.to_date);
            parts.extend(present(&project.description).map(str::to_string));
            for resource in &project.resources {
                push_labelled(&mut parts, "Resource", &resource.name);
                push_labelled(&mut parts, "Resource Link", &resource.link);
            }
        }
    }

    if !resume.certifications.is_empty() {
        parts.push("Certifications:".to_string());
        for cert in &resume.certifications {
            push_labelled(&mut parts, "Certification", &cert.name);
            push_labelled(&mut parts, "Issued by", &cert.by);
            push_labelled(&mut parts, "Link", &cert.link);
        }
    }

    if !resume.achievements.is_empty() {
        parts.push("Achievements:".to_string());
        parts.extend(present(&resume.achievements).map(str::to_string));
    }

    parts.join(" ")
}

fn push_labelled(parts: &mut Vec<String>, label: &str, value: &Option<String>) {
    if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        parts.push(format!("{label}: {value}"));
    }
}

/// Text as sent to the embedding model: ASCII only, LaTeX specials blanked,
/// whitespace collapsed.
pub fn normalize_for_embedding(text: &str) -> String {
    text.chars()
        .filter(char::is_ascii)
        .map(|c| match c {
            '\\' | '{' | '}' | '$' | '&' | '#' | '^' | '_' | '~' | '%' => ' ',
            other => other,
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Cosine similarity clamped to [-1, 1]. Zero-norm vectors give 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}

/// How much of `original`'s content survives in `revised`, in [0, 1] to 4 decimals.
pub async fn content_preservation(
    llm: &LlmClient,
    original: &Resume,
    revised: &Resume,
) -> Result<f64, AppError> {
    let original_text = normalize_for_embedding(&flatten_resume(original));
    let revised_text = normalize_for_embedding(&flatten_resume(revised));
    if original_text.is_empty() || revised_text.is_empty() {
        return Err(AppError::Validation(
            "resume has no text content to compare".to_string(),
        ));
    }

    let embed = |text: String| async move {
        llm.embed(&text)
            .await
            .map_err(|source| AppError::Generation { stage: STAGE, source })
    };
    let (a, b) = tokio::try_join!(embed(original_text), embed(revised_text))?;

    if a.len() != b.len() {
        return Err(AppError::Internal(anyhow::anyhow!(
            "embedding dimensions differ: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    let score = (cosine_similarity(&a, &b).clamp(0.0, 1.0) * 10_000.0).round() / 10_000.0;
    info!(score, dimensions = a.len(), "content preservation computed");
    Ok(score)
}
