use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use crate::errors::AppError;
use crate::models::alignment::AlignmentResult;
use crate::models::job::JobRequirements;
use crate::models::present;
use crate::models::resume::Resume;
use crate::models::review::CvReview;

const UNKNOWN_CANDIDATE: &str = "Unknown Candidate";
const UNKNOWN_POSITION: &str = "Unknown Position";
const UNKNOWN_COMPANY: &str = "Unknown Company";

fn or_unknown<'a>(value: &'a Option<String>, unknown: &'a str) -> &'a str {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(unknown)
}

/// Markdown evaluation report for one candidate and job.
pub fn render_report(
    resume: &Resume,
    job: &JobRequirements,
    alignment: &AlignmentResult,
    review: &CvReview,
    generated_at: DateTime<Utc>,
) -> Result<String, AppError> {
    if alignment.is_empty() {
        return Err(AppError::Validation("alignment scores are required".to_string()));
    }
    if *review == CvReview::default() {
        return Err(AppError::Validation("cv comment is required".to_string()));
    }

    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, resume, job, alignment, review, generated_at);
    Ok(out)
}

fn write_report(
    out: &mut String,
    resume: &Resume,
    job: &JobRequirements,
    alignment: &AlignmentResult,
    review: &CvReview,
    generated_at: DateTime<Utc>,
) -> std::fmt::Result {
    writeln!(out, "# CV Evaluation Report\n")?;
    writeln!(out, "- **Candidate:** {}", or_unknown(&resume.name, UNKNOWN_CANDIDATE))?;
    writeln!(out, "- **Position:** {}", or_unknown(&job.job_title, UNKNOWN_POSITION))?;
    writeln!(out, "- **Company:** {}", or_unknown(&job.company_name, UNKNOWN_COMPANY))?;
    writeln!(
        out,
        "- **Generated:** {}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;

    writeln!(out, "## Alignment Scores\n")?;
    for (group_name, scores) in alignment.groups() {
        writeln!(out, "### {group_name}\n")?;
        if !scores.satisfied_requirements.is_empty() {
            writeln!(
                out,
                "**Satisfied Requirements ({}):**\n",
                scores.satisfied_requirements.len()
            )?;
            for requirement in &scores.satisfied_requirements {
                writeln!(out, "- {requirement}")?;
            }
            writeln!(out)?;
        }
        if !scores.unsatisfied_requirements.is_empty() {
            writeln!(
                out,
                "**Missing Requirements ({}):**\n",
                scores.unsatisfied_requirements.len()
            )?;
            for requirement in &scores.unsatisfied_requirements {
                writeln!(out, "- {requirement}")?;
            }
            writeln!(out)?;
        }
    }

    writeln!(out, "## CV Evaluation Comments\n")?;
    for (heading, items) in [
        ("Advantages", &review.advantages),
        ("Disadvantages", &review.disadvantages),
    ] {
        let items: Vec<&str> = present(items).collect();
        if items.is_empty() {
            continue;
        }
        writeln!(out, "### {heading}\n")?;
        for item in items {
            writeln!(out, "- {item}")?;
        }
        writeln!(out)?;
    }

    if !review.missing_information.is_empty() {
        writeln!(out, "### Missing Information\n")?;
        for item in &review.missing_information {
            let suggestion = item.suggestion.trim().replace('\n', "\n  ");
            writeln!(out, "- **{}:** {}", item.field.trim(), suggestion)?;
        }
    }
    Ok(())
}
