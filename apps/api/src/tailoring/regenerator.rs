//! Section Regenerator: rewrites the six resume sections for one job concurrently,
//! then assembles them with the source's personal info and the job's keyword string.
//!
//! The join is fail-fast: one failed section fails the whole regeneration.

use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::prompts::{schema_section, to_prompt_json};
use crate::llm_client::{LlmClient, Tier};
use crate::models::job::JobRequirements;
use crate::models::resume::{
    Achievements, Certifications, Educations, Experiences, Project, Projects, Resume,
    SkillSections, TailoredResume, WorkExperience,
};
use crate::models::review::MissingInfoItem;
use crate::models::Schema;
use crate::tailoring::achievements::retain_recognitions;
use crate::tailoring::merger::merge_missing_info;
use crate::tailoring::prompts::{
    section_template, ACHIEVEMENTS_PROMPT_TEMPLATE, CERTIFICATIONS_PROMPT_TEMPLATE,
    EDUCATION_PROMPT_TEMPLATE, EXPERIENCE_PROMPT_TEMPLATE, PROJECTS_PROMPT_TEMPLATE,
    SKILLS_PROMPT_TEMPLATE,
};

pub const MAX_BULLETS: usize = 3;

const STAGE_EXPERIENCE: &str = "regenerate:work_experience";
const STAGE_SKILLS: &str = "regenerate:skill_section";
const STAGE_PROJECTS: &str = "regenerate:projects";
const STAGE_EDUCATION: &str = "regenerate:education";
const STAGE_CERTIFICATIONS: &str = "regenerate:certifications";
const STAGE_ACHIEVEMENTS: &str = "regenerate:achievements";

/// Achievement input: awards are often buried in project or job bullets.
#[derive(Debug, Serialize)]
struct AchievementSources<'a> {
    projects: &'a [Project],
    work_experience: &'a [WorkExperience],
    achievements: &'a [Option<String>],
}

async fn regenerate_section<T: Schema>(
    llm: &LlmClient,
    template: &str,
    section_data: String,
    job_json: &str,
    stage: &'static str,
) -> Result<T, AppError> {
    let prompt = section_template(template)
        .replace("{format_instructions}", &schema_section::<T>())
        .replace("{job_description}", job_json)
        .replace("{section_data}", &section_data);
    llm.generate_record(&prompt, Tier::Primary, stage).await
}

fn cap_bullets(description: &mut Vec<Option<String>>, entry: Option<&str>) {
    if description.len() > MAX_BULLETS {
        warn!(
            entry = entry.unwrap_or("<unnamed>"),
            bullets = description.len(),
            "trimming description to {MAX_BULLETS} bullets"
        );
        description.truncate(MAX_BULLETS);
    }
}

pub async fn regenerate_resume(
    llm: &LlmClient,
    resume: &Resume,
    job: &JobRequirements,
) -> Result<TailoredResume, AppError> {
    let job_json = to_prompt_json(job)?;
    let experience_data = to_prompt_json(&resume.work_experience)?;
    let skills_data = to_prompt_json(&resume.skill_section)?;
    let projects_data = to_prompt_json(&resume.projects)?;
    let education_data = to_prompt_json(&resume.education)?;
    let certifications_data = to_prompt_json(&resume.certifications)?;
    let achievements_data = to_prompt_json(&AchievementSources {
        projects: &resume.projects,
        work_experience: &resume.work_experience,
        achievements: &resume.achievements,
    })?;

    info!(
        experiences = resume.work_experience.len(),
        projects = resume.projects.len(),
        "regenerating resume sections"
    );

    let (experiences, skills, projects, education, certifications, achievements) = tokio::try_join!(
        regenerate_section::<Experiences>(
            llm,
            EXPERIENCE_PROMPT_TEMPLATE,
            experience_data,
            &job_json,
            STAGE_EXPERIENCE,
        ),
        regenerate_section::<SkillSections>(
            llm,
            SKILLS_PROMPT_TEMPLATE,
            skills_data,
            &job_json,
            STAGE_SKILLS,
        ),
        regenerate_section::<Projects>(
            llm,
            PROJECTS_PROMPT_TEMPLATE,
            projects_data,
            &job_json,
            STAGE_PROJECTS,
        ),
        regenerate_section::<Educations>(
            llm,
            EDUCATION_PROMPT_TEMPLATE,
            education_data,
            &job_json,
            STAGE_EDUCATION,
        ),
        regenerate_section::<Certifications>(
            llm,
            CERTIFICATIONS_PROMPT_TEMPLATE,
            certifications_data,
            &job_json,
            STAGE_CERTIFICATIONS,
        ),
        regenerate_section::<Achievements>(
            llm,
            ACHIEVEMENTS_PROMPT_TEMPLATE,
            achievements_data,
            &job_json,
            STAGE_ACHIEVEMENTS,
        ),
    )?;

    let mut work_experience = experiences.work_experience;
    for exp in &mut work_experience {
        cap_bullets(&mut exp.description, exp.role.as_deref());
    }

    let mut projects = projects.projects;
    for project in &mut projects {
        cap_bullets(&mut project.description, project.name.as_deref());
    }

    let mut skill_section = skills.skill_section;
    let before = skill_section.len();
    skill_section.retain(|group| !group.is_empty());
    if skill_section.len() < before {
        info!(dropped = before - skill_section.len(), "dropped empty skill groups");
    }

    let tailored = TailoredResume {
        resume: Resume {
            name: resume.name.clone(),
            summary: resume.summary.clone(),
            phone: resume.phone.clone(),
            email: resume.email.clone(),
            title: resume.title.clone(),
            location: resume.location.clone(),
            media: resume.media.clone(),
            work_experience,
            education: education.education,
            skill_section,
            projects,
            certifications: certifications.certifications,
            achievements: retain_recognitions(achievements.achievements),
        },
        keywords: job.keyword_string(),
    };

    info!(
        experiences = tailored.resume.work_experience.len(),
        skill_groups = tailored.resume.skill_section.len(),
        projects = tailored.resume.projects.len(),
        achievements = tailored.resume.achievements.len(),
        "resume regenerated"
    );
    Ok(tailored)
}

#[derive(Debug, Clone, Serialize)]
pub struct MergedTailoring {
    pub new_resume_data: Resume,
    pub resume_data: TailoredResume,
}

/// Merge the candidate's answers, then regenerate from the merged resume.
pub async fn merge_and_regenerate(
    llm: &LlmClient,
    resume: &Resume,
    items: &[MissingInfoItem],
    job: &JobRequirements,
) -> Result<MergedTailoring, AppError> {
    let new_resume_data = merge_missing_info(llm, resume, items).await?;
    let resume_data = regenerate_resume(llm, &new_resume_data, job).await?;
    Ok(MergedTailoring {
        new_resume_data,
        resume_data,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::llm_client::testing::ScriptedBackend;
    use crate::models::resume::{Media, SkillSection};

    pub(crate) const EXPERIENCE_REPLY: &str = r#"{"work_experience": [{
        "role": "Backend Engineer", "company": "Acme", "from_date": "Jan 2021", "to_date": "Present",
        "description": ["Built A by doing B, achieved C", "Built D", "Built E", "Built F"]
    }]}"#;
    pub(crate) const SKILLS_REPLY: &str = r#"{"skill_section": [
        {"name": "Languages", "skills": ["Rust", "Go"]},
        {"name": "Soft Skills", "skills": []},
        {"name": "Misc", "skills": [null, " "]}
    ]}"#;
    pub(crate) const PROJECTS_REPLY: &str = r#"{"projects": [{"name": "Ledger", "type": "Personal", "description": ["Won first prize in X", "Improved accuracy by 10%"]}]}"#;
    pub(crate) const EDUCATION_REPLY: &str = r#"{"education": [{"degree": "BSc Computer Science", "university": "UIT"}]}"#;
    pub(crate) const CERTIFICATIONS_REPLY: &str = r#"{"certifications": []}"#;
    pub(crate) const ACHIEVEMENTS_REPLY: &str = r#"{"achievements": ["Won first prize in X", "Improved accuracy by 10%"]}"#;

    pub(crate) fn scripted_sections() -> ScriptedBackend {
        ScriptedBackend::new()
            .reply("<work_experience>", EXPERIENCE_REPLY)
            .reply("<SKILL_SECTION>", SKILLS_REPLY)
            .reply("<PROJECTS>", PROJECTS_REPLY)
            .reply("<Education>", EDUCATION_REPLY)
            .reply("<CERTIFICATIONS>", CERTIFICATIONS_REPLY)
            .reply("<combined_data>", ACHIEVEMENTS_REPLY)
    }

    fn source_resume() -> Resume {
        Resume {
            name: Some("Jane Doe".to_string()),
            email: Some("jane@example.com".to_string()),
            title: Some("Software Engineer".to_string()),
            summary: Some("Systems engineer.".to_string()),
            media: Media {
                github: Some("github.com/jane".to_string()),
                ..Media::default()
            },
            projects: vec![Project {
                name: Some("Ledger".to_string()),
                description: vec![
                    Some("Won first prize in X".to_string()),
                    Some("Improved accuracy by 10%".to_string()),
                ],
                ..Project::default()
            }],
            skill_section: vec![SkillSection {
                name: Some("Languages".to_string()),
                skills: vec![Some("Rust".to_string())],
            }],
            ..Resume::default()
        }
    }

    fn job(keywords: &[&str]) -> JobRequirements {
        JobRequirements {
            job_title: Some("Backend Engineer".to_string()),
            keywords: keywords.iter().map(|k| Some(k.to_string())).collect(),
            ..JobRequirements::default()
        }
    }

    #[tokio::test]
    async fn test_regeneration_assembles_all_sections() {
        let backend = Arc::new(scripted_sections());
        let llm = LlmClient::new(backend.clone());
        let source = source_resume();

        let tailored = regenerate_resume(&llm, &source, &job(&["Rust", "PostgreSQL"]))
            .await
            .unwrap();

        assert_eq!(backend.call_count(), 6);
        assert!(backend.calls().iter().all(|c| c.tier == Tier::Primary));
        assert_eq!(tailored.keywords, "Rust, PostgreSQL");

        let out = &tailored.resume;
        assert!(out.same_personal_info(&source));
        assert_eq!(out.summary, source.summary);
        assert_eq!(out.work_experience[0].description.len(), MAX_BULLETS);
        assert_eq!(out.education.len(), 1);
        assert!(out.certifications.is_empty());

        let groups: Vec<_> = out.skill_section.iter().map(|g| g.name.as_deref()).collect();
        assert_eq!(groups, vec![Some("Languages")]);

        let json = serde_json::to_value(&tailored).unwrap();
        for key in [
            "work_experience",
            "skill_section",
            "projects",
            "education",
            "certifications",
            "achievements",
        ] {
            assert!(json[key].is_array(), "{key} should be a list");
        }
        assert_eq!(json["keywords"], "Rust, PostgreSQL");
    }

    #[tokio::test]
    async fn test_no_job_keywords_gives_empty_keyword_string() {
        let llm = LlmClient::new(Arc::new(scripted_sections()));
        let tailored = regenerate_resume(&llm, &source_resume(), &job(&[]))
            .await
            .unwrap();
        assert_eq!(tailored.keywords, "");
    }

    #[tokio::test]
    async fn test_award_in_project_becomes_achievement_but_metric_does_not() {
        let backend = Arc::new(scripted_sections());
        let llm = LlmClient::new(backend.clone());

        let tailored = regenerate_resume(&llm, &source_resume(), &job(&["Rust"]))
            .await
            .unwrap();

        let achievement_calls = backend.calls_matching("<combined_data>");
        assert_eq!(achievement_calls.len(), 1);
        let prompt = &achievement_calls[0].prompt;
        assert!(prompt.contains("Won first prize in X"));
        assert!(prompt.contains("\"work_experience\": []"));

        assert_eq!(
            tailored.resume.achievements,
            vec![Some("Won first prize in X".to_string())]
        );
    }

    #[tokio::test]
    async fn test_one_failed_section_fails_the_whole_resume() {
        let backend = ScriptedBackend::new()
            .fail("<PROJECTS>", 500, "deployment overloaded")
            .reply("<work_experience>", EXPERIENCE_REPLY)
            .reply("<SKILL_SECTION>", SKILLS_REPLY)
            .reply("<Education>", EDUCATION_REPLY)
            .reply("<CERTIFICATIONS>", CERTIFICATIONS_REPLY)
            .reply("<combined_data>", ACHIEVEMENTS_REPLY);
        let llm = LlmClient::new(Arc::new(backend));

        let err = regenerate_resume(&llm, &source_resume(), &job(&["Rust"]))
            .await
            .unwrap_err();
        assert_eq!(err.stage(), Some(STAGE_PROJECTS));
    }

    #[tokio::test]
    async fn test_undecodable_section_fails_the_whole_resume() {
        let backend = ScriptedBackend::new()
            .reply("<combined_data>", "No awards found.")
            .reply("<work_experience>", EXPERIENCE_REPLY)
            .reply("<SKILL_SECTION>", SKILLS_REPLY)
            .reply("<PROJECTS>", PROJECTS_REPLY)
            .reply("<Education>", EDUCATION_REPLY)
            .reply("<CERTIFICATIONS>", CERTIFICATIONS_REPLY);
        let llm = LlmClient::new(Arc::new(backend));

        let err = regenerate_resume(&llm, &source_resume(), &job(&["Rust"]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Extraction {
                stage: STAGE_ACHIEVEMENTS,
                ..
            }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sections_are_requested_concurrently() {
        let delay = Duration::from_millis(400);
        let backend = ScriptedBackend::new()
            .slow_reply("<work_experience>", EXPERIENCE_REPLY, delay)
            .slow_reply("<SKILL_SECTION>", SKILLS_REPLY, delay)
            .slow_reply("<PROJECTS>", PROJECTS_REPLY, delay)
            .slow_reply("<Education>", EDUCATION_REPLY, delay)
            .slow_reply("<CERTIFICATIONS>", CERTIFICATIONS_REPLY, delay)
            .slow_reply("<combined_data>", ACHIEVEMENTS_REPLY, delay);
        let llm = LlmClient::new(Arc::new(backend));

        let started = tokio::time::Instant::now();
        regenerate_resume(&llm, &source_resume(), &job(&["Rust"]))
            .await
            .unwrap();
        assert!(started.elapsed() < delay * 2);
    }

    #[tokio::test]
    async fn test_merge_then_regenerate_uses_merged_resume() {
        let merged = r#"{"name": "Jane Doe", "email": "jane@example.com", "title": "Software Engineer",
            "certifications": [{"name": "AWS Certified Solutions Architect", "by": "Amazon"}]}"#;
        let backend = Arc::new(scripted_sections().reply("<missing_information>", merged));
        let llm = LlmClient::new(backend.clone());
        let items = vec![MissingInfoItem {
            field: "Cloud".to_string(),
            suggestion: "Add AWS certifications".to_string(),
            data: "AWS Certified Solutions Architect".to_string(),
        }];

        let result = merge_and_regenerate(&llm, &source_resume(), &items, &job(&["AWS"]))
            .await
            .unwrap();

        assert_eq!(result.new_resume_data.certifications.len(), 1);
        assert_eq!(result.resume_data.keywords, "AWS");
        let cert_call = &backend.calls_matching("<CERTIFICATIONS>")[0];
        assert!(cert_call.prompt.contains("AWS Certified Solutions Architect"));
    }
}
