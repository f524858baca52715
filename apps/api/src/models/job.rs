use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::{present, Schema};

/// Flat job description record (v1).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct JobRequirements {
    /// The specific role, its level, and scope within the organization.
    pub job_title: Option<String>,
    /// A high-level overview of the role and why it exists in the organization.
    pub job_purpose: Option<String>,
    /// Key expertise, skills, and requirements the job demands.
    pub keywords: Vec<Option<String>>,
    /// Focus on essential functions, their frequency and importance, level of
    /// decision-making, areas of accountability, and any supervisory responsibilities.
    pub job_duties_and_responsibilities: Vec<Option<String>>,
    /// Including education, minimum experience, specific knowledge, skills, abilities, and
    /// any required licenses or certifications.
    pub required_qualifications: Vec<Option<String>>,
    /// Additional 'nice-to-have' qualifications that could set a candidate apart.
    pub preferred_qualifications: Vec<Option<String>>,
    /// The name of the hiring organization.
    pub company_name: Option<String>,
    /// Overview, mission, values, or way of working that could be relevant for tailoring
    /// a resume or cover letter.
    pub company_details: Option<String>,
}

impl Schema for JobRequirements {
    const NAME: &'static str = "JobRequirements";
}

impl JobRequirements {
    /// The job's keywords joined with ", ". Empty when the job lists none.
    pub fn keyword_string(&self) -> String {
        present(&self.keywords).collect::<Vec<_>>().join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SkillGroup {
    /// The name of the skill group, e.g., 'Frontend Development', 'Data Science',
    /// 'Cloud & DevOps'.
    pub group_name: String,
    /// A list of specific skills or competencies required within the skill group, e.g.,
    /// ['Minimum 3 years of software engineering experience building web frontend',
    /// 'Good understanding of web frontend architecture.',...] for Frontend Development.
    #[serde(default)]
    pub requirements: Vec<Option<String>>,
}

impl SkillGroup {
    /// Requirement strings, as written, with nulls and blanks removed.
    pub fn listed_requirements(&self) -> Vec<String> {
        self.requirements
            .iter()
            .flatten()
            .filter(|r| !r.trim().is_empty())
            .cloned()
            .collect()
    }
}

/// Job requirements clustered into named skill groups (v2).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct JobRequirementsV2 {
    /// Groups of related requirements. Each group_name is unique within the list.
    pub required_skills: Vec<SkillGroup>,
}

impl Schema for JobRequirementsV2 {
    const NAME: &'static str = "JobRequirementsV2";

    fn validate(&self) -> Result<(), String> {
        match self
            .required_skills
            .iter()
            .position(|group| group.group_name.trim().is_empty())
        {
            Some(index) => Err(format!("required_skills[{index}].group_name is blank")),
            None => Ok(()),
        }
    }
}
