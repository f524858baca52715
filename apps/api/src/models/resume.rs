use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::{present, Schema};

/// Links to professional social media profiles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Media {
    /// LinkedIn profile URL
    pub linkedin: Option<String>,
    /// GitHub profile URL
    pub github: Option<String>,
    /// Medium profile URL
    pub medium: Option<String>,
    /// Devpost profile URL
    pub devpost: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct WorkExperience {
    /// The job title or position held. e.g. Software Engineer, Machine Learning Engineer.
    pub role: Option<String>,
    /// The name of the company or organization.
    pub company: Option<String>,
    /// The location of the company or organization. e.g. San Francisco, USA.
    pub location: Option<String>,
    /// The start date of the employment period. e.g., Aug 2023
    pub from_date: Option<String>,
    /// The end date of the employment period. e.g., Nov 2025
    pub to_date: Option<String>,
    /// A list of 3 bullet points describing the work experience, tailored to match job
    /// requirements. Each bullet point should follow the 'Did X by doing Y, achieved Z'
    /// format, quantify impact, implicitly use STAR methodology, use strong action verbs,
    /// and be highly relevant to the specific job. Ensure clarity, active voice, and
    /// impeccable grammar.
    pub description: Vec<Option<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Education {
    /// The degree or qualification obtained and the major or field of study.
    /// e.g., Bachelor of Science in Computer Science.
    pub degree: Option<String>,
    /// The name of the institution where the degree was obtained with location.
    /// e.g. Arizona State University, Tempe, USA
    pub university: Option<String>,
    /// The start date of the education period. e.g., Aug 2023
    pub from_date: Option<String>,
    /// The end date of the education period. e.g., May 2025
    pub to_date: Option<String>,
    /// Relevant courses or subjects studied during the education period.
    /// e.g. [Data Structures, Algorithms, Machine Learning]
    pub courses: Vec<Option<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Link {
    /// The name or title of the link.
    pub name: Option<String>,
    /// The URL of the link.
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Project {
    /// The name or title of the project.
    pub name: Option<String>,
    /// The type or category of the project, such as hackathon, publication, professional,
    /// and academic.
    #[serde(rename = "type")]
    pub project_type: Option<String>,
    /// A link to the project repository or demo.
    pub link: Option<String>,
    /// Additional resources related to the project, such as documentation, slides, or videos.
    pub resources: Vec<Link>,
    /// The start date of the project. e.g. Aug 2023
    pub from_date: Option<String>,
    /// The end date of the project. e.g. Nov 2023
    pub to_date: Option<String>,
    /// A list of 3 bullet points describing the project experience, tailored to match job
    /// requirements. Each bullet point should follow the 'Did X by doing Y, achieved Z'
    /// format, quantify impact, implicitly use STAR methodology, use strong action verbs,
    /// and be highly relevant to the specific job. Ensure clarity, active voice, and
    /// impeccable grammar.
    pub description: Vec<Option<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Certification {
    /// The name of the certification.
    pub name: Option<String>,
    /// The organization or institution that issued the certification.
    pub by: Option<String>,
    /// A link to verify the certification.
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SkillSection {
    /// Name or title of the skill group and competencies relevant to the job, such as
    /// programming languages, data science, tools & technologies, cloud & DevOps,
    /// full stack, or soft skills.
    pub name: Option<String>,
    /// Specific skills or competencies within the skill group, such as Python,
    /// JavaScript, C#, SQL in programming languages.
    pub skills: Vec<Option<String>>,
}

impl SkillSection {
    /// A group with no named skills carries no information.
    pub fn is_empty(&self) -> bool {
        present(&self.skills).next().is_none()
    }
}

/// A candidate's resume. Every list defaults to `[]` and is never omitted on output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Resume {
    /// The full name of the candidate.
    pub name: Option<String>,
    /// A brief summary or objective statement highlighting key skills, experience, and
    /// career goals.
    pub summary: Option<String>,
    /// The contact phone number of the candidate.
    pub phone: Option<String>,
    /// The contact email address of the candidate.
    pub email: Option<String>,
    /// The professional title or headline of the candidate, e.g., Software Engineer,
    /// Data Scientist.
    pub title: Option<String>,
    /// The current location of the candidate, e.g., City
    pub location: Option<String>,
    /// Links to professional social media profiles, such as LinkedIn, GitHub, or personal
    /// website.
    pub media: Media,
    /// Work experiences, including job title, company, location, dates, and description.
    pub work_experience: Vec<WorkExperience>,
    /// Educational qualifications, including degree, institution, dates, and relevant courses.
    pub education: Vec<Education>,
    /// Skill sections, each containing a group of skills and competencies relevant to the job.
    pub skill_section: Vec<SkillSection>,
    /// Project experiences, including project name, type, link, resources, dates, and
    /// description.
    pub projects: Vec<Project>,
    /// Job relevant certifications that you have earned, including the name, issuing
    /// organization, and a link to verify the certification.
    pub certifications: Vec<Certification>,
    /// Job relevant key accomplishments, awards, or recognitions that demonstrate your
    /// skills and abilities.
    pub achievements: Vec<Option<String>>,
}

impl Schema for Resume {
    const NAME: &'static str = "Resume";
}

impl Resume {
    /// True when the personal-info block (identity, contacts, media) matches `other`.
    pub fn same_personal_info(&self, other: &Resume) -> bool {
        self.name == other.name
            && self.email == other.email
            && self.phone == other.phone
            && self.title == other.title
            && self.location == other.location
            && self.media == other.media
    }
}

// Per-section payloads decoded by the section regenerator.

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Experiences {
    /// Work experiences, including job title, company, location, dates, and description.
    pub work_experience: Vec<WorkExperience>,
}

impl Schema for Experiences {
    const NAME: &'static str = "Experiences";
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Educations {
    /// Educational qualifications, including degree, institution, dates, and relevant courses.
    pub education: Vec<Education>,
}

impl Schema for Educations {
    const NAME: &'static str = "Educations";
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SkillSections {
    /// Skill sections, each containing a group of skills and competencies relevant to the job.
    pub skill_section: Vec<SkillSection>,
}

impl Schema for SkillSections {
    const NAME: &'static str = "SkillSections";
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Projects {
    /// Project experiences, including project name, type, link, resources, dates, and
    /// description.
    pub projects: Vec<Project>,
}

impl Schema for Projects {
    const NAME: &'static str = "Projects";
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Certifications {
    /// Job relevant certifications that you have earned, including the name, issuing
    /// organization, and a link to verify the certification.
    pub certifications: Vec<Certification>,
}

impl Schema for Certifications {
    const NAME: &'static str = "Certifications";
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Achievements {
    /// Job relevant key accomplishments, awards, or recognitions that demonstrate your
    /// skills and abilities.
    pub achievements: Vec<Option<String>>,
}

impl Schema for Achievements {
    const NAME: &'static str = "Achievements";
}

/// A regenerated resume: the six tailored sections with personal info passed through
/// from the source, plus the job's keywords joined as one string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TailoredResume {
    #[serde(flatten)]
    pub resume: Resume,
    pub keywords: String,
}
