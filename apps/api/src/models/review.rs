use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::Schema;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MissingInfoItem {
    /// The specific field or section that needs additional information (e.g., 'Front End
    /// Development Skills', 'Mobile Development skills').
    pub field: String,
    /// A clear and concise suggestion on what information needs to be added (e.g., 'Include
    /// specific front-end technologies like React, Angular, or Vue.js along with your
    /// proficiency level, related projects, and work experience to demonstrate your
    /// expertise in front-end development.').
    pub suggestion: String,
    /// Filled in by the candidate before a merge. Never produced by generation.
    #[serde(default)]
    #[schemars(skip)]
    pub data: String,
}

impl MissingInfoItem {
    pub fn has_data(&self) -> bool {
        !self.data.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CvReview {
    /// List of strengths or positive aspects of the resume to the job description.
    pub advantages: Vec<Option<String>>,
    /// List of weaknesses or negative aspects of the resume to the job description.
    pub disadvantages: Vec<Option<String>>,
    /// List of missing information items with suggestions for improvement.
    pub missing_information: Vec<MissingInfoItem>,
}

impl Schema for CvReview {
    const NAME: &'static str = "CvReview";
}

impl CvReview {
    /// Blanks every `data` slot so the review only ever hands out empty templates.
    pub fn with_blank_data(mut self) -> Self {
        for item in &mut self.missing_information {
            item.data.clear();
        }
        self
    }
}

pub const FALLBACK_ORIGINAL_SUMMARY: &str = "Professional with relevant experience and skills.";
pub const DEFAULT_ENHANCED_SUMMARY: &str =
    "Enhanced professional with improved positioning and impact.";
pub const FALLBACK_ENHANCED_SUMMARY: &str =
    "Enhanced professional with improved positioning and targeted expertise.";
pub const DEFAULT_IMPROVEMENT: &str =
    "Resume has been updated with enhanced formatting and structure";
pub const FALLBACK_IMPROVEMENTS: [&str; 3] = [
    "Resume structure has been optimized for better readability",
    "Content has been enhanced for improved professional presentation",
    "Formatting has been updated to meet current industry standards",
];

/// Raw model output of the improvement comparison, before normalisation.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ImprovementDraft {
    /// A concise 2-3 sentence summary of the candidate's profile based on the original resume.
    pub original_summary: Option<String>,
    /// A concise 2-3 sentence summary of the candidate's profile based on the enhanced resume.
    pub enhanced_summary: Option<String>,
    /// Specific, concrete improvements made from the original to the enhanced resume,
    /// one short sentence each.
    pub improvements: Vec<Value>,
}

impl Schema for ImprovementDraft {
    const NAME: &'static str = "ImprovementDraft";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementAnalysis {
    pub original_summary: String,
    pub enhanced_summary: String,
    pub improvements: Vec<String>,
}

impl ImprovementAnalysis {
    /// Generic result returned when the comparison cannot be generated.
    pub fn fallback() -> Self {
        Self {
            original_summary: FALLBACK_ORIGINAL_SUMMARY.to_string(),
            enhanced_summary: FALLBACK_ENHANCED_SUMMARY.to_string(),
            improvements: FALLBACK_IMPROVEMENTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl From<ImprovementDraft> for ImprovementAnalysis {
    fn from(draft: ImprovementDraft) -> Self {
        let summary = |value: Option<String>, default: &str| {
            value
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let mut improvements: Vec<String> = draft
            .improvements
            .into_iter()
            .filter_map(|item| match item {
                Value::Null => None,
                Value::String(s) => Some(s),
                other => Some(other.to_string()),
            })
            .filter(|s| !s.trim().is_empty())
            .collect();
        if improvements.is_empty() {
            improvements.push(DEFAULT_IMPROVEMENT.to_string());
        }

        Self {
            original_summary: summary(draft.original_summary, FALLBACK_ORIGINAL_SUMMARY),
            enhanced_summary: summary(draft.enhanced_summary, DEFAULT_ENHANCED_SUMMARY),
            improvements,
        }
    }
}
