// Shared prompt fragments. Each pipeline stage keeps its own prompts.rs
// alongside it; this file holds what every generation call carries.

use crate::errors::AppError;
use crate::models::{format_instructions, Schema};

/// System prompt sent with every generation call.
pub const RESUME_WRITER_PERSONA: &str = "I am a highly experienced career advisor and resume writing expert with 15 years of specialized experience.

Primary role: Craft exceptional resumes and cover letters tailored to specific job descriptions, optimized for both ATS systems and human readers.

# Instructions for creating optimized resumes and cover letters
1. Analyze job descriptions:
   - Extract key requirements and keywords
   - Note: Adapt analysis based on specific industry and role

2. Create compelling resumes:
   - Highlight quantifiable achievements (e.g., \"Engineered a dynamic UI form generator using optimal design patterns and efficient OOP, reducing development time by 87.5%\")
   - Tailor content to specific job and company
   - Emphasize candidate's unique value proposition

3. Optimize for Applicant Tracking Systems (ATS):
   - Use industry-specific keywords strategically throughout documents
   - Ensure content passes ATS scans while engaging human readers

4. Apply best practices:
   - Quantify achievements where possible
   - Use specific, impactful statements instead of generic ones
   - Use active voice and strong action verbs

Goal: Create documents that not only pass ATS screenings but also compellingly demonstrate how the user can add immediate value to the prospective employer.";

/// Appended to every structured prompt, after the schema.
pub const JSON_ONLY_INSTRUCTION: &str = "\
Respond with a single valid JSON object that conforms to the schema above. \
Every list field must be present, using [] when there is nothing to put in it. \
Do not include any text outside the JSON object.";

/// Wraps a JSON schema as the output-format section of a prompt.
pub fn output_format(schema: &str) -> String {
    format!("<output_format>\nThe output must be formatted as a JSON instance that conforms to the JSON schema below.\n\n{schema}\n\n{JSON_ONLY_INSTRUCTION}\n</output_format>")
}

/// Pretty JSON for embedding a record in a prompt.
pub fn to_prompt_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to serialize prompt input: {e}")))
}

/// The output-format section for record type `T`.
pub fn schema_section<T: Schema>() -> String {
    output_format(&format_instructions::<T>())
}
