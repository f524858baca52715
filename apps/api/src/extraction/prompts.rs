// Prompt templates for resume and job-description extraction.
// `{format_instructions}` is filled with `llm_client::prompts::output_format`.

/// Resume extraction. Replace `{format_instructions}` then `{resume_text}`.
pub const RESUME_EXTRACTION_PROMPT_TEMPLATE: &str = r#"<objective>
Parse a text-formatted resume efficiently and extract diverse applicant's data into a structured JSON format.
</objective>

<input>
The following text is the applicant's resume in plain text format:

{resume_text}
</input>

<instructions>
Follow these steps to extract and structure the resume information:

1. Analyze Structure:
   - Examine the text-formatted resume to identify key sections (e.g., personal information, education, experience, skills, certifications).
   - Note any unique formatting or organization within the resume.

2. Extract Information:
   - Systematically parse each section, extracting relevant details.
   - Pay attention to dates, titles, organizations, and descriptions.

3. Handle Variations:
   - Account for different resume styles, formats, and section orders.
   - Adapt the extraction process to accurately capture data from various layouts.

4. Optimize Output:
   - Handle missing or incomplete information appropriately (use null values or empty arrays as needed).
   - Standardize date formats, if applicable.

5. Validate:
   - Review the extracted data for consistency and completeness.
   - Ensure all required fields are populated if the information is available in the resume.
</instructions>

{format_instructions}
"#;

/// Flat job extraction (v1). Replace `{format_instructions}` then `{job_description}`.
pub const JOB_EXTRACTION_PROMPT_TEMPLATE: &str = r#"<task>
Identify the key details from a job description and company overview to create a structured JSON output. Focus on extracting the most crucial and concise information that would be most relevant for tailoring a resume to this specific job.
</task>

<job_description>
{job_description}
</job_description>

Note: The "keywords", "job_duties_and_responsibilities", and "required_qualifications" sections are particularly important for resume tailoring. Ensure these are as comprehensive and accurate as possible.

{format_instructions}
"#;

/// Grouped skill extraction (v2). Replace `{format_instructions}` then `{job_description}`.
pub const SKILL_GROUP_EXTRACTION_PROMPT_TEMPLATE: &str = r#"<task>
Extract key skill groups and their specific requirements from a job description to create a structured JSON output. Focus on identifying and categorizing required skills into distinct, non-overlapping groups for effective resume tailoring.
</task>

<job_description>
{job_description}
</job_description>

<instructions>
## 1. Skill Classification Strategy
Technical Skills, grouped by technology domain:
- Frontend Development: Web UI frameworks (React, Vue, Angular), HTML/CSS, JavaScript/TypeScript, responsive design
- Backend Development: Server-side languages (Node.js, Python, Java), APIs, databases, server architecture
- Mobile Development: Native (iOS/Android) or cross-platform (React Native, Flutter) development
- Data & Analytics: Data science tools, databases, analytics platforms, ML/AI frameworks
- Cloud & DevOps: Cloud platforms (AWS, Azure, GCP), containerization, CI/CD, infrastructure
- Quality Assurance: Testing frameworks, automation tools, quality processes
- Security: Cybersecurity tools, compliance standards, security practices

Non-Technical Skills, in a single group only:
- Professional Skills: Communication, teamwork, problem-solving, project management, languages, leadership, business acumen, adaptability, time management

## 2. Extraction Rules
- Avoid Duplication: each requirement appears in only one group.
- Be Specific: include exact technologies, years of experience, proficiency levels.
- Prioritize Precision: "3+ years React experience", not just "Frontend experience".
- Context Matters: consider the role's primary focus when categorizing borderline skills.
- Every group_name is unique within the output.

## 3. Grouping Priorities (in order)
1. Primary Technical Domain: main technology stack for the role
2. Secondary Technical Skills: supporting technologies mentioned
3. Professional Skills: all soft skills, communication, and non-technical requirements in ONE group

## 4. Common Pitfalls to Avoid
- Don't split similar technologies across multiple groups.
- Don't create separate groups for soft skills (communication, teamwork, etc.).
- Don't duplicate experience requirements across groups.
- Don't use vague group names like "General Skills" or "Other Requirements".
</instructions>

{format_instructions}
"#;
