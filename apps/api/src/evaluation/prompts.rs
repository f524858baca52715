// Prompt templates for alignment scoring, CV review and improvement analysis.

/// Batched alignment scoring. Replace `{format_instructions}`, `{job_json}`,
/// `{all_skill_groups}` and `{resume_json}`.
pub const MULTI_ALIGNMENT_PROMPT_TEMPLATE: &str = r#"You are evaluating whether a candidate satisfies the requirements for a job role across multiple skill groups. Below is the full job description, all skill groups with their specific requirements, and the candidate's complete resume data. Determine which requirements for each skill group are satisfied by the candidate and which are not, considering the full context of the job description.

<job_description>
{job_json}
</job_description>

<skill_groups>
{all_skill_groups}
</skill_groups>

<resume>
{resume_json}
</resume>

<instructions>
1. Evaluate each requirement for every skill group listed above.
2. For each skill group, consider all relevant sections of the resume:
   - Skills (skill_section: names and specific skills).
   - Work experience (work_experience: roles, companies, and descriptions).
   - Projects (projects: names, types, and descriptions).
   - Certifications (certifications: names and issuers).
   - Achievements (achievements).
3. Use the job description context (job title, duties, required qualifications, company details) to decide whether a requirement is satisfied.
4. A requirement is satisfied if the resume explicitly demonstrates the skill, experience, or qualification (a specific technology, years of experience, or a relevant achievement).
5. For each skill group, place every requirement in exactly one of:
   - `satisfied_requirements`: requirements the resume explicitly meets.
   - `unsatisfied_requirements`: requirements the resume does not meet or where evidence is insufficient.
6. Copy each requirement and each group_name exactly as written above. Do not add requirements that are not listed.
7. Return one entry in `alignment_scores` for EVERY skill group listed above.
</instructions>

{format_instructions}
"#;

/// CV review. Replace `{format_instructions}`, `{job_json}`, `{alignment_scores}`
/// and `{resume_json}`.
pub const CV_REVIEW_PROMPT_TEMPLATE: &str = r#"Based on the CV, job description, and alignment scores listing satisfied and unsatisfied requirements, provide a review of the CV in English and return the output as JSON.

<instructions>
- Provide a professional and natural review, addressing the user as "you":
  - Advantages: list the skills, experiences, or projects in your CV that align well with the job requirements.
  - Disadvantages: identify specific skills or experiences you lack or need to improve to meet the job requirements.
- Emphasize skills or experiences that match the job description (JD).
- For areas needing improvement, focus on the skill groups or requirements in the JD that the CV does not adequately meet, especially those with many unsatisfied requirements in the alignment scores.

Missing Information:
- Missing CV Content: identify essential CV sections or information that are completely missing (e.g., contact information, work experience section, education section, skills section). For each, give specific guidance on what should be included.
- Missing Skills: list specific skills you need to add to better meet the job requirements, focusing only on skills related to unsatisfied requirements that can be supplemented through certifications, courses, or projects.
- Focus on technical skills rather than generic requirements.
- Each missing information item must include:
  - `field`: the skill or competency to add (e.g., "Frontend Development Skills") or the missing CV section (e.g., "Contact Information").
  - `suggestion`:
    - For missing CV sections: what information should be included in that section.
    - For missing skills, use this format (only the bullet points that apply to the skill):
      "Enhance your [Skill Name] skills by:

      • List your [Skill]-related certifications (include certificate name, provider, and URL link)
      • Add projects where you worked as a [Role] (include project name, project type, GitHub link, demo video/slides, timeline, and brief description)
      • Include [Skill]-related work experience (specify your role, company name, employment period, and job description)
      • Among the projects you've participated in, are there any that used [Skill] technologies mentioned but not yet listed?"
- Never fill in information on the candidate's behalf.
</instructions>

<cv>
{resume_json}
</cv>

<job_description>
{job_json}
</job_description>

<alignment_scores>
{alignment_scores}
</alignment_scores>

{format_instructions}

Provide a professional, natural review focused on the IT domain, using clear and understandable language. Avoid generic advice; focus on specific skills from the CV and JD.
"#;

/// Before/after comparison. Replace `{format_instructions}`, `{original_resume_data}`
/// and `{enhanced_resume_data}`.
pub const IMPROVEMENT_ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are an expert resume analyst with 15 years of experience in career development and ATS optimization. Analyze two resume versions and identify the key improvements made in the enhanced resume compared to the original resume.

<original_resume>
{original_resume_data}
</original_resume>

<enhanced_resume>
{enhanced_resume_data}
</enhanced_resume>

<instructions>
1. Compare both versions across all sections: personal information, work experience, education, skills, projects, certifications, and achievements.
2. Write a concise professional summary (1-2 sentences) for the original resume and one for the enhanced resume. Summaries highlight key strengths, experience level, and main areas of expertise. The enhanced summary reflects improvements in positioning, specificity, and impact.
3. Identify specific improvements in the enhanced resume:
   - ATS Optimization: keywords added, formatting improvements, skill categorization
   - Content Enhancement: quantified achievements, stronger action verbs, STAR methodology
   - Structure & Presentation: better organization, clearer sections, improved descriptions
   - Job Relevance: tailored content, relevant skills highlighted, industry terminology
4. List the most impactful improvements first. Keep to 3-6 improvements, each concrete and based on actual differences (e.g., "Added 12 relevant keywords", "Quantified 8 achievements").
</instructions>

{format_instructions}
"#;
