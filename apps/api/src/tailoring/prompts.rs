// Prompt templates for section regeneration and missing-information merges.
//
// Section templates take `{section_data}`, `{job_description}` and
// `{format_instructions}`. Each wraps its input in a distinct tag.

/// Rules every non-achievement section shares.
const TAILORING_RULES: &str = r#"Rules:
1. Truthfulness: use only the data provided in the section data. Never create, infer, or add entries, employers, institutions, dates, links, technologies, or metrics that are not explicitly present.
2. Relevance: prioritize what matters for this specific job, but only include entries from the section data.
3. Verbatim facts: keep dates, links, company names, institution names, and other proper nouns exactly as written.
4. Style: clear expression over impressiveness, active voice, impeccable spelling and grammar.
5. If the section data is empty, return an empty array []."#;

/// Extra rules for sections written as bullet points.
const BULLET_RULES: &str = r#"Bullet points:
- At most 3 bullet points per entry, closely mirroring the job requirements.
- Each bullet follows "Did X by doing Y, achieved Z", rephrasing the source description without adding new content.
- Quantify impact only with numbers that appear in the section data.
- Apply STAR (Situation, Task, Action, Result) implicitly and lead with strong action verbs."#;

pub const EXPERIENCE_PROMPT_TEMPLATE: &str = r#"You are writing the "Work Experience" section of a JSON resume for an applicant applying to the job below.

Analyze the work history, select and rewrite what best matches the job requirements, and return it as JSON.

{tailoring_rules}

{bullet_rules}

<work_experience>
{section_data}
</work_experience>

<job_description>
{job_description}
</job_description>

<example>
"work_experience": [
  {
    "role": "Software Engineer",
    "company": "Winjit Technologies",
    "location": "Pune, India",
    "from_date": "Jan 2020",
    "to_date": "Jun 2022",
    "description": [
      "Engineered 10+ RESTful APIs and distributed services by designing low-latency data access paths, supporting 30+ responsive product features.",
      "Standardized dynamic form generation with customizable styling, cutting development time by 8x while leading a 12-member cross-functional team."
    ]
  }
]
</example>

{format_instructions}
"#;

pub const SKILLS_PROMPT_TEMPLATE: &str = r#"You are writing the "Skills" section of a JSON resume for an applicant applying to the job below.

Group and order the applicant's skills so the ones most relevant to the job come first, and return them as JSON.

{tailoring_rules}

Skills are never invented: a skill or skill group that does not appear in the section data must not appear in the output.

<SKILL_SECTION>
{section_data}
</SKILL_SECTION>

<job_description>
{job_description}
</job_description>

<example>
"skill_section": [
  { "name": "Programming Languages", "skills": ["Python", "JavaScript", "C#"] },
  { "name": "Cloud and DevOps", "skills": ["Azure", "AWS"] }
]
</example>

{format_instructions}
"#;

pub const PROJECTS_PROMPT_TEMPLATE: &str = r#"You are writing the "Project Experience" section of a JSON resume for an applicant applying to the job below.

Analyze the projects, select and rewrite what best matches the job requirements, and return them as JSON.

{tailoring_rules}

{bullet_rules}

<PROJECTS>
{section_data}
</PROJECTS>

<job_description>
{job_description}
</job_description>

<example>
"projects": [
  {
    "name": "Search Engine for All File Types - Sunhack Hackathon",
    "type": "Hackathon",
    "link": "https://devpost.com/software/team-soul-1fjgwo",
    "from_date": "Nov 2023",
    "to_date": "Nov 2023",
    "description": [
      "Built a TabNet classifier detecting forest fires from IoT sensor data at 98.7% accuracy by deploying to AWS and edge devices with TinyML, Docker and Redis."
    ]
  }
]
</example>

{format_instructions}
"#;

pub const EDUCATION_PROMPT_TEMPLATE: &str = r#"You are writing the "Education" section of a JSON resume for an applicant applying to the job below.

List the education entries, emphasizing coursework relevant to the job, and return them as JSON.

{tailoring_rules}

<Education>
{section_data}
</Education>

<job_description>
{job_description}
</job_description>

<example>
"education": [
  {
    "degree": "Masters of Science - Computer Science (Thesis)",
    "university": "Arizona State University, Tempe, USA",
    "from_date": "Aug 2023",
    "to_date": "May 2025",
    "courses": ["Operational Deep Learning", "Software Verification, Validation and Testing"]
  }
]
</example>

{format_instructions}
"#;

pub const CERTIFICATIONS_PROMPT_TEMPLATE: &str = r#"You are writing the "Certifications" section of a JSON resume for an applicant applying to the job below.

Include the certifications relevant to the job and return them as JSON. When a certification has no link, set "link" to "".

{tailoring_rules}

<CERTIFICATIONS>
{section_data}
</CERTIFICATIONS>

<job_description>
{job_description}
</job_description>

<example>
"certifications": [
  {
    "name": "Deep Learning Specialization",
    "by": "DeepLearning.AI, Coursera Inc.",
    "link": "https://www.coursera.org/account/accomplishments/specialization/G3WPNWRYX628"
  }
]
</example>

{format_instructions}
"#;

/// Input is the union of source projects, work experience and achievements.
pub const ACHIEVEMENTS_PROMPT_TEMPLATE: &str = r#"You are writing the "Achievements" section of a JSON resume for an applicant applying to the job below.

The combined data holds the applicant's `projects`, `work_experience` and existing `achievements`. Awards are often mentioned inside a project or job description, so search all three.

Include ONLY formal awards and recognitions:
- Awards and prizes: competition wins, hackathon prizes, contest rankings, academic honors
- Recognitions: dean's list, honors programs, scholarships, employee-of-the-month and other performance awards
- Publications and patents
- Graduation honors such as magna cum laude

EXCLUDE performance metrics, even when impressive:
- Accuracy figures ("Achieved 80% accuracy")
- Improvements ("Improved user engagement by 10%", "Reduced downtime by 65%")
- Technical accomplishments or project outcomes without formal recognition

Never invent, infer, or embellish an achievement. If nothing qualifies, return an empty array [].

<combined_data>
{section_data}
</combined_data>

<job_description>
{job_description}
</job_description>

<examples>
INCLUDE:
- "Won first prize in UIT Data Science Challenge 2025"
- "Dean's List 2023"
- "Published research paper in IEEE on machine learning applications"
- "Graduated Magna Cum Laude"
EXCLUDE:
- "Achieved 80% accuracy in image classification model"
- "Improved user engagement by 10%"
- "Optimized performance by 40%"
</examples>

{format_instructions}
"#;

/// Replace `{format_instructions}`, `{resume_data}` and `{missing_information}`.
pub const MERGE_MISSING_INFO_PROMPT_TEMPLATE: &str = r#"You are updating a resume JSON by integrating information the candidate supplied for gaps found during review.

<instructions>
- Merge each item's `data` into the appropriate sections of the resume.
- If one item's `data` holds several kinds of information, split it across the corresponding sections. Never drop part of it.
- Keep the structure and wording of the existing resume. Change existing data only where consistency requires it.
- Leave personal information (name, email, phone, title, location, media) unchanged.
- Return the complete updated resume, not just the changed parts.
</instructions>

<classification>
Classify every piece of `data` into exactly one section:
1. achievements: awards, competitions won, recognitions, honors, rankings, prizes.
   Signals: "won", "first prize", "award", "recognition", "honor", "ranked", "selected".
2. projects: something the candidate built, created, or developed (an application, system, website, tool).
   Signals: "created", "built", "developed", "project", "application", "system", "website".
3. work_experience: jobs, internships, and responsibilities held at an employer.
   Signals: "worked at", "intern", "employee", "role", "position", "company".
4. skill_section: proficiency with languages, frameworks, or tools.
   Signals: "proficient in", "experienced with", "knowledge of", "skilled in".
5. certifications: credentials and licenses.
   Signals: "certified", "certificate", "credential", "license".
6. education: degrees and academic study.
   Signals: "degree", "university", "studied", "academic".
</classification>

<example>
Input data: "Created a web application with MERN stack that provides users with LLM-based mock interviews and CV improvements, this won first prize in UIT Data Science Challenge 2025"
Split into:
- projects: a project describing the MERN web application with LLM-based mock interviews and CV improvements
- achievements: "Won first prize in UIT Data Science Challenge 2025"
</example>

<resume>
{resume_data}
</resume>

<missing_information>
{missing_information}
</missing_information>

{format_instructions}
"#;

/// Fills the shared rule blocks into a section template.
pub fn section_template(template: &str) -> String {
    template
        .replace("{tailoring_rules}", TAILORING_RULES)
        .replace("{bullet_rules}", BULLET_RULES)
}
