use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::models::job::JobRequirements;
use crate::models::present;
use crate::models::resume::{Resume, TailoredResume};
use crate::render::ResumeRenderer;
use crate::workspace::RequestWorkspace;

const RENDER_TIMEOUT: Duration = Duration::from_secs(60);
const MAX_TITLE_CHARS: usize = 20;

/// Escapes text for use inside a LaTeX document body.
pub fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str(r"\&"),
            '%' => out.push_str(r"\%"),
            '$' => out.push_str(r"\$"),
            '#' => out.push_str(r"\#"),
            '_' => out.push_str(r"\_"),
            '{' => out.push_str(r"\{"),
            '}' => out.push_str(r"\}"),
            '~' => out.push_str(r"\textasciitilde{}"),
            '^' => out.push_str(r"\^{}"),
            '\\' => out.push_str(r"\textbackslash{}"),
            '\n' => out.push_str("\\newline%\n"),
            '-' => out.push_str("{-}"),
            '\u{A0}' => out.push('~'),
            '[' => out.push_str("{[}"),
            ']' => out.push_str("{]}"),
            other => out.push(other),
        }
    }
    out
}

/// Title-cases words, then keeps ASCII letters and digits only.
fn clean_name_part(text: &str) -> String {
    let mut prev_alpha = false;
    text.chars()
        .map(|c| {
            let mapped = if prev_alpha {
                c.to_lowercase().next().unwrap_or(c)
            } else {
                c.to_uppercase().next().unwrap_or(c)
            };
            prev_alpha = c.is_alphabetic();
            mapped
        })
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

/// `<Company>_<Title>_resume`, the title cut to 20 characters.
pub fn document_name(job: &JobRequirements) -> String {
    let part = |value: &Option<String>| {
        let cleaned = clean_name_part(value.as_deref().unwrap_or_default());
        if cleaned.is_empty() {
            "Unknown".to_string()
        } else {
            cleaned
        }
    };
    let company = part(&job.company_name);
    let title: String = part(&job.job_title).chars().take(MAX_TITLE_CHARS).collect();
    format!("{company}_{title}_resume")
}

fn text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(escape_latex)
}

fn date_range(from: &Option<String>, to: &Option<String>) -> String {
    match (text(from), text(to)) {
        (Some(from), Some(to)) => format!("{from} -- {to}"),
        (Some(one), None) | (None, Some(one)) => one,
        (None, None) => String::new(),
    }
}

fn bullets(out: &mut String, items: &[Option<String>]) -> std::fmt::Result {
    let items: Vec<&str> = present(items).collect();
    if items.is_empty() {
        return Ok(());
    }
    writeln!(out, "\\begin{{itemize}}")?;
    for item in items {
        writeln!(out, "  \\item {}", escape_latex(item))?;
    }
    writeln!(out, "\\end{{itemize}}")
}

const LINK_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

/// `\href` with a sanitised target. Links with a disallowed scheme keep only the label.
fn href(link: &str, label: &str) -> String {
    match link_target(link) {
        Some(target) => format!("\\href{{{target}}}{{{label}}}"),
        None => label.to_string(),
    }
}

/// Percent-encodes every character that could end the `\href` argument or
/// start a control sequence. `%` and `#` are escaped the way hyperref expects.
fn link_target(link: &str) -> Option<String> {
    if let Some((scheme, rest)) = link.split_once(':') {
        let looks_like_scheme = !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        let is_port = rest.starts_with(|c: char| c.is_ascii_digit());
        if looks_like_scheme
            && !is_port
            && !LINK_SCHEMES.contains(&scheme.to_ascii_lowercase().as_str())
        {
            return None;
        }
    }

    let mut out = String::with_capacity(link.len());
    for c in link.chars() {
        match c {
            '%' => out.push_str(r"\%"),
            '#' => out.push_str(r"\#"),
            '\\' | '{' | '}' | '^' | '~' | '"' | '<' | '>' | '`' => {
                let _ = write!(out, r"\%{:02X}", c as u32);
            }
            c if c.is_ascii_whitespace() || c.is_control() => {
                if c.is_ascii() {
                    let _ = write!(out, r"\%{:02X}", c as u32);
                }
            }
            other => out.push(other),
        }
    }
    Some(out)
}

/// A one-column LaTeX resume.
pub fn build_document(tailored: &TailoredResume) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_document(&mut out, &tailored.resume);
    out
}

fn write_document(out: &mut String, resume: &Resume) -> std::fmt::Result {
    writeln!(out, "\\documentclass[11pt]{{article}}")?;
    writeln!(out, "\\usepackage[margin=0.6in]{{geometry}}")?;
    writeln!(out, "\\usepackage[hidelinks]{{hyperref}}")?;
    writeln!(out, "\\usepackage{{enumitem}}")?;
    writeln!(out, "\\setlist[itemize]{{leftmargin=*,noitemsep,topsep=2pt}}")?;
    writeln!(out, "\\pagestyle{{empty}}")?;
    writeln!(out, "\\setlength{{\\parindent}}{{0pt}}")?;
    writeln!(out, "\\begin{{document}}\n")?;

    writeln!(out, "\\begin{{center}}")?;
    if let Some(name) = text(&resume.name) {
        writeln!(out, "  {{\\LARGE\\bfseries {name}}}\\\\")?;
    }
    if let Some(title) = text(&resume.title) {
        writeln!(out, "  {title}\\\\")?;
    }
    let mut contact: Vec<String> = [&resume.email, &resume.phone, &resume.location]
        .into_iter()
        .filter_map(text)
        .collect();
    for (label, link) in [
        ("LinkedIn", &resume.media.linkedin),
        ("GitHub", &resume.media.github),
        ("Medium", &resume.media.medium),
        ("Devpost", &resume.media.devpost),
    ] {
        if let Some(link) = link.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
            contact.push(href(link, label));
        }
    }
    if !contact.is_empty() {
        writeln!(out, "  {}", contact.join(" $|$ "))?;
    }
    writeln!(out, "\\end{{center}}\n")?;

    if let Some(summary) = text(&resume.summary) {
        writeln!(out, "\\section*{{Summary}}\n{summary}\n")?;
    }

    if !resume.education.is_empty() {
        writeln!(out, "\\section*{{Education}}")?;
        for edu in &resume.education {
            writeln!(
                out,
                "\\textbf{{{}}} \\hfill {}\\\\",
                text(&edu.university).unwrap_or_default(),
                date_range(&edu.from_date, &edu.to_date)
            )?;
            if let Some(degree) = text(&edu.degree) {
                writeln!(out, "\\textit{{{degree}}}\\\\")?;
            }
            let courses: Vec<String> = present(&edu.courses).map(escape_latex).collect();
            if !courses.is_empty() {
                writeln!(out, "Courses: {}\\\\", courses.join(", "))?;
            }
            writeln!(out)?;
        }
    }

    if !resume.work_experience.is_empty() {
        writeln!(out, "\\section*{{Work Experience}}")?;
        for exp in &resume.work_experience {
            writeln!(
                out,
                "\\textbf{{{}}}, {} \\hfill {}\\\\",
                text(&exp.role).unwrap_or_default(),
                text(&exp.company).unwrap_or_default(),
                date_range(&exp.from_date, &exp.to_date)
            )?;
            if let Some(location) = text(&exp.location) {
                writeln!(out, "\\textit{{{location}}}")?;
            }
            bullets(out, &exp.description)?;
            writeln!(out)?;
        }
    }

    if !resume.projects.is_empty() {
        writeln!(out, "\\section*{{Projects}}")?;
        for project in &resume.projects {
            let name = text(&project.name).unwrap_or_default();
            let heading = match project.link.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
                Some(link) => href(link, &format!("\\textbf{{{name}}}")),
                None => format!("\\textbf{{{name}}}"),
            };
            let kind = text(&project.project_type)
                .map(|t| format!(" ({t})"))
                .unwrap_or_default();
            writeln!(
                out,
                "{heading}{kind} \\hfill {}\\\\",
                date_range(&project.from_date, &project.to_date)
            )?;
            bullets(out, &project.description)?;
            writeln!(out)?;
        }
    }

    if !resume.skill_section.is_empty() {
        writeln!(out, "\\section*{{Skills}}")?;
        for group in &resume.skill_section {
            let skills: Vec<String> = present(&group.skills).map(escape_latex).collect();
            writeln!(
                out,
                "\\textbf{{{}}}: {}\\\\",
                text(&group.name).unwrap_or_default(),
                skills.join(", ")
            )?;
        }
        writeln!(out)?;
    }

    if !resume.certifications.is_empty() {
        writeln!(out, "\\section*{{Certifications}}")?;
        writeln!(out, "\\begin{{itemize}}")?;
        for cert in &resume.certifications {
            let name = text(&cert.name).unwrap_or_default();
            let name = match cert.link.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
                Some(link) => href(link, &name),
                None => name,
            };
            match text(&cert.by) {
                Some(by) => writeln!(out, "  \\item {name}, {by}")?,
                None => writeln!(out, "  \\item {name}")?,
            }
        }
        writeln!(out, "\\end{{itemize}}\n")?;
    }

    if present(&resume.achievements).next().is_some() {
        writeln!(out, "\\section*{{Achievements}}")?;
        bullets(out, &resume.achievements)?;
        writeln!(out)?;
    }

    writeln!(out, "\\end{{document}}")
}

/// Renders with an external `pdflatex`-compatible binary.
#[derive(Debug, Clone)]
pub struct LatexRenderer {
    latex_bin: String,
    timeout: Duration,
}

impl LatexRenderer {
    pub fn new(latex_bin: impl Into<String>) -> Self {
        Self {
            latex_bin: latex_bin.into(),
            timeout: RENDER_TIMEOUT,
        }
    }

    async fn compile(&self, tex_path: &Path, out_dir: &Path) -> Result<(), AppError> {
        let mut command = Command::new(&self.latex_bin);
        command
            .arg("-interaction=nonstopmode")
            .arg("-halt-on-error")
            .arg("-output-directory")
            .arg(out_dir)
            .arg(tex_path)
            .current_dir(out_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match timeout(self.timeout, command.output()).await {
            Ok(result) => result.map_err(|e| {
                AppError::Render(format!("could not run {}: {e}", self.latex_bin))
            })?,
            Err(_) => {
                return Err(AppError::Render(format!(
                    "{} timed out after {}s",
                    self.latex_bin,
                    self.timeout.as_secs()
                )))
            }
        };

        if !output.status.success() {
            let log = String::from_utf8_lossy(&output.stdout);
            let tail: Vec<&str> = log.lines().rev().take(5).collect();
            debug!(log = %log, "latex output");
            return Err(AppError::Render(format!(
                "{} exited with {}: {}",
                self.latex_bin,
                output.status,
                tail.into_iter().rev().collect::<Vec<_>>().join(" | ")
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ResumeRenderer for LatexRenderer {
    async fn render(
        &self,
        resume: &TailoredResume,
        job: &JobRequirements,
        workspace: &RequestWorkspace,
    ) -> Result<PathBuf, AppError> {
        let name = document_name(job);

        let artifact = serde_json::to_vec_pretty(resume)
            .map_err(|e| AppError::Render(format!("could not serialize resume: {e}")))?;
        workspace.write(&format!("{name}.json"), &artifact).await?;

        let tex_path = workspace
            .write(&format!("{name}.tex"), build_document(resume).as_bytes())
            .await?;

        self.compile(&tex_path, workspace.path()).await?;

        let pdf_path = workspace.file_path(&format!("{name}.pdf"));
        if !tokio::fs::try_exists(&pdf_path).await.unwrap_or(false) {
            return Err(AppError::Render(format!(
                "{} finished but produced no PDF",
                self.latex_bin
            )));
        }
        info!(
            request_id = %workspace.request_id(),
            file = %pdf_path.display(),
            "resume rendered"
        );
        Ok(pdf_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{Certification, Project, SkillSection, WorkExperience};

    fn tailored() -> TailoredResume {
        TailoredResume {
            resume: Resume {
                name: Some("Jane Doe".to_string()),
                email: Some("jane_doe@example.com".to_string()),
                work_experience: vec![WorkExperience {
                    role: Some("Backend Engineer".to_string()),
                    company: Some("Acme & Co".to_string()),
                    from_date: Some("Jan 2021".to_string()),
                    to_date: Some("Present".to_string()),
                    description: vec![Some("Cut p99 latency by 40%".to_string()), None],
                    ..WorkExperience::default()
                }],
                projects: vec![Project {
                    name: Some("Ledger".to_string()),
                    link: Some("https://github.com/jane/ledger".to_string()),
                    ..Project::default()
                }],
                skill_section: vec![SkillSection {
                    name: Some("Languages".to_string()),
                    skills: vec![Some("C#".to_string()), Some("Rust".to_string())],
                }],
                certifications: vec![Certification {
                    name: Some("AWS Certified Solutions Architect".to_string()),
                    by: Some("Amazon".to_string()),
                    link: None,
                }],
                ..Resume::default()
            },
            keywords: "Rust".to_string(),
        }
    }

    #[test]
    fn test_escape_latex_specials() {
        assert_eq!(escape_latex("R&D 100% $5 #1"), r"R\&D 100\% \$5 \#1");
        assert_eq!(escape_latex("a_b {c} ~^\\"), r"a\_b \{c\} \textasciitilde{}\^{}\textbackslash{}");
        assert_eq!(escape_latex("[x]-y"), "{[}x{]}{-}y");
        assert_eq!(escape_latex("a\u{A0}b\nc"), "a~b\\newline%\nc");
    }

    #[test]
    fn test_document_name_cleans_and_truncates() {
        let job = JobRequirements {
            company_name: Some("acme corp.".to_string()),
            job_title: Some("senior back-end software engineer".to_string()),
            ..JobRequirements::default()
        };
        assert_eq!(document_name(&job), "AcmeCorp_SeniorBackEndSoftwar_resume");
        assert_eq!(
            document_name(&JobRequirements::default()),
            "Unknown_Unknown_resume"
        );
    }

    #[test]
    fn test_document_contains_escaped_sections() {
        let doc = build_document(&tailored());
        assert!(doc.starts_with("\\documentclass"));
        assert!(doc.contains("{\\LARGE\\bfseries Jane Doe}"));
        assert!(doc.contains(r"jane\_doe@example.com"));
        assert!(doc.contains(r"\textbf{Backend Engineer}, Acme \& Co \hfill Jan 2021 -- Present"));
        assert!(doc.contains(r"\item Cut p99 latency by 40\%"));
        assert!(doc.contains(r"\href{https://github.com/jane/ledger}{\textbf{Ledger}}"));
        assert!(doc.contains(r"\textbf{Languages}: C\#, Rust"));
        assert!(doc.contains(r"\item AWS Certified Solutions Architect, Amazon"));
        assert!(!doc.contains("Achievements"));
        assert!(doc.trim_end().ends_with("\\end{document}"));
    }

    #[test]
    fn test_links_cannot_break_out_of_href() {
        let mut resume = tailored();
        resume.resume.media.github = Some(r"x}{y}\input{/etc/passwd}\iffalse{".to_string());
        resume.resume.projects[0].link = Some(r"a}\write18{id}{".to_string());
        resume.resume.certifications[0].link = Some("run:/bin/sh".to_string());

        let doc = build_document(&resume);
        assert!(!doc.contains(r"\input{"));
        assert!(!doc.contains(r"\write18{"));
        assert!(!doc.contains("run:"));
        assert!(doc.contains(
            r"\href{x\%7D\%7By\%7D\%5Cinput\%7B/etc/passwd\%7D\%5Ciffalse\%7B}{GitHub}"
        ));
        assert!(doc.contains(r"\href{a\%7D\%5Cwrite18\%7Bid\%7D\%7B}{\textbf{Ledger}}"));
        assert!(doc.contains(r"\item AWS Certified Solutions Architect, Amazon"));
    }

    #[test]
    fn test_link_target_keeps_ordinary_urls() {
        assert_eq!(
            link_target("https://example.com/a_b?q=1&r=2#top").as_deref(),
            Some(r"https://example.com/a_b?q=1&r=2\#top")
        );
        assert_eq!(link_target("localhost:8080/x").as_deref(), Some("localhost:8080/x"));
        assert_eq!(
            link_target("mailto:jane@example.com").as_deref(),
            Some("mailto:jane@example.com")
        );
        assert_eq!(link_target("javascript:alert(1)"), None);
        assert_eq!(link_target("50% off").as_deref(), Some(r"50\%\%20off"));
    }

    #[tokio::test]
    async fn test_missing_binary_is_render_error() {
        let root = tempfile::tempdir().unwrap();
        let ws = RequestWorkspace::create(root.path()).await.unwrap();
        let renderer = LatexRenderer::new("resume-flow-no-such-latex-binary");

        let err = renderer
            .render(&tailored(), &JobRequirements::default(), &ws)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Render(_)));
        assert!(ws.file_path("Unknown_Unknown_resume.json").exists());
        assert!(ws.file_path("Unknown_Unknown_resume.tex").exists());
    }

    #[cfg(unix)]
    fn fake_latex(dir: &Path, body: &str) -> String {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join("fake-latex.sh");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_render_returns_pdf_written_by_binary() {
        let bin_dir = tempfile::tempdir().unwrap();
        let bin = fake_latex(
            bin_dir.path(),
            r#"printf '%%PDF-1.4' > "$4/$(basename "$5" .tex).pdf""#,
        );
        let root = tempfile::tempdir().unwrap();
        let ws = RequestWorkspace::create(root.path()).await.unwrap();

        let pdf = LatexRenderer::new(bin)
            .render(&tailored(), &JobRequirements::default(), &ws)
            .await
            .unwrap();
        assert_eq!(pdf, ws.file_path("Unknown_Unknown_resume.pdf"));
        assert_eq!(std::fs::read(&pdf).unwrap(), b"%PDF-1.4");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_or_silent_binary_is_render_error() {
        let bin_dir = tempfile::tempdir().unwrap();
        let root = tempfile::tempdir().unwrap();
        let ws = RequestWorkspace::create(root.path()).await.unwrap();

        let failing = fake_latex(bin_dir.path(), "echo '! Undefined control sequence.'; exit 1");
        let err = LatexRenderer::new(failing)
            .render(&tailored(), &JobRequirements::default(), &ws)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Undefined control sequence"));

        let silent = fake_latex(bin_dir.path(), "exit 0");
        let err = LatexRenderer::new(silent)
            .render(&tailored(), &JobRequirements::default(), &ws)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("produced no PDF"));
    }
}
