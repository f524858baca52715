//! Turns an uploaded file into plain text for extraction.
//!
//! `AppState` holds an `Arc<dyn DocumentParser>`; the default is `LocalDocumentParser`.

use std::io::{Cursor, Read};
use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::workspace::RequestWorkspace;

/// A file received from a caller.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub file_name: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentKind {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentKind {
    fn from_file_name(name: &str) -> Option<Self> {
        let extension = Path::new(name)
            .extension()?
            .to_str()?
            .to_ascii_lowercase();
        match extension.as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            "txt" | "md" => Some(DocumentKind::PlainText),
            _ => None,
        }
    }
}

pub const SUPPORTED_EXTENSIONS: &str = ".pdf, .docx, .txt, .md";

#[async_trait]
pub trait DocumentParser: Send + Sync {
    async fn parse(
        &self,
        document: &UploadedDocument,
        workspace: &RequestWorkspace,
    ) -> Result<String, AppError>;
}

/// Parses PDFs with `pdf-extract`, DOCX with `zip` + `quick-xml`, and text files as UTF-8.
pub struct LocalDocumentParser;

#[async_trait]
impl DocumentParser for LocalDocumentParser {
    async fn parse(
        &self,
        document: &UploadedDocument,
        workspace: &RequestWorkspace,
    ) -> Result<String, AppError> {
        let kind = DocumentKind::from_file_name(&document.file_name).ok_or_else(|| {
            AppError::Validation(format!(
                "unsupported file type '{}'; supported types are {SUPPORTED_EXTENSIONS}",
                document.file_name
            ))
        })?;

        let path = workspace.write(&document.file_name, &document.bytes).await?;
        debug!(path = %path.display(), ?kind, "upload persisted");

        let text = match kind {
            DocumentKind::Pdf => {
                let bytes = tokio::fs::read(&path).await?;
                tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
                    .await
                    .map_err(|e| AppError::Internal(anyhow::anyhow!("PDF parser task failed: {e}")))?
                    .map_err(|e| {
                        AppError::Validation(format!(
                            "could not read text from '{}': {e}",
                            document.file_name
                        ))
                    })?
            }
            DocumentKind::Docx => {
                let bytes = tokio::fs::read(&path).await?;
                tokio::task::spawn_blocking(move || extract_docx_text(&bytes))
                    .await
                    .map_err(|e| AppError::Internal(anyhow::anyhow!("DOCX parser task failed: {e}")))?
                    .map_err(|e| {
                        AppError::Validation(format!(
                            "could not read text from '{}': {e}",
                            document.file_name
                        ))
                    })?
            }
            DocumentKind::PlainText => {
                let bytes = tokio::fs::read(&path).await?;
                String::from_utf8(bytes).map_err(|_| {
                    AppError::Validation(format!("'{}' is not valid UTF-8 text", document.file_name))
                })?
            }
        };

        if text.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "no text could be extracted from '{}'",
                document.file_name
            )));
        }

        info!(
            file = %document.file_name,
            chars = text.len(),
            "document parsed"
        );
        Ok(text)
    }
}

/// Paragraph text of `word/document.xml`, one paragraph per line.
fn extract_docx_text(data: &[u8]) -> anyhow::Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))?;
    let mut xml = String::new();
    archive.by_name("word/document.xml")?.read_to_string(&mut xml)?;

    let mut reader = Reader::from_str(&xml);
    let mut buf = Vec::new();
    let mut current = String::new();
    let mut lines = Vec::new();
    let mut in_paragraph = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.name().as_ref() == b"w:p" => {
                in_paragraph = true;
                current.clear();
            }
            Event::End(e) if e.name().as_ref() == b"w:p" => {
                if !current.trim().is_empty() {
                    lines.push(current.trim().to_string());
                }
                current.clear();
                in_paragraph = false;
            }
            // Tabs and soft breaks separate words inside a paragraph.
            Event::Empty(e) if in_paragraph && matches!(e.name().as_ref(), b"w:tab" | b"w:br") => {
                current.push(' ');
            }
            Event::Text(e) if in_paragraph => {
                current.push_str(&e.xml_content()?);
            }
            Event::GeneralRef(e) if in_paragraph => {
                if let Some(ch) = e.resolve_char_ref()? {
                    current.push(ch);
                } else if let Some(value) = resolve_predefined_entity(&e.decode()?) {
                    current.push_str(value);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(lines.join("\n"))
}
