//! Document text extraction: turns uploaded résumé bytes into plain text.
//!
//! The format is chosen from the filename suffix only (case-sensitive):
//! `.pdf` → PDF, `.docx` → Word, anything else is read as UTF-8 text.
//! Parsing is CPU-bound, so it runs on tokio's blocking pool.

use async_trait::async_trait;
use bytes::Bytes;
use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentFormat {
    pub fn from_filename(filename: &str) -> Self {
        if filename.ends_with(".pdf") {
            DocumentFormat::Pdf
        } else if filename.ends_with(".docx") {
            DocumentFormat::Docx
        } else {
            DocumentFormat::PlainText
        }
    }
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX extraction failed: {0}")]
    Docx(String),

    #[error("Document is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("Extraction task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Best-effort text extraction. An empty string is a valid result
/// (scanned PDFs, empty files).
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, data: Bytes, format: DocumentFormat) -> Result<String, DocumentError>;
}

/// Default extractor backed by `pdf-extract` and `docx-rs`.
pub struct DocumentTextExtractor;

#[async_trait]
impl TextExtractor for DocumentTextExtractor {
    async fn extract(&self, data: Bytes, format: DocumentFormat) -> Result<String, DocumentError> {
        tokio::task::spawn_blocking(move || extract_text(&data, format)).await?
    }
}

pub fn extract_text(data: &[u8], format: DocumentFormat) -> Result<String, DocumentError> {
    match format {
        DocumentFormat::Pdf => pdf_extract::extract_text_from_mem(data)
            .map_err(|e| DocumentError::Pdf(e.to_string())),
        DocumentFormat::Docx => extract_text_from_docx(data),
        DocumentFormat::PlainText => Ok(String::from_utf8(data.to_vec())?),
    }
}

fn extract_text_from_docx(data: &[u8]) -> Result<String, DocumentError> {
    let docx = docx_rs::read_docx(data).map_err(|e| DocumentError::Docx(e.to_string()))?;

    let mut text = String::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            for paragraph_child in &paragraph.children {
                if let ParagraphChild::Run(run) = paragraph_child {
                    for run_child in &run.children {
                        if let RunChild::Text(t) = run_child {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            text.push('\n');
        }
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Paragraph, Run};
    use std::io::Cursor;

    #[test]
    fn test_format_from_filename() {
        assert_eq!(DocumentFormat::from_filename("cv.pdf"), DocumentFormat::Pdf);
        assert_eq!(DocumentFormat::from_filename("cv.docx"), DocumentFormat::Docx);
        assert_eq!(DocumentFormat::from_filename("cv.txt"), DocumentFormat::PlainText);
        assert_eq!(DocumentFormat::from_filename("cv"), DocumentFormat::PlainText);
    }

    #[test]
    fn test_format_suffix_is_case_sensitive() {
        assert_eq!(DocumentFormat::from_filename("CV.PDF"), DocumentFormat::PlainText);
        assert_eq!(DocumentFormat::from_filename("CV.Docx"), DocumentFormat::PlainText);
    }

    #[test]
    fn test_plain_text_passthrough() {
        let text = extract_text("Jeanne Dupont\nRust, SQL".as_bytes(), DocumentFormat::PlainText)
            .unwrap();
        assert_eq!(text, "Jeanne Dupont\nRust, SQL");
    }

    #[test]
    fn test_plain_text_invalid_utf8_is_error() {
        let result = extract_text(&[0xff, 0xfe, 0x00], DocumentFormat::PlainText);
        assert!(matches!(result, Err(DocumentError::Encoding(_))));
    }

    #[test]
    fn test_garbage_pdf_is_error() {
        let result = extract_text(b"definitely not a pdf", DocumentFormat::Pdf);
        assert!(matches!(result, Err(DocumentError::Pdf(_))));
    }

    #[test]
    fn test_garbage_docx_is_error() {
        let result = extract_text(b"definitely not a zip", DocumentFormat::Docx);
        assert!(matches!(result, Err(DocumentError::Docx(_))));
    }

    #[test]
    fn test_docx_paragraphs_become_lines() {
        let mut buf = Cursor::new(Vec::new());
        Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Jeanne Dupont")))
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Rust, SQL")))
            .build()
            .pack(&mut buf)
            .unwrap();

        let text = extract_text(buf.get_ref(), DocumentFormat::Docx).unwrap();
        assert!(text.contains("Jeanne Dupont\n"));
        assert!(text.contains("Rust, SQL"));
    }

    #[tokio::test]
    async fn test_extractor_runs_on_blocking_pool() {
        let text = DocumentTextExtractor
            .extract(Bytes::from_static(b"hello"), DocumentFormat::PlainText)
            .await
            .unwrap();
        assert_eq!(text, "hello");
    }
}
