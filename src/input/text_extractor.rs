//! Text extraction from candidate documents

use crate::error::{Result, ResumeRankerError};
use crate::processing::results::CandidateId;
use pulldown_cmark::{Event, Parser, Tag};
use std::future::Future;
use std::path::Path;
use tokio::fs;

/// Resolves a candidate handle to its raw text.
///
/// Every failure is reported as an error for that candidate only; the engine
/// keeps going with the rest of the batch.
pub trait DocumentExtractor: Send + Sync + 'static {
    fn extract(&self, id: &CandidateId) -> impl Future<Output = Result<String>> + Send;
}

/// Format-specific extraction from a file on disk
pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await.map_err(|e| {
            ResumeRankerError::Extraction(format!("Failed to read '{}': {}", path.display(), e))
        })?;

        let display = path.display().to_string();
        // pdf-extract is CPU bound and may panic on malformed input
        tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| {
                ResumeRankerError::Extraction(format!("PDF parser crashed on '{}': {}", display, e))
            })?
            .map_err(|e| {
                ResumeRankerError::Extraction(format!("Failed to extract text from PDF '{}': {}", display, e))
            })
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).await.map_err(|e| {
            ResumeRankerError::Extraction(format!("Failed to read '{}': {}", path.display(), e))
        })
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await.map_err(|e| {
            ResumeRankerError::Extraction(format!("Failed to read '{}': {}", path.display(), e))
        })?;

        Ok(markdown_to_text(&markdown_content))
    }
}

/// Keep the readable text of a markdown document, dropping markup and raw HTML
pub fn markdown_to_text(markdown: &str) -> String {
    let mut text = String::new();

    for event in Parser::new(markdown) {
        match event {
            Event::Text(content) | Event::Code(content) => text.push_str(&content),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            Event::End(Tag::Paragraph | Tag::Heading(..) | Tag::Item | Tag::CodeBlock(_)) => {
                text.push('\n')
            }
            _ => {}
        }
    }

    text
}
