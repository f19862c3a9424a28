//! Input manager: routes candidate files to the right extractor

use crate::error::{Result, ResumeRankerError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{
    DocumentExtractor, MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor,
};
use crate::processing::results::CandidateId;
use log::debug;
use std::path::{Path, PathBuf};

/// File-backed extractor. Holds no state, so repeated passes always re-read
/// the documents from disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct InputManager;

impl InputManager {
    pub fn new() -> Self {
        Self
    }

    pub async fn extract_text(&self, path: &Path) -> Result<String> {
        if !path.is_file() {
            return Err(ResumeRankerError::Extraction(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        match FileType::from_path(path) {
            FileType::Pdf => {
                debug!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await
            }
            FileType::Text => {
                debug!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await
            }
            FileType::Markdown => {
                debug!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await
            }
            FileType::Unknown => Err(ResumeRankerError::UnsupportedFormat(format!(
                "Unsupported file type for: {}",
                path.display()
            ))),
        }
    }
}

impl DocumentExtractor for InputManager {
    async fn extract(&self, id: &CandidateId) -> Result<String> {
        self.extract_text(Path::new(id.as_str())).await
    }
}

/// Expand the paths given on the command line into candidate handles.
///
/// Files are kept in the order given, even unsupported or missing ones, so
/// they surface as failed entries instead of vanishing. Directories contribute
/// their supported files sorted by name.
pub fn collect_candidates(paths: &[PathBuf]) -> Result<Vec<CandidateId>> {
    let mut candidates = Vec::new();

    for path in paths {
        if path.is_dir() {
            let mut files: Vec<PathBuf> = std::fs::read_dir(path)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && FileType::from_path(p).is_supported())
                .collect();
            files.sort();

            debug!("Found {} candidate files in {}", files.len(), path.display());
            candidates.extend(files.iter().map(|p| CandidateId::from(p.as_path())));
        } else {
            candidates.push(CandidateId::from(path.as_path()));
        }
    }

    Ok(candidates)
}
