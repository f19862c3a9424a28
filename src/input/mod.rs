//! Input processing module
//! Handles file detection, text extraction, and candidate discovery

pub mod file_detector;
pub mod manager;
pub mod text_extractor;

pub use manager::{collect_candidates, InputManager};
pub use text_extractor::DocumentExtractor;
