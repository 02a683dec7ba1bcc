//! Chunked ingestion pipeline
//!
//! The orchestrator is the only entry point callers need: it owns the
//! per-document [`ProcessingState`] and sequences decoding, detection, line
//! processing, and pagination across one or many chunks.

mod boilerplate;
mod line;
mod orchestrator;
mod state;

pub use boilerplate::BoilerplateStripper;
pub use line::{LineContext, LineProcessor};
pub use orchestrator::{ChunkOptions, ChunkOrchestrator, ChunkOutput, IngestStats};
pub use state::{FootnoteRegistry, ProcessingState};

use serde::{Deserialize, Serialize};

use crate::decode::detect::Language;

/// Pipeline stage reported through progress signals
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Detecting,
    Processing,
    Paginating,
    Complete,
}

/// Fire-and-forget progress signals; emitted at a bounded frequency, never
/// per line.
pub trait ProgressSink: Send {
    fn on_progress(&mut self, stage: Stage, processed_lines: u64, total_lines: u64);
}

/// Sink that discards all signals
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn on_progress(&mut self, _stage: Stage, _processed_lines: u64, _total_lines: u64) {}
}

/// Resolves book name and author from a file base name; pure, called once
/// per document before boilerplate stripping.
pub trait BookMetadataProvider: Send + Sync {
    fn book_name_and_author(&self, file_base_name: &str) -> (String, String);
}

/// Splits `name - author`, `《name》author`, and `name【author】` file names;
/// anything else is all name, no author.
pub struct FileNameMetadataProvider;

impl BookMetadataProvider for FileNameMetadataProvider {
    fn book_name_and_author(&self, file_base_name: &str) -> (String, String) {
        let base = file_base_name.trim();

        if let Some((name, author)) = base.split_once(" - ") {
            return (name.trim().to_string(), author.trim().to_string());
        }
        if let Some(stripped) = base.strip_prefix('《') {
            if let Some((name, author)) = stripped.split_once('》') {
                return (name.trim().to_string(), trim_author(author));
            }
        }
        if let Some((name, rest)) = base.split_once('【') {
            if let Some((author, _)) = rest.split_once('】') {
                return (name.trim().to_string(), author.trim().to_string());
            }
        }

        (base.to_string(), String::new())
    }
}

fn trim_author(author: &str) -> String {
    author
        .trim()
        .trim_start_matches("作者")
        .trim_start_matches([':', '：'])
        .trim()
        .to_string()
}

/// Ingestion configuration surface
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngestConfig {
    /// Weight budget per page
    pub target_lines_per_page: u32,

    /// Prefer closing pages at title boundaries
    pub break_on_title_boundary: bool,

    /// Suggested size of the first chunk the host should deliver
    pub initial_chunk_size_bytes: usize,

    /// How many leading lines feed pattern detection
    pub sample_lines_for_pattern_detection: usize,

    /// Skip language detection and force a language class
    pub language_override: Option<Language>,

    /// Skip encoding detection and force an encoding label
    pub encoding_override: Option<String>,

    /// Wrap estimate for Western documents, in characters
    pub wrap_columns_western: u32,

    /// Wrap estimate for Eastern documents, in characters
    pub wrap_columns_eastern: u32,

    /// How many lines back a title boundary may pull a page break
    pub title_break_lookback: u32,

    /// First line of the document (page one starts here)
    pub start_line: u32,

    /// Emit a progress signal at most once per this many lines
    pub progress_line_interval: u32,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            target_lines_per_page: 300,
            break_on_title_boundary: true,
            initial_chunk_size_bytes: 64 * 1024,
            sample_lines_for_pattern_detection: 200,
            language_override: None,
            encoding_override: None,
            wrap_columns_western: 80,
            wrap_columns_eastern: 40,
            title_break_lookback: 12,
            start_line: 0,
            progress_line_interval: 256,
        }
    }
}

impl IngestConfig {
    pub fn with_target_lines_per_page(mut self, target: u32) -> Self {
        self.target_lines_per_page = target;
        self
    }

    pub fn with_break_on_title_boundary(mut self, enabled: bool) -> Self {
        self.break_on_title_boundary = enabled;
        self
    }

    pub fn with_language_override(mut self, language: Language) -> Self {
        self.language_override = Some(language);
        self
    }

    pub fn with_encoding_override(mut self, label: impl Into<String>) -> Self {
        self.encoding_override = Some(label.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_metadata_variants() {
        let provider = FileNameMetadataProvider;
        assert_eq!(
            provider.book_name_and_author("长夜 - 佚名"),
            ("长夜".to_string(), "佚名".to_string())
        );
        assert_eq!(
            provider.book_name_and_author("《长夜》作者：佚名"),
            ("长夜".to_string(), "佚名".to_string())
        );
        assert_eq!(
            provider.book_name_and_author("长夜【佚名】"),
            ("长夜".to_string(), "佚名".to_string())
        );
        assert_eq!(
            provider.book_name_and_author("plain_name"),
            ("plain_name".to_string(), String::new())
        );
    }
}
