//! Per-document identity and detection results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decode::detect::Language;

/// Identity and detection results for one ingested document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentInfo {
    /// Unique identifier for this ingestion
    pub id: Uuid,

    /// Book name resolved from the file base name
    pub book_name: String,

    /// Author resolved from the file base name
    pub author: String,

    /// Encoding label the document was decoded with
    pub encoding: String,

    /// Detected (or overridden) language class
    pub language: Language,

    /// Whether detection ran on a meaningful sample; `false` means the
    /// defaults were used because the sample was empty or too small
    pub detection_confident: bool,

    /// Total size of the source file in bytes
    pub file_size: u64,

    /// When ingestion started
    pub ingested_at: DateTime<Utc>,
}

impl DocumentInfo {
    /// Create info for a new ingestion with detection defaults
    pub fn new(book_name: impl Into<String>, author: impl Into<String>, file_size: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            book_name: book_name.into(),
            author: author.into(),
            encoding: "UTF-8".to_string(),
            language: Language::Western,
            detection_confident: false,
            file_size,
            ingested_at: Utc::now(),
        }
    }
}
