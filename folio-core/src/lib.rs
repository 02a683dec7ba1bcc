//! Folio Core Library
//!
//! This crate provides the chunked ingestion and pagination engine for the
//! Folio reading system. A raw plain-text file arrives as ordered byte
//! chunks and is incrementally built into a document model: classified
//! lines, detected chapter titles, extracted footnotes, and page-break
//! boundaries, consumable by any rendering layer.

pub mod decode;
pub mod error;
pub mod ingest;
pub mod nav;
pub mod paginate;
pub mod titles;
pub mod types;

pub use decode::detect::Language;
pub use error::{DecodeError, FolioError, Result};
pub use ingest::{
    BookMetadataProvider, ChunkOptions, ChunkOrchestrator, ChunkOutput, IngestConfig, IngestStats,
    ProcessingState, ProgressSink, Stage,
};
pub use nav::{reading_progress, TitleIndex};
pub use types::{
    DocumentInfo, FootnoteEntry, LineKind, LineRecord, PageBreakTable, TitleEntry,
};
