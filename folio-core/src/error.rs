//! Error types for Folio Core

use thiserror::Error;

/// Result type alias using FolioError
pub type Result<T> = std::result::Result<T, FolioError>;

/// Top-level error type for all Folio operations
#[derive(Debug, Error)]
pub enum FolioError {
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Ingestion has not been initialized")]
    NotInitialized,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that occur while turning raw bytes into text.
///
/// Decode failures are fatal for the current chunk and surface unmodified to
/// the caller; retrying with corrected hints is the caller's responsibility.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Unknown encoding label: {0}")]
    UnknownEncoding(String),

    #[error("Malformed byte sequence for {encoding} at byte offset {offset}")]
    MalformedBytes { encoding: String, offset: u64 },
}
