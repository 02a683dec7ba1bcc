//! Byte-to-text decoding seam
//!
//! The provider resolves encoding labels to decoders and is the only
//! resource shared across concurrently ingested documents. Its cache is
//! read-only after construction, so no locking is needed; each document owns
//! its own [`TextDecoder`], which carries incomplete trailing code units
//! across chunk boundaries.

pub mod detect;

use crate::error::DecodeError;
use encoding_rs::{DecoderResult, Encoding};
use std::collections::HashMap;

/// Resolves an encoding label to a fresh streaming decoder
pub trait DecoderProvider: Send + Sync {
    /// Create a decoder for the given label, or fail for unknown labels
    fn decoder(&self, label: &str) -> Result<TextDecoder, DecodeError>;
}

/// Default provider with a prebuilt label cache.
///
/// Labels outside the cache fall back to the WHATWG label registry, so any
/// label `encoding_rs` understands works.
pub struct CachingDecoderProvider {
    cache: HashMap<&'static str, &'static Encoding>,
}

impl CachingDecoderProvider {
    pub fn new() -> Self {
        let mut cache = HashMap::new();
        for encoding in [
            encoding_rs::UTF_8,
            encoding_rs::UTF_16LE,
            encoding_rs::UTF_16BE,
            encoding_rs::GBK,
            encoding_rs::GB18030,
            encoding_rs::BIG5,
            encoding_rs::SHIFT_JIS,
            encoding_rs::EUC_KR,
            encoding_rs::WINDOWS_1252,
        ] {
            cache.insert(encoding.name(), encoding);
        }
        Self { cache }
    }
}

impl Default for CachingDecoderProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DecoderProvider for CachingDecoderProvider {
    fn decoder(&self, label: &str) -> Result<TextDecoder, DecodeError> {
        let encoding = self
            .cache
            .get(label)
            .copied()
            .or_else(|| Encoding::for_label(label.as_bytes()))
            .ok_or_else(|| DecodeError::UnknownEncoding(label.to_string()))?;
        Ok(TextDecoder::new(encoding))
    }
}

/// Streaming decoder for one document.
///
/// Chunks may end in the middle of a multi-byte sequence; the incomplete
/// tail is held internally and completed by the next chunk. Malformed input
/// is fatal and reported with the absolute byte offset.
pub struct TextDecoder {
    inner: encoding_rs::Decoder,
    encoding: &'static Encoding,
    consumed: u64,
}

impl TextDecoder {
    pub fn new(encoding: &'static Encoding) -> Self {
        // BOM removal only: a BOM never silently switches the encoding the
        // caller or the detector settled on.
        Self {
            inner: encoding.new_decoder_with_bom_removal(),
            encoding,
            consumed: 0,
        }
    }

    /// Canonical name of the underlying encoding
    pub fn encoding_name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Decode one chunk. `last` flushes the carried state and rejects a
    /// dangling incomplete sequence at end of input.
    pub fn decode(&mut self, bytes: &[u8], last: bool) -> Result<String, DecodeError> {
        let capacity = self
            .inner
            .max_utf8_buffer_length_without_replacement(bytes.len())
            .unwrap_or(bytes.len() * 3 + 4);
        let mut out = String::with_capacity(capacity);
        let mut read_total = 0;

        loop {
            let (result, read) = self.inner.decode_to_string_without_replacement(
                &bytes[read_total..],
                &mut out,
                last,
            );
            read_total += read;
            match result {
                DecoderResult::InputEmpty => break,
                DecoderResult::OutputFull => {
                    out.reserve(bytes.len().max(16));
                }
                DecoderResult::Malformed(_, _) => {
                    return Err(DecodeError::MalformedBytes {
                        encoding: self.encoding.name().to_string(),
                        offset: self.consumed + read_total as u64,
                    });
                }
            }
        }

        self.consumed += bytes.len() as u64;
        Ok(out)
    }
}
