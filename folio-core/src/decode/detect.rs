//! Language and encoding detection over a bounded sample
//!
//! Detection never fails: an empty or unreadable sample falls back to
//! UTF-8/Western with the confidence flag cleared.

use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};

/// Coarse language class driving wrap estimates and drop-cap behavior
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    /// CJK scripts: no drop caps, narrower wrap estimate
    Eastern,

    /// Everything else
    Western,
}

impl Language {
    pub fn is_eastern(self) -> bool {
        matches!(self, Language::Eastern)
    }
}

/// Outcome of sample analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleProfile {
    pub encoding: &'static Encoding,
    pub language: Language,
    pub confident: bool,
}

/// Whether a codepoint belongs to the CJK/Kana/Hangul blocks
pub fn is_eastern_char(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}'     // CJK Unified Ideographs
        | '\u{3400}'..='\u{4DBF}'   // CJK Extension A
        | '\u{F900}'..='\u{FAFF}'   // CJK Compatibility Ideographs
        | '\u{3040}'..='\u{30FF}'   // Hiragana + Katakana
        | '\u{AC00}'..='\u{D7AF}'   // Hangul Syllables
        | '\u{3000}'..='\u{303F}'   // CJK Symbols and Punctuation
    )
}

/// Classify a text sample as Eastern or Western.
///
/// Returns the language and whether the sample was meaningful.
pub fn detect_language(sample: &str) -> (Language, bool) {
    let trimmed = sample.trim();
    if trimmed.is_empty() {
        return (Language::Western, false);
    }
    if trimmed.chars().any(is_eastern_char) {
        (Language::Eastern, true)
    } else {
        (Language::Western, true)
    }
}

/// Guess the encoding of a raw byte sample.
///
/// Ladder: BOM sniff, then strict UTF-8 validation (tolerating a truncated
/// final sequence at the sample edge), then GB18030 if it decodes cleanly,
/// then windows-1252 as the last resort. Only the BOM and clean-UTF-8 paths
/// are confident.
pub fn sniff_encoding(sample: &[u8]) -> (&'static Encoding, bool) {
    if sample.is_empty() {
        return (encoding_rs::UTF_8, false);
    }

    if let Some((encoding, _bom_len)) = Encoding::for_bom(sample) {
        return (encoding, true);
    }

    match std::str::from_utf8(sample) {
        Ok(_) => return (encoding_rs::UTF_8, true),
        Err(e) => {
            // A clean prefix with an incomplete tail is still UTF-8: the
            // sample just cut a multi-byte sequence short.
            if e.error_len().is_none() {
                return (encoding_rs::UTF_8, true);
            }
        }
    }

    let (_, _, malformed) = encoding_rs::GB18030.decode(sample);
    if !malformed {
        return (encoding_rs::GB18030, false);
    }

    (encoding_rs::WINDOWS_1252, false)
}

/// Full sample analysis: encoding guess plus language class.
///
/// The decoded text used for language classification comes from the guessed
/// encoding, so a GBK sample still registers as Eastern.
pub fn profile_sample(sample: &[u8]) -> SampleProfile {
    let (encoding, encoding_confident) = sniff_encoding(sample);
    let (text, _, _) = encoding.decode(sample);
    let (language, language_confident) = detect_language(&text);
    SampleProfile {
        encoding,
        language,
        confident: encoding_confident && language_confident,
    }
}
