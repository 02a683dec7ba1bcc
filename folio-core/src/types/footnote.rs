//! Extracted footnote entries

use serde::{Deserialize, Serialize};

/// A footnote body extracted from the text.
///
/// Ordered by first discovery; `ordinal` is unique per document and is the
/// stable identity that in-text anchors reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FootnoteEntry {
    /// Assignment order, starting at 0
    pub ordinal: u32,

    /// Body text with the leading marker glyph removed
    pub body: String,

    /// Anchor identifier derived from the ordinal
    pub anchor_id: String,
}

impl FootnoteEntry {
    /// Create an entry; the anchor id is derived from the ordinal
    pub fn new(ordinal: u32, body: impl Into<String>) -> Self {
        Self {
            ordinal,
            body: body.into(),
            anchor_id: format!("note-{}", ordinal),
        }
    }

    /// Anchor id of the in-text reference pointing at this footnote
    pub fn ref_anchor_id(&self) -> String {
        format!("note-ref-{}", self.ordinal)
    }
}
