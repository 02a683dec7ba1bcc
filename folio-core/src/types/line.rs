//! Line-level records emitted by the line processor

use serde::{Deserialize, Serialize};

/// Classification of a processed line
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// The document's own title line
    Title,

    /// A chapter or section heading
    Heading,

    /// Body text
    Paragraph,

    /// Blank line, or a line consumed by footnote/boilerplate extraction
    Empty,
}

/// One processed line of the document.
///
/// Immutable once produced; `line_number` is strictly increasing across the
/// whole document regardless of how the input was chunked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineRecord {
    /// Line classification
    pub kind: LineKind,

    /// The raw decoded text, before any markup
    pub raw_text: String,

    /// Rendered HTML markup for this line
    pub markup: String,

    /// Zero-based ordinal of the line within the document
    pub line_number: u32,

    /// Ordinals of footnotes referenced from within this line
    pub footnote_refs: Vec<u32>,
}

impl LineRecord {
    /// Create a record with the given classification and markup
    pub fn new(
        kind: LineKind,
        line_number: u32,
        raw_text: impl Into<String>,
        markup: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            raw_text: raw_text.into(),
            markup: markup.into(),
            line_number,
            footnote_refs: Vec::new(),
        }
    }

    /// Create an empty record (blank or extracted line)
    pub fn empty(line_number: u32, raw_text: impl Into<String>) -> Self {
        Self::new(LineKind::Empty, line_number, raw_text, String::new())
    }

    /// Attach footnote references
    pub fn with_footnote_refs(mut self, refs: Vec<u32>) -> Self {
        self.footnote_refs = refs;
        self
    }

    /// The anchor identifier derived from the line's ordinal
    pub fn anchor_id(&self) -> String {
        format!("line-{}", self.line_number)
    }

    /// Whether this line is a title or heading boundary
    pub fn is_title_boundary(&self) -> bool {
        matches!(self.kind, LineKind::Title | LineKind::Heading)
    }
}
