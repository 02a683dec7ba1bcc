//! Detected title entries

use serde::{Deserialize, Serialize};

/// A detected chapter/section title.
///
/// Entries are ordered by `line_number`, which is unique and always refers
/// to an existing line record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TitleEntry {
    /// Display text, with structural punctuation already stripped
    pub display_text: String,

    /// Line the title was detected on
    pub line_number: u32,

    /// Minimal human-meaningful fragment of the title
    pub shortest_text: String,

    /// Whether the per-document learned pattern produced this entry
    pub from_learned_pattern: bool,
}

impl TitleEntry {
    /// Create a new entry; the shortest form defaults to the display text
    pub fn new(display_text: impl Into<String>, line_number: u32) -> Self {
        let display_text = display_text.into();
        let shortest_text = display_text.clone();
        Self {
            display_text,
            line_number,
            shortest_text,
            from_learned_pattern: false,
        }
    }

    /// Set the reduced shortest form
    pub fn with_shortest(mut self, shortest: impl Into<String>) -> Self {
        self.shortest_text = shortest.into();
        self
    }

    /// Mark the entry as produced by the learned pattern
    pub fn with_learned(mut self, learned: bool) -> Self {
        self.from_learned_pattern = learned;
        self
    }
}
