//! Per-document mutable processing state
//!
//! Every flag that would otherwise be ambient lives here as an explicit
//! field. One orchestrator exclusively owns one state value; nothing is
//! shared across documents, and abandoning ingestion just drops the value.

use std::collections::{HashMap, HashSet};

use crate::decode::TextDecoder;
use crate::ingest::boilerplate::BoilerplateStripper;
use crate::titles::TitleRuleSet;
use crate::types::{DocumentInfo, FootnoteEntry, LineRecord, TitleEntry};

/// Stable footnote identity across body lines and in-text references.
///
/// Ordinals are assigned at first appearance, whether that appearance is a
/// body line or an in-text marker. A glyph reused for a second body gets a
/// fresh ordinal, so ordinals stay unique per document.
#[derive(Debug, Default)]
pub struct FootnoteRegistry {
    glyph_ordinals: HashMap<char, u32>,
    bodied: HashSet<u32>,
    entries: Vec<FootnoteEntry>,
    next_ordinal: u32,
}

impl FootnoteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ordinal for an in-text marker, assigning the next one on first sight
    pub fn resolve(&mut self, glyph: char) -> u32 {
        if let Some(&ordinal) = self.glyph_ordinals.get(&glyph) {
            return ordinal;
        }
        let ordinal = self.next_ordinal;
        self.next_ordinal += 1;
        self.glyph_ordinals.insert(glyph, ordinal);
        ordinal
    }

    /// Record a footnote body line and return its ordinal
    pub fn record_body(&mut self, glyph: char, body: &str) -> u32 {
        let ordinal = match self.glyph_ordinals.get(&glyph) {
            Some(&o) if !self.bodied.contains(&o) => o,
            _ => {
                let o = self.next_ordinal;
                self.next_ordinal += 1;
                self.glyph_ordinals.insert(glyph, o);
                o
            }
        };
        self.bodied.insert(ordinal);
        self.entries.push(FootnoteEntry::new(ordinal, body));
        ordinal
    }

    pub fn entries(&self) -> &[FootnoteEntry] {
        &self.entries
    }
}

/// All mutable state for one document's ingestion
pub struct ProcessingState {
    /// Identity and detection results
    pub info: DocumentInfo,

    pub(crate) decoder: Option<TextDecoder>,
    pub(crate) rules: TitleRuleSet,
    pub(crate) stripper: BoilerplateStripper,
    pub(crate) footnotes: FootnoteRegistry,

    /// Pattern detection has run (it runs at most once per document)
    pub(crate) pattern_detected: bool,

    pub(crate) next_line_number: u32,
    pub(crate) drop_cap_pending: bool,
    pub(crate) first_title_seen: bool,

    /// Undecoded tail of the previous chunk: the deferred final line(s)
    pub(crate) carry_text: String,

    pub(crate) lines: Vec<LineRecord>,
    pub(crate) titles: Vec<TitleEntry>,

    pub(crate) bytes_seen: u64,

    /// Pagination covers the complete document (no provisional tail)
    pub(crate) pagination_final: bool,
}

impl ProcessingState {
    pub(crate) fn new(info: DocumentInfo, stripper: BoilerplateStripper) -> Self {
        Self {
            info,
            decoder: None,
            rules: TitleRuleSet::builtin(),
            stripper,
            footnotes: FootnoteRegistry::new(),
            pattern_detected: false,
            next_line_number: 0,
            drop_cap_pending: false,
            first_title_seen: false,
            carry_text: String::new(),
            lines: Vec::new(),
            titles: Vec::new(),
            bytes_seen: 0,
            pagination_final: false,
        }
    }

    /// All line records processed so far
    pub fn lines(&self) -> &[LineRecord] {
        &self.lines
    }

    /// All titles detected so far
    pub fn titles(&self) -> &[TitleEntry] {
        &self.titles
    }

    /// All footnote bodies discovered so far
    pub fn footnote_entries(&self) -> &[FootnoteEntry] {
        self.footnotes.entries()
    }

    /// Whether pagination still has a provisional trailing region
    pub fn pagination_is_final(&self) -> bool {
        self.pagination_final
    }
}
