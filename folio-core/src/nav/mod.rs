//! Title index and reading progress
//!
//! The index maps line numbers to positions in the title sequence and
//! answers "which title is active at this line" by binary search. Progress
//! weights the position inside the current page by that page's share of the
//! whole document.

use serde::{Deserialize, Serialize};

use crate::types::{PageBreakTable, TitleEntry};

/// Searchable index over the detected titles
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TitleIndex {
    line_numbers: Vec<u32>,
}

impl TitleIndex {
    /// Build the index in one pass; titles arrive ordered by line number
    pub fn build(titles: &[TitleEntry]) -> Self {
        Self {
            line_numbers: titles.iter().map(|t| t.line_number).collect(),
        }
    }

    /// Line number of the greatest title at or before the given line, or
    /// `None` when the line precedes every title.
    pub fn query_active_title(&self, line_number: u32) -> Option<u32> {
        match self.line_numbers.binary_search(&line_number) {
            Ok(idx) => Some(self.line_numbers[idx]),
            Err(0) => None,
            Err(idx) => Some(self.line_numbers[idx - 1]),
        }
    }

    /// Ordinal position of a title line within the title sequence
    pub fn ordinal_of(&self, title_line: u32) -> Option<usize> {
        self.line_numbers.binary_search(&title_line).ok()
    }

    pub fn len(&self) -> usize {
        self.line_numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.line_numbers.is_empty()
    }
}

/// Reading progress in `[0, 100]`.
///
/// `current_page` is the one-based page ordinal the reader is on and
/// `current_line` the first visible line. Exactly 0 at the document's
/// absolute start and exactly 100 at the final line of the final page.
pub fn reading_progress(
    current_line: u32,
    page_breaks: &PageBreakTable,
    current_page: usize,
    total_lines: u32,
) -> f64 {
    let starts = page_breaks.starts();
    let Some(&doc_start) = starts.first() else {
        return 0.0;
    };
    let total = total_lines.saturating_sub(doc_start) as f64;
    if total <= 0.0 {
        return 0.0;
    }

    // Absolute start: first page, zero scroll.
    if current_page <= 1 && current_line <= doc_start {
        return 0.0;
    }

    let Some((page_start, page_end)) = page_breaks.page_span(current_page, total_lines) else {
        return 100.0;
    };

    // Final line of the final page reads as fully finished.
    if current_page == page_breaks.page_count() && current_line + 1 >= total_lines {
        return 100.0;
    }

    let page_len = page_end.saturating_sub(page_start).max(1) as f64;
    let within = (current_line.saturating_sub(page_start) as f64 + 1.0).min(page_len) / page_len;
    let preceding = page_start.saturating_sub(doc_start) as f64;

    let fraction = (preceding / total) + within * (page_len / total);
    (fraction * 100.0).clamp(0.0, 100.0)
}
