//! Page-break calculation
//!
//! Walks the processed lines accumulating a per-line weight and closes
//! pages when the target is crossed, preferring a nearby title boundary
//! when configured. Re-run over all lines whenever more content streams in;
//! the trailing region of an incomplete document is provisional.

use serde::{Deserialize, Serialize};

use crate::types::{LineRecord, PageBreakTable};

/// Hard bounds the target is clamped into
const MIN_TARGET: u32 = 1;
const MAX_TARGET: u32 = 10_000;

/// Pagination policy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageConfig {
    /// Weight budget per page, roughly "visual lines"
    pub target_lines_per_page: u32,

    /// Prefer closing pages immediately before a nearby title
    pub break_on_title_boundary: bool,

    /// The whole document has been seen; no provisional tail remains
    pub document_complete: bool,

    /// First line of the document (the table's first entry)
    pub start_line: u32,

    /// Estimated characters per wrapped visual line (language-dependent)
    pub wrap_columns: u32,

    /// How many lines back a title boundary may pull a page break
    pub title_lookback: u32,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            target_lines_per_page: 300,
            break_on_title_boundary: true,
            document_complete: true,
            start_line: 0,
            wrap_columns: 80,
            title_lookback: 12,
        }
    }
}

impl PageConfig {
    pub fn with_target(mut self, target: u32) -> Self {
        self.target_lines_per_page = target;
        self
    }

    pub fn with_wrap_columns(mut self, columns: u32) -> Self {
        self.wrap_columns = columns;
        self
    }

    pub fn with_document_complete(mut self, complete: bool) -> Self {
        self.document_complete = complete;
        self
    }
}

/// Estimated visual weight of one line: a single line plus fractional
/// overflow for content longer than the wrap estimate.
fn line_weight(record: &LineRecord, wrap_columns: f64) -> f64 {
    let chars = record.raw_text.trim().chars().count() as f64;
    if chars <= wrap_columns {
        1.0
    } else {
        1.0 + (chars - wrap_columns) / wrap_columns
    }
}

/// Partition the processed lines into pages.
///
/// Guarantees: the table is strictly increasing, its first element is the
/// configured start line, every break is less than the total line count,
/// and every page holds at least one line. A document fitting on one page
/// produces no break beyond the initial boundary.
pub fn calculate(lines: &[LineRecord], config: &PageConfig) -> PageBreakTable {
    let target = config.target_lines_per_page.clamp(MIN_TARGET, MAX_TARGET) as f64;
    let wrap = config.wrap_columns.max(1) as f64;
    let lookback = config.title_lookback as usize;

    let start = (config.start_line as usize).min(lines.len().saturating_sub(1));
    let mut table = PageBreakTable::new(start as u32);
    if lines.is_empty() {
        return table;
    }

    let mut page_start = start;
    let mut weight = 0.0;

    for idx in start..lines.len() {
        weight += line_weight(&lines[idx], wrap);
        if weight < target || idx + 1 >= lines.len() {
            continue;
        }

        let mut break_at = idx + 1;

        if config.break_on_title_boundary {
            if let Some(title_line) = latest_title_in_window(lines, page_start, break_at, lookback)
            {
                break_at = title_line;
            }
        }

        // Never close a page right after a title, or after a title plus
        // only its first paragraph: the break moves before the title.
        if break_at >= 1 && break_at - 1 > page_start && lines[break_at - 1].is_title_boundary() {
            break_at -= 1;
        } else if break_at >= 2
            && break_at - 2 > page_start
            && lines[break_at - 2].is_title_boundary()
        {
            break_at -= 2;
        }

        if break_at > page_start && table.push(break_at as u32) {
            weight = lines[break_at..=idx]
                .iter()
                .map(|l| line_weight(l, wrap))
                .sum();
            page_start = break_at;
        }
    }

    table
}

/// Latest title line within the look-back window that can start the next
/// page while leaving at least one line on the current page.
fn latest_title_in_window(
    lines: &[LineRecord],
    page_start: usize,
    break_at: usize,
    lookback: usize,
) -> Option<usize> {
    let window_start = break_at.saturating_sub(lookback).max(page_start + 1);
    (window_start..=break_at.min(lines.len() - 1))
        .rev()
        .find(|&i| lines[i].is_title_boundary())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LineKind, LineRecord};

    fn paragraph(n: u32) -> LineRecord {
        LineRecord::new(LineKind::Paragraph, n, "短句。", "<p>短句。</p>")
    }

    fn heading(n: u32) -> LineRecord {
        LineRecord::new(LineKind::Heading, n, "第一章", "<h2>第一章</h2>")
    }

    fn doc(total: usize, headings: &[usize]) -> Vec<LineRecord> {
        (0..total)
            .map(|i| {
                if headings.contains(&i) {
                    heading(i as u32)
                } else {
                    paragraph(i as u32)
                }
            })
            .collect()
    }

    #[test]
    fn test_single_page_document_has_only_start_boundary() {
        let lines = doc(5, &[]);
        let table = calculate(&lines, &PageConfig::default());
        assert_eq!(table.starts(), &[0]);
    }

    #[test]
    fn test_breaks_at_threshold_without_titles() {
        let lines = doc(25, &[]);
        let config = PageConfig::default().with_target(10);
        let table = calculate(&lines, &config);
        assert_eq!(table.starts(), &[0, 10, 20]);
    }

    #[test]
    fn test_break_pulled_to_title_boundary() {
        let lines = doc(25, &[8]);
        let config = PageConfig::default().with_target(10);
        let table = calculate(&lines, &config);
        // The natural break after line 9 moves back to the heading at 8.
        assert!(table.starts().contains(&8));
    }

    #[test]
    fn test_title_outside_lookback_is_ignored() {
        let lines = doc(40, &[2]);
        let mut config = PageConfig::default().with_target(20);
        config.title_lookback = 5;
        let table = calculate(&lines, &config);
        assert!(!table.starts().contains(&2));
        assert_eq!(table.starts(), &[0, 20]);
    }

    #[test]
    fn test_never_breaks_right_after_title() {
        // Heading lands exactly at the last line of the page; the break
        // must move before it.
        let lines = doc(30, &[9]);
        let mut config = PageConfig::default().with_target(10);
        config.break_on_title_boundary = false;
        let table = calculate(&lines, &config);
        assert!(table.starts().contains(&9));
        assert!(!table.starts().contains(&10));
    }

    #[test]
    fn test_never_breaks_after_title_and_single_paragraph() {
        let lines = doc(30, &[8]);
        let mut config = PageConfig::default().with_target(10);
        config.break_on_title_boundary = false;
        let table = calculate(&lines, &config);
        assert!(table.starts().contains(&8));
    }

    #[test]
    fn test_long_lines_weigh_more() {
        let long = "很长的一行".repeat(40);
        let lines: Vec<LineRecord> = (0..10)
            .map(|i| LineRecord::new(LineKind::Paragraph, i, long.clone(), String::new()))
            .collect();
        let config = PageConfig::default().with_target(10).with_wrap_columns(40);
        let table = calculate(&lines, &config);
        // Each line carries several visual lines of weight, so the ten
        // lines no longer fit one page.
        assert!(table.page_count() > 1);
    }

    #[test]
    fn test_table_invariants() {
        let lines = doc(100, &[7, 23, 55, 80]);
        let config = PageConfig::default().with_target(9);
        let table = calculate(&lines, &config);

        let starts = table.starts();
        assert_eq!(starts[0], 0);
        assert!(starts.windows(2).all(|w| w[0] < w[1]));
        assert!(*starts.last().unwrap() < 100);
    }

    #[test]
    fn test_degenerate_target_clamped() {
        let lines = doc(6, &[]);
        let config = PageConfig::default().with_target(0);
        let table = calculate(&lines, &config);
        // Clamped to one line per page, and every page holds ≥ 1 line.
        assert_eq!(table.starts(), &[0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_start_offset_respected() {
        let lines = doc(30, &[]);
        let mut config = PageConfig::default().with_target(10);
        config.start_line = 3;
        let table = calculate(&lines, &config);
        assert_eq!(table.starts()[0], 3);
        assert!(table.starts().windows(2).all(|w| w[0] < w[1]));
    }
}
