//! Page-break table

use serde::{Deserialize, Serialize};

/// Strictly increasing sequence of line numbers marking page starts.
///
/// The first element is the document's starting offset; every later element
/// is the first line of a new page and is always less than the total line
/// count.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PageBreakTable {
    starts: Vec<u32>,
}

impl PageBreakTable {
    /// Create a table with the document's starting offset as its first entry
    pub fn new(start_line: u32) -> Self {
        Self {
            starts: vec![start_line],
        }
    }

    /// Append a page start; rejects entries that would break the strictly
    /// increasing invariant and reports whether the entry was accepted.
    pub fn push(&mut self, line_number: u32) -> bool {
        match self.starts.last() {
            Some(&last) if line_number <= last => false,
            _ => {
                self.starts.push(line_number);
                true
            }
        }
    }

    /// The page-start line numbers
    pub fn starts(&self) -> &[u32] {
        &self.starts
    }

    /// Number of pages
    pub fn page_count(&self) -> usize {
        self.starts.len()
    }

    /// One-based page ordinal containing the given line, or `None` when the
    /// line precedes the document's starting offset.
    pub fn page_of_line(&self, line_number: u32) -> Option<usize> {
        match self.starts.binary_search(&line_number) {
            Ok(idx) => Some(idx + 1),
            Err(0) => None,
            Err(idx) => Some(idx),
        }
    }

    /// Half-open line span `[start, end)` of a one-based page ordinal
    pub fn page_span(&self, page: usize, total_lines: u32) -> Option<(u32, u32)> {
        if page == 0 || page > self.starts.len() {
            return None;
        }
        let start = self.starts[page - 1];
        let end = self
            .starts
            .get(page)
            .copied()
            .unwrap_or(total_lines.max(start));
        Some((start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_enforces_strictly_increasing() {
        let mut table = PageBreakTable::new(0);
        assert!(table.push(10));
        assert!(!table.push(10));
        assert!(!table.push(5));
        assert!(table.push(11));
        assert_eq!(table.starts(), &[0, 10, 11]);
    }

    #[test]
    fn test_page_of_line() {
        let mut table = PageBreakTable::new(0);
        table.push(10);
        table.push(25);

        assert_eq!(table.page_of_line(0), Some(1));
        assert_eq!(table.page_of_line(9), Some(1));
        assert_eq!(table.page_of_line(10), Some(2));
        assert_eq!(table.page_of_line(24), Some(2));
        assert_eq!(table.page_of_line(25), Some(3));
        assert_eq!(table.page_of_line(400), Some(3));
    }

    #[test]
    fn test_page_of_line_before_start_offset() {
        let table = PageBreakTable::new(5);
        assert_eq!(table.page_of_line(3), None);
        assert_eq!(table.page_of_line(5), Some(1));
    }

    #[test]
    fn test_page_span() {
        let mut table = PageBreakTable::new(0);
        table.push(10);

        assert_eq!(table.page_span(1, 30), Some((0, 10)));
        assert_eq!(table.page_span(2, 30), Some((10, 30)));
        assert_eq!(table.page_span(3, 30), None);
        assert_eq!(table.page_span(0, 30), None);
    }
}
