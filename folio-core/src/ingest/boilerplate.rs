//! Distributor watermark and advertisement stripping
//!
//! Runs after book metadata is known and before title classification, so a
//! stripped watermark line can never register as a title.

use regex::Regex;

/// Removes distributor watermarks, parameterized by the book name and
/// author once they are known.
pub struct BoilerplateStripper {
    line_patterns: Vec<Regex>,
    inline_patterns: Vec<Regex>,
}

impl BoilerplateStripper {
    pub fn new(book_name: &str, author: &str) -> Self {
        let mut line_patterns = vec![
            // Bare site address on a line of its own
            pattern(
                r"(?i)^\s*(?:https?://)?(?:www\.)?[-a-z0-9]+\.(?:com|net|org|cn|cc|me|info|top|vip)\S*\s*$",
            ),
            // "本书由xx网整理/首发" distribution banners
            pattern(
                r"^\s*(?:本书|本文|本站|电子书)?(?:由|来自|首发于|整理于|下载自|搜集于).{0,30}(?:网|站|论坛|社区|书屋|小说)\S*\s*$",
            ),
            pattern(r"^\s*更多(?:精彩|好书|电子书|全本|最新章节).*$"),
        ];
        let mut inline_patterns = vec![
            // Parenthesized site watermark embedded in a paragraph
            pattern(r"(?i)[（(](?:https?://)?www\.[-a-z0-9.]+\.(?:com|net|org|cn|cc)[^）)\s]*[）)]"),
        ];

        if !book_name.is_empty() {
            let name = regex::escape(book_name);
            let by = if author.is_empty() {
                r"\S{0,24}".to_string()
            } else {
                regex::escape(author)
            };
            // "《book》作者：author" front-matter frame
            line_patterns.push(pattern(&format!(
                r"(?i)^\s*[《【\[]?{name}[》】\]]?\s*(?:作者|author)[:：]?\s*{by}\s*$"
            )));
            // Inline "《book》txt下载" style watermark
            inline_patterns.push(pattern(&format!(
                r"(?i)[《【\[]{name}[》】\]]\s*(?:txt)?(?:下载|全文|完整版)"
            )));
        }

        Self {
            line_patterns,
            inline_patterns,
        }
    }

    /// Whether the entire line is distributor boilerplate
    pub fn is_boilerplate(&self, line: &str) -> bool {
        self.line_patterns.iter().any(|p| p.is_match(line))
    }

    /// Remove inline watermarks, leaving the rest of the line intact
    pub fn clean(&self, line: &str) -> String {
        let mut cleaned = line.to_string();
        for p in &self.inline_patterns {
            if p.is_match(&cleaned) {
                cleaned = p.replace_all(&cleaned, "").into_owned();
            }
        }
        cleaned
    }
}

fn pattern(p: &str) -> Regex {
    Regex::new(p).expect("boilerplate pattern")
}
