//! Static bilingual title rules and the line classifier
//!
//! Rules are an ordered list of tagged variants evaluated by priority. Each
//! rule owns its compiled regex; rule sets are immutable and merging the
//! per-document learned rule produces a new set.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Lines longer than this are never titles
pub(crate) const MAX_TITLE_CHARS: usize = 64;

/// Tag identifying which family of rule matched
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// 第N章/卷/回-style numeric structural markers
    NumericVolume,

    /// Curated bilingual section keywords (preface, afterword, 序章, ...)
    NamedSection,

    /// English chapter/part/appendix keywords
    EnglishKeyword,

    /// The per-document learned pattern
    Learned,
}

/// One classification rule
#[derive(Debug, Clone)]
pub struct TitleRule {
    kind: RuleKind,
    priority: u8,
    numeric_only: bool,
    pattern: Regex,
}

impl TitleRule {
    /// Compile a rule. The pattern must expose a `m` (structural marker)
    /// capture and may expose a `c` (content) capture.
    pub fn new(kind: RuleKind, priority: u8, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            kind,
            priority,
            numeric_only: false,
            pattern: Regex::new(pattern)?,
        })
    }

    /// Compile a learned rule; learned rules run before the static set
    pub fn learned(pattern: &str) -> Result<Self, regex::Error> {
        Self::new(RuleKind::Learned, 5, pattern)
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    fn numeric_only(mut self, numeric_only: bool) -> Self {
        self.numeric_only = numeric_only;
        self
    }

    fn try_match(&self, line: &str) -> Option<TitleMatch> {
        let caps = self.pattern.captures(line)?;
        let marker = caps.name("m").map(|m| m.as_str()).unwrap_or_default();
        let content = caps
            .name("c")
            .map(|c| c.as_str().trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        let literal_len = if self.numeric_only {
            0
        } else {
            marker
                .chars()
                .filter(|c| !is_numeral_char(*c) && !c.is_whitespace())
                .count()
        };
        Some(TitleMatch {
            display: line.trim().to_string(),
            content,
            kind: self.kind,
            literal_len,
            numeric_only: self.numeric_only,
        })
    }
}

/// Successful classification of a line as a title
#[derive(Debug, Clone, PartialEq)]
pub struct TitleMatch {
    /// Full trimmed title text
    pub display: String,

    /// Text after the structural marker, when any remains
    pub content: Option<String>,

    /// Which rule family matched
    pub kind: RuleKind,

    /// Literal (non-numeral, non-whitespace) characters the marker consumed
    pub literal_len: usize,

    /// Ambiguous numeral-only line; requires a following prose line to be
    /// confirmed as a title
    pub numeric_only: bool,
}

impl TitleMatch {
    pub fn is_learned(&self) -> bool {
        self.kind == RuleKind::Learned
    }
}

/// An ordered, immutable set of title rules
#[derive(Debug, Clone)]
pub struct TitleRuleSet {
    rules: Vec<TitleRule>,
}

impl TitleRuleSet {
    /// The static bilingual rule set
    pub fn builtin() -> Self {
        let rules = vec![
            rule(
                RuleKind::NumericVolume,
                10,
                r"^\s*(?P<m>第\s*[0-9０-９一二三四五六七八九十百千万零〇两]{1,12}\s*[卷章回节部篇集幕话讲])\s*[:：.、，\-—]*\s*(?P<c>.*)$",
            ),
            rule(
                RuleKind::NumericVolume,
                15,
                r"^\s*(?P<m>[0-9０-９一二三四五六七八九十百千]{1,8}[、.．:：])\s*(?P<c>\S.*)$",
            ),
            rule(
                RuleKind::NamedSection,
                20,
                &format!(
                    r"(?i)^\s*(?P<m>{})(?:\s*[:：.、\-—]\s*|\s+|\s*$)(?P<c>.*)$",
                    NAMED_SECTIONS.join("|")
                ),
            ),
            rule(
                RuleKind::EnglishKeyword,
                30,
                r"(?i)^\s*(?P<m>(?:chapter|part|book|section|volume|act|canto)\s+(?:[0-9]{1,4}|[ivxlcdm]{1,8}|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve|thirteen|fourteen|fifteen|sixteen|seventeen|eighteen|nineteen|twenty))\b\s*[:.、\-—]*\s*(?P<c>.*)$",
            ),
            rule(
                RuleKind::NumericVolume,
                40,
                r"^\s*(?P<m>[0-9０-９一二三四五六七八九十百千]{1,8}[、.．]?)\s*$",
            )
            .numeric_only(true),
        ];
        Self { rules }
    }

    /// Merge the learned rule into a new set, keeping priority order.
    /// An existing learned rule is replaced, so merging is idempotent.
    pub fn with_learned(&self, learned: TitleRule) -> Self {
        let mut rules: Vec<TitleRule> = self
            .rules
            .iter()
            .filter(|r| r.kind != RuleKind::Learned)
            .cloned()
            .collect();
        rules.push(learned);
        rules.sort_by_key(|r| r.priority);
        Self { rules }
    }

    pub fn has_learned(&self) -> bool {
        self.rules.iter().any(|r| r.kind == RuleKind::Learned)
    }

    /// Classify a line. Rules consuming more literal characters win over
    /// purely numeric/generic matches; ties keep the higher-priority rule.
    pub fn classify(&self, line: &str) -> Option<TitleMatch> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.chars().count() > MAX_TITLE_CHARS {
            return None;
        }

        let mut best: Option<TitleMatch> = None;
        for rule in &self.rules {
            if let Some(m) = rule.try_match(trimmed) {
                match &best {
                    Some(b) if m.literal_len <= b.literal_len => {}
                    _ => best = Some(m),
                }
            }
        }
        best
    }
}

impl Default for TitleRuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}

fn rule(kind: RuleKind, priority: u8, pattern: &str) -> TitleRule {
    TitleRule::new(kind, priority, pattern).expect("built-in rule pattern")
}

/// Curated bilingual section keywords
const NAMED_SECTIONS: [&str; 43] = [
    "序章",
    "序言",
    "序曲",
    "自序",
    "代序",
    "前言",
    "引言",
    "引子",
    "楔子",
    "题记",
    "卷首语",
    "开篇",
    "导言",
    "导读",
    "绪论",
    "总序",
    "终章",
    "尾声",
    "后记",
    "跋",
    "附录",
    "附记",
    "外传",
    "番外",
    "完本感言",
    "作品相关",
    "内容简介",
    "目录",
    "正文",
    "Prologue",
    "Epilogue",
    "Preface",
    "Foreword",
    "Introduction",
    "Afterword",
    "Appendix",
    "Acknowledgements",
    "Acknowledgments",
    "Contents",
    "Dedication",
    "Interlude",
    "Postscript",
    "Glossary",
];

pub(crate) fn is_numeral_char(c: char) -> bool {
    c.is_ascii_digit()
        || ('０'..='９').contains(&c)
        || matches!(
            c,
            '一' | '二' | '三' | '四' | '五' | '六' | '七' | '八' | '九' | '十' | '百' | '千'
                | '万' | '零' | '〇' | '两'
        )
}
