//! Per-document learned title pattern
//!
//! Derived once per document from a bounded prefix sample: short,
//! consistently decorated lines followed by longer prose become a rule. The
//! analysis is pure; callers merge the result into their rule set.

use super::rules::{TitleRule, TitleRuleSet};
use std::collections::BTreeMap;

/// Candidate title lines must be at most this many characters
const MAX_CANDIDATE_CHARS: usize = 24;

/// A decoration must appear on at least this many candidates to be learned
const MIN_OCCURRENCES: usize = 3;

/// Decoration glyphs the learner recognizes at the start of a line
const DECORATIONS: [char; 12] = [
    '【', '〔', '〖', '『', '「', '◆', '★', '☆', '●', '◎', '※', '（',
];

/// Closing glyph for paired decorations
fn closing_pair(open: char) -> Option<char> {
    match open {
        '【' => Some('】'),
        '〔' => Some('〕'),
        '〖' => Some('〗'),
        '『' => Some('』'),
        '「' => Some('」'),
        '（' => Some('）'),
        _ => None,
    }
}

fn is_decoration(c: char) -> bool {
    c.is_ascii_punctuation() || DECORATIONS.contains(&c)
}

/// Analyze a bounded prefix sample and derive a learned rule, if the sample
/// shows a consistent structural decoration on short pre-prose lines.
///
/// Lines already covered by the base rule set are ignored. Returns `None`
/// when no consistent decoration emerges; detection then stays on the
/// static rules (degraded, not an error).
pub fn learn_from_sample(lines: &[&str], base: &TitleRuleSet) -> Option<TitleRule> {
    let mut tallies: BTreeMap<char, usize> = BTreeMap::new();

    for (idx, raw) in lines.iter().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let chars = line.chars().count();
        if chars < 2 || chars > MAX_CANDIDATE_CHARS {
            continue;
        }
        if base.classify(line).is_some() {
            continue;
        }
        let Some(first) = line.chars().next() else {
            continue;
        };
        if !is_decoration(first) {
            continue;
        }
        // Only lines followed by visibly longer prose qualify.
        let followed_by_prose = lines[idx + 1..]
            .iter()
            .map(|l| l.trim())
            .find(|l| !l.is_empty())
            .map(|next| next.chars().count() > chars * 2)
            .unwrap_or(false);
        if followed_by_prose {
            *tallies.entry(first).or_insert(0) += 1;
        }
    }

    // BTreeMap iteration keeps the choice deterministic on tied counts.
    let (glyph, count) = tallies.into_iter().max_by_key(|(_, n)| *n)?;
    if count < MIN_OCCURRENCES {
        return None;
    }

    let open = regex::escape(&glyph.to_string());
    let pattern = match closing_pair(glyph) {
        Some(close) => {
            let close_esc = regex::escape(&close.to_string());
            format!(r"^\s*(?P<m>{open})(?P<c>[^{open}{close_esc}]{{1,30}}){close_esc}\s*$")
        }
        None => format!(r"^\s*(?P<m>{open})\s*(?P<c>\S.{{0,28}}?)\s*$"),
    };

    tracing::debug!(%glyph, count, "learned title decoration from sample");
    TitleRule::learned(&pattern).ok()
}
