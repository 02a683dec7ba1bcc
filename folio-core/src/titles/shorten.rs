//! Shortest-title reduction
//!
//! Strips structural markers from a detected title down to its minimal
//! display form by resubmitting candidates to the classifier. A seen-set
//! guards against rule sets that could cycle; each accepted step is strictly
//! shorter, so the loop is bounded by the title's length.

use super::rules::TitleRuleSet;
use std::collections::HashSet;

/// Reduce a title to its shortest human-meaningful fragment.
///
/// Deterministic and idempotent: reducing an already-minimal title returns
/// it unchanged, and a title that never classifies comes back as-is.
pub fn shortest_title(title: &str, rules: &TitleRuleSet) -> String {
    let original = title.trim().to_string();
    let mut current = original.clone();

    let mut seen: HashSet<String> = HashSet::new();
    while seen.insert(current.clone()) {
        match rules.classify(&current) {
            Some(m) => match m.content {
                Some(content)
                    if !content.is_empty()
                        && content.chars().count() < current.chars().count() =>
                {
                    current = content;
                }
                _ => break,
            },
            // An invalid candidate may still hide a title behind leading
            // junk tokens; otherwise the reduction is done.
            None => match first_valid_suffix(&current, rules) {
                Some(suffix) if suffix.chars().count() < current.chars().count() => {
                    current = suffix;
                }
                _ => break,
            },
        }
    }

    if current.is_empty() {
        original
    } else {
        current
    }
}

/// Drop leading whitespace-delimited tokens until a suffix classifies as a
/// title; `None` when no suffix does.
fn first_valid_suffix(candidate: &str, rules: &TitleRuleSet) -> Option<String> {
    let tokens: Vec<&str> = candidate.split_whitespace().collect();
    for skip in 1..tokens.len() {
        let suffix = tokens[skip..].join(" ");
        if rules.classify(&suffix).is_some() {
            return Some(suffix);
        }
    }
    None
}
