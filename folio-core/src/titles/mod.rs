//! Title pattern library, per-document learning, and title reduction

mod learn;
mod rules;
mod shorten;

pub use learn::learn_from_sample;
pub use rules::{RuleKind, TitleMatch, TitleRule, TitleRuleSet};
pub use shorten::shortest_title;
