//! Single-line classification and rendering
//!
//! Order matters: boilerplate stripping runs before title classification,
//! the footnote pre-pass runs before both title and paragraph rendering.

use crate::decode::detect::Language;
use crate::ingest::boilerplate::BoilerplateStripper;
use crate::ingest::state::FootnoteRegistry;
use crate::titles::{shortest_title, TitleRuleSet};
use crate::types::{LineKind, LineRecord, TitleEntry};

/// Circled-digit glyphs recognized as footnote markers
pub(crate) const FOOTNOTE_MARKS: [char; 20] = [
    '①', '②', '③', '④', '⑤', '⑥', '⑦', '⑧', '⑨', '⑩', '⑪', '⑫', '⑬', '⑭', '⑮', '⑯',
    '⑰', '⑱', '⑲', '⑳',
];

fn is_footnote_mark(c: char) -> bool {
    FOOTNOTE_MARKS.contains(&c)
}

/// Cross-line context threaded through the processor
pub struct LineContext<'a> {
    /// The following line, when available; gates ambiguous numeral-only
    /// titles and is absent only at the very end of the document
    pub next_line: Option<&'a str>,

    /// The previous line was a title; the next Western paragraph gets a
    /// drop cap
    pub drop_cap_pending: bool,

    /// A title has been emitted before (the first one renders as the
    /// document title)
    pub first_title_seen: bool,
}

/// Classifies and renders one line at a time
pub struct LineProcessor<'a> {
    rules: &'a TitleRuleSet,
    stripper: &'a BoilerplateStripper,
    language: Language,
}

impl<'a> LineProcessor<'a> {
    pub fn new(
        rules: &'a TitleRuleSet,
        stripper: &'a BoilerplateStripper,
        language: Language,
    ) -> Self {
        Self {
            rules,
            stripper,
            language,
        }
    }

    /// Process one raw line into a record, plus a title entry on detection
    pub fn process(
        &self,
        raw: &str,
        line_number: u32,
        ctx: &mut LineContext,
        notes: &mut FootnoteRegistry,
    ) -> (LineRecord, Option<TitleEntry>) {
        if self.stripper.is_boilerplate(raw) {
            return (LineRecord::empty(line_number, raw), None);
        }

        let cleaned = self.stripper.clean(raw);
        let text = cleaned.trim();
        if text.is_empty() {
            return (LineRecord::empty(line_number, raw), None);
        }

        // Footnote body: exactly one marker followed by the body text
        let mut chars = text.chars();
        if let Some(first) = chars.next() {
            let rest = chars.as_str().trim();
            if is_footnote_mark(first) && !rest.is_empty() && !rest.chars().any(is_footnote_mark)
            {
                notes.record_body(first, rest);
                return (LineRecord::empty(line_number, raw), None);
            }
        }

        if let Some(m) = self.rules.classify(text) {
            let confirmed = if m.numeric_only {
                // A bare numeral is only a title when followed by prose.
                ctx.next_line
                    .map(|next| {
                        let next = next.trim();
                        !next.is_empty() && self.rules.classify(next).is_none()
                    })
                    .unwrap_or(false)
            } else {
                true
            };

            if confirmed {
                let display = strip_trailing_colon(&m.display);
                let kind = if ctx.first_title_seen {
                    LineKind::Heading
                } else {
                    LineKind::Title
                };
                ctx.first_title_seen = true;
                ctx.drop_cap_pending = true;

                let tag = if kind == LineKind::Title { "h1" } else { "h2" };
                let id = format!("line-{line_number}");
                let markup = format!(
                    "<{tag} id=\"{id}\"><a href=\"#{id}\">{}</a></{tag}>",
                    escape_html(&display)
                );
                let entry = TitleEntry::new(display.clone(), line_number)
                    .with_shortest(shortest_title(&display, self.rules))
                    .with_learned(m.is_learned());
                return (LineRecord::new(kind, line_number, raw, markup), Some(entry));
            }
        }

        let record = self.render_paragraph(text, raw, line_number, ctx, notes);
        (record, None)
    }

    fn render_paragraph(
        &self,
        text: &str,
        raw: &str,
        line_number: u32,
        ctx: &mut LineContext,
        notes: &mut FootnoteRegistry,
    ) -> LineRecord {
        let drop_cap = ctx.drop_cap_pending && self.language == Language::Western;
        if ctx.drop_cap_pending {
            ctx.drop_cap_pending = false;
        }

        let (lead, rest) = if drop_cap {
            split_drop_cap(text)
        } else {
            (String::new(), text)
        };

        let (inline, refs) = render_inline(rest, notes);
        let id = format!("line-{line_number}");
        let markup = if lead.is_empty() {
            format!("<p id=\"{id}\">{inline}</p>")
        } else {
            format!(
                "<p id=\"{id}\"><span class=\"drop-cap\">{}</span>{inline}</p>",
                escape_html(&lead)
            )
        };

        LineRecord::new(LineKind::Paragraph, line_number, raw, markup).with_footnote_refs(refs)
    }
}

/// Leading punctuation run plus the following character, or just the first
/// character, split off for drop-cap styling.
fn split_drop_cap(text: &str) -> (String, &str) {
    let mut lead = String::new();
    let mut iter = text.char_indices().peekable();

    while let Some((_, c)) = iter.peek().copied() {
        if c.is_alphanumeric() || c.is_whitespace() {
            break;
        }
        lead.push(c);
        iter.next();
    }

    match iter.next() {
        Some((idx, c)) if !c.is_whitespace() => {
            lead.push(c);
            (lead, &text[idx + c.len_utf8()..])
        }
        _ if !lead.is_empty() => {
            let consumed = lead.chars().map(|c| c.len_utf8()).sum::<usize>();
            (lead, &text[consumed..])
        }
        _ => (String::new(), text),
    }
}

/// Escape text and replace footnote markers with reference anchors
fn render_inline(text: &str, notes: &mut FootnoteRegistry) -> (String, Vec<u32>) {
    let mut out = String::with_capacity(text.len() + 16);
    let mut refs = Vec::new();

    for c in text.chars() {
        if is_footnote_mark(c) {
            let ordinal = notes.resolve(c);
            out.push_str(&format!(
                "<a class=\"note-ref\" id=\"note-ref-{ordinal}\" href=\"#note-{ordinal}\">{c}</a>"
            ));
            if !refs.contains(&ordinal) {
                refs.push(ordinal);
            }
        } else {
            push_escaped(&mut out, c);
        }
    }

    (out, refs)
}

fn strip_trailing_colon(title: &str) -> String {
    title
        .trim_end_matches([':', '：'])
        .trim_end()
        .to_string()
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        push_escaped(&mut out, c);
    }
    out
}

fn push_escaped(out: &mut String, c: char) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        _ => out.push(c),
    }
}
