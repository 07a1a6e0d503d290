//! Placeholder substitution over the document tree.
//!
//! A placeholder is a literal `{{NAME}}` marker. Word processors often split
//! such a marker over several runs, or put part of it inside a hyperlink or
//! content control, so matching is done on the concatenated text of a
//! paragraph. The matched paragraph's runs are then rewritten in place:
//! wrappers and non-text content stay where they were.

use std::ops::ControlFlow;

use super::{Document, Inline, Paragraph, Rgb, Run, TextStyle};

pub const OPEN: &str = "{{";
pub const CLOSE: &str = "}}";

/// Byte spans of every `{{...}}` marker in `text`, left to right.
/// The empty marker `{{}}` counts.
pub fn find_tokens(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut cursor = 0;

    while let Some(open) = text[cursor..].find(OPEN).map(|i| cursor + i) {
        let Some(close) = text[open + OPEN.len()..].find(CLOSE).map(|i| open + OPEN.len() + i) else {
            break;
        };

        // `{{a {{B}}` only marks `{{B}}`
        let start = text[open..close].rfind(OPEN).map(|i| open + i).unwrap_or(open);
        let end = close + CLOSE.len();

        spans.push((start, end));
        cursor = end;
    }

    spans
}

type Replacement<'v> = ((usize, usize), &'v str);

/// Replace `[start, end)` spans of the paragraph text with styled values
fn rebuild(paragraph: &mut Paragraph, replacements: &[Replacement], base: &TextStyle, color: Option<Rgb>) {
    let mut offset = 0;
    splice(&mut paragraph.content, &mut offset, replacements, base, color);
    paragraph.centered = true;
}

fn splice(
    content: &mut Vec<Inline>,
    offset: &mut usize,
    replacements: &[Replacement],
    base: &TextStyle,
    color: Option<Rgb>,
) {
    for inline in std::mem::take(content) {
        match inline {
            Inline::Run(run) => {
                let start = *offset;
                *offset += run.text.len();
                content.extend(
                    split_run(&run, start, replacements, base, color)
                        .into_iter()
                        .map(Inline::Run),
                );
            }
            Inline::Container(mut container) => {
                splice(&mut container.content, offset, replacements, base, color);
                content.push(Inline::Container(container));
            }
            opaque => content.push(opaque),
        }
    }
}

/// Pieces replacing a run that starts at byte `start` of the paragraph text.
///
/// Text outside the spans gets `base`. A value is emitted by the run holding
/// the first byte of its span; the rest of the span is dropped from later runs.
fn split_run(
    run: &Run,
    start: usize,
    replacements: &[Replacement],
    base: &TextStyle,
    color: Option<Rgb>,
) -> Vec<Run> {
    let end = start + run.text.len();
    let mut pieces = Vec::new();
    let mut cursor = start;

    for &((s, e), value) in replacements {
        if e <= start || s >= end {
            continue;
        }
        if s > cursor {
            pieces.push(Run::styled(&run.text[cursor - start..s - start], base.clone()));
        }
        if s >= start {
            pieces.push(Run::styled(value, base.with_color(color)));
        }
        cursor = cursor.max(e.min(end));
    }
    if cursor < end {
        pieces.push(Run::styled(&run.text[cursor - start..], base.clone()));
    }

    pieces
}

/// Substitute the first paragraph containing `token`.
///
/// Text around the token keeps `base`; the value gets `base` plus `color`.
/// Returns whether a paragraph matched. Later occurrences are untouched.
pub fn replace_first(
    document: &mut Document,
    token: &str,
    value: &str,
    base: &TextStyle,
    color: Option<Rgb>,
) -> bool {
    if token.is_empty() {
        return false;
    }

    let flow = document.visit_paragraphs_mut(|paragraph| {
        let text = paragraph.text();
        let Some(start) = text.find(token) else {
            return ControlFlow::Continue(());
        };

        rebuild(paragraph, &[((start, start + token.len()), value)], base, color);
        ControlFlow::Break(())
    });

    flow.is_break()
}

/// Replace every remaining `{{...}}` marker with `filler`; returns the markers replaced
pub fn replace_remaining(
    document: &mut Document,
    filler: &str,
    base: &TextStyle,
    color: Option<Rgb>,
) -> Vec<String> {
    let mut replaced = Vec::new();

    let _ = document.visit_paragraphs_mut(|paragraph| {
        let text = paragraph.text();
        let spans = find_tokens(&text);
        if spans.is_empty() {
            return ControlFlow::Continue(());
        }

        replaced.extend(spans.iter().map(|&(s, e)| text[s..e].to_string()));
        let replacements: Vec<Replacement> = spans.into_iter().map(|span| (span, filler)).collect();
        rebuild(paragraph, &replacements, base, color);
        ControlFlow::Continue(())
    });

    replaced
}
