//! Truncating styled lines to a width.
//!
//! Each hard line is cut independently and marked with `…` where text was
//! removed. Cuts happen on grapheme boundaries; a wide glyph that would
//! straddle the limit is dropped.

use unicode_segmentation::UnicodeSegmentation;

use super::width::grapheme_width;
use super::wrap::{LineBuilder, TextLine, hard_lines};

pub const ELLIPSIS: &str = "…";

/// Which part of an overlong line to remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TruncateAt {
    End,
    Start,
    Middle,
}

struct Grapheme<'a> {
    span: usize,
    text: &'a str,
    width: usize,
}

fn graphemes<'a>(line: &[(usize, &'a str)]) -> Vec<Grapheme<'a>> {
    line.iter()
        .flat_map(|&(span, text)| {
            text.graphemes(true).map(move |g| Grapheme {
                span,
                text: g,
                width: grapheme_width(g),
            })
        })
        .collect()
}

/// Longest prefix (by count) whose width fits `budget`.
fn fit_prefix(items: &[Grapheme<'_>], budget: usize) -> usize {
    let mut used = 0;
    for (i, g) in items.iter().enumerate() {
        if used + g.width > budget {
            return i;
        }
        used += g.width;
    }
    items.len()
}

/// Start index of the longest suffix whose width fits `budget`.
fn fit_suffix(items: &[Grapheme<'_>], budget: usize) -> usize {
    let mut used = 0;
    for (i, g) in items.iter().enumerate().rev() {
        if used + g.width > budget {
            return i + 1;
        }
        used += g.width;
    }
    0
}

fn truncate_line(line: &[(usize, &str)], max_width: usize, at: TruncateAt) -> TextLine {
    let items = graphemes(line);
    let total: usize = items.iter().map(|g| g.width).sum();

    let mut out = LineBuilder::default();
    if total <= max_width {
        for g in &items {
            out.push(g.span, g.text, g.width);
        }
        return out.finish();
    }
    if max_width == 0 || items.is_empty() {
        return out.finish();
    }

    let budget = max_width - 1;
    match at {
        TruncateAt::End => {
            let keep = fit_prefix(&items, budget);
            for g in &items[..keep] {
                out.push(g.span, g.text, g.width);
            }
            out.push(items[keep.min(items.len() - 1)].span, ELLIPSIS, 1);
        }
        TruncateAt::Start => {
            let from = fit_suffix(&items, budget);
            out.push(items[from.saturating_sub(1)].span, ELLIPSIS, 1);
            for g in &items[from..] {
                out.push(g.span, g.text, g.width);
            }
        }
        TruncateAt::Middle => {
            let head_budget = budget - budget / 2;
            let head = fit_prefix(&items, head_budget);
            let head_width: usize = items[..head].iter().map(|g| g.width).sum();
            let tail = fit_suffix(&items[head..], budget - head_width) + head;
            for g in &items[..head] {
                out.push(g.span, g.text, g.width);
            }
            out.push(items[head.min(items.len() - 1)].span, ELLIPSIS, 1);
            for g in &items[tail..] {
                out.push(g.span, g.text, g.width);
            }
        }
    }
    out.finish()
}

/// Cut every hard line of `spans` to `max_width`.
pub fn truncate_spans(spans: &[&str], max_width: usize, at: TruncateAt) -> Vec<TextLine> {
    hard_lines(spans)
        .iter()
        .map(|line| truncate_line(line, max_width, at))
        .collect()
}

/// Truncate a single unstyled string.
pub fn truncate_text(text: &str, max_width: usize, at: TruncateAt) -> String {
    truncate_spans(&[text], max_width, at)
        .first()
        .map(|line| super::wrap::line_text(line))
        .unwrap_or_default()
}
