//! Wrapping styled spans into lines.
//!
//! Input is a list of span strings; output lines are lists of [`TextRun`]s
//! that remember which span each piece came from, so the painter can style
//! them. Explicit `\n` always breaks. Word wrap follows UAX #29 word bounds
//! and falls back to grapheme breaks for words wider than the line. Leading
//! whitespace on a wrapped line and trailing whitespace before a wrap are
//! dropped.

use unicode_segmentation::UnicodeSegmentation;

use super::width::{grapheme_width, string_width};

/// A piece of a laid-out line coming from one span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub span: usize,
    pub text: String,
}

pub type TextLine = Vec<TextRun>;

/// Display width of a laid-out line.
pub fn line_width(line: &[TextRun]) -> usize {
    line.iter().map(|run| string_width(&run.text)).sum()
}

/// Plain text of a laid-out line.
pub fn line_text(line: &[TextRun]) -> String {
    line.iter().map(|run| run.text.as_str()).collect()
}

/// Split spans at explicit newlines. Empty input gives no lines.
pub fn hard_lines<'a>(spans: &[&'a str]) -> Vec<Vec<(usize, &'a str)>> {
    if spans.iter().all(|s| s.is_empty()) {
        return Vec::new();
    }

    let mut lines = vec![Vec::new()];
    for (index, span) in spans.iter().enumerate() {
        for (i, piece) in span.split('\n').enumerate() {
            if i > 0 {
                lines.push(Vec::new());
            }
            if !piece.is_empty() {
                if let Some(line) = lines.last_mut() {
                    line.push((index, piece));
                }
            }
        }
    }
    lines
}

/// Widest hard line, i.e. the width the spans take without wrapping.
pub fn intrinsic_width(spans: &[&str]) -> usize {
    hard_lines(spans)
        .iter()
        .map(|line| line.iter().map(|(_, s)| string_width(s)).sum::<usize>())
        .max()
        .unwrap_or(0)
}

/// Word-wrap spans to `max_width`. A zero width leaves hard lines unwrapped.
pub fn wrap_spans(spans: &[&str], max_width: usize) -> Vec<TextLine> {
    let mut out = Vec::new();
    for line in hard_lines(spans) {
        if max_width == 0 {
            let mut builder = LineBuilder::default();
            for (span, text) in line {
                builder.push(span, text, string_width(text));
            }
            out.push(builder.finish());
        } else {
            wrap_line(&line, max_width, &mut out);
        }
    }
    out
}

/// Word-wrap a single unstyled string.
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    wrap_spans(&[text], max_width)
        .iter()
        .map(|line| line_text(line))
        .collect()
}

// =============================================================================
// Internals
// =============================================================================

/// Accumulates runs, merging adjacent pieces of the same span.
#[derive(Default)]
pub(super) struct LineBuilder {
    runs: TextLine,
    width: usize,
}

impl LineBuilder {
    pub(super) fn push(&mut self, span: usize, text: &str, width: usize) {
        match self.runs.last_mut() {
            Some(last) if last.span == span => last.text.push_str(text),
            _ => self.runs.push(TextRun {
                span,
                text: text.to_string(),
            }),
        }
        self.width += width;
    }

    pub(super) fn width(&self) -> usize {
        self.width
    }

    fn is_empty(&self) -> bool {
        self.width == 0 && self.runs.is_empty()
    }

    fn trim_end(&mut self) {
        while let Some(last) = self.runs.last_mut() {
            let trimmed = last.text.trim_end().len();
            if trimmed == last.text.len() {
                break;
            }
            let removed = string_width(&last.text[trimmed..]);
            last.text.truncate(trimmed);
            self.width -= removed.min(self.width);
            if last.text.is_empty() {
                self.runs.pop();
            } else {
                break;
            }
        }
    }

    pub(super) fn finish(self) -> TextLine {
        self.runs
    }
}

/// A word or a run of whitespace, possibly spanning several spans.
struct Token<'a> {
    pieces: Vec<(usize, &'a str)>,
    width: usize,
    space: bool,
}

fn tokenize<'a>(line: &[(usize, &'a str)]) -> Vec<Token<'a>> {
    let mut tokens: Vec<Token<'a>> = Vec::new();
    for &(span, text) in line {
        for segment in text.split_word_bounds() {
            let space = segment.chars().all(char::is_whitespace);
            let width = string_width(segment);
            match tokens.last_mut() {
                // Words continue across span boundaries and word-bound
                // segments ("don", "'", "t" style splits stay together).
                Some(last) if !last.space && !space => {
                    last.pieces.push((span, segment));
                    last.width += width;
                }
                _ => tokens.push(Token {
                    pieces: vec![(span, segment)],
                    width,
                    space,
                }),
            }
        }
    }
    tokens
}

fn wrap_line(line: &[(usize, &str)], max_width: usize, out: &mut Vec<TextLine>) {
    let mut current = LineBuilder::default();
    let mut wrapped = false;

    for token in tokenize(line) {
        if current.width() + token.width > max_width {
            if token.space {
                if !current.is_empty() {
                    current.trim_end();
                    out.push(std::mem::take(&mut current).finish());
                    wrapped = true;
                }
                continue;
            }

            if !current.is_empty() {
                current.trim_end();
                out.push(std::mem::take(&mut current).finish());
                wrapped = true;
            }

            if token.width > max_width {
                for (span, text) in token.pieces {
                    for grapheme in text.graphemes(true) {
                        let gw = grapheme_width(grapheme);
                        if current.width() + gw > max_width && current.width() > 0 {
                            out.push(std::mem::take(&mut current).finish());
                            wrapped = true;
                        }
                        current.push(span, grapheme, gw);
                    }
                }
                continue;
            }
        }

        if token.space && current.is_empty() && wrapped {
            // Leading whitespace on a wrapped line.
            continue;
        }

        for (span, text) in token.pieces {
            current.push(span, text, string_width(text));
        }
    }

    out.push(current.finish());
}
