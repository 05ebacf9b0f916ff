//! Text measurement: widths, wrapping and truncation of styled spans.

mod truncate;
mod width;
mod wrap;

pub use truncate::{ELLIPSIS, TruncateAt, truncate_spans, truncate_text};
pub use width::{char_width, grapheme_width, string_width};
pub use wrap::{
    TextLine, TextRun, hard_lines, intrinsic_width, line_text, line_width, wrap_spans, wrap_text,
};

use crate::types::TextWrap;

/// Break `spans` into the lines they occupy at `width` under `mode`.
pub fn layout_text(spans: &[&str], mode: TextWrap, width: usize) -> Vec<TextLine> {
    match mode {
        TextWrap::Wrap => wrap_spans(spans, width),
        TextWrap::Truncate => truncate_spans(spans, width, TruncateAt::End),
        TextWrap::TruncateStart => truncate_spans(spans, width, TruncateAt::Start),
        TextWrap::TruncateMiddle => truncate_spans(spans, width, TruncateAt::Middle),
    }
}
