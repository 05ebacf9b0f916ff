//! One-shot rendering to a string.
//!
//! No instance, no diff, no terminal: the tree is laid out at `width`,
//! painted, and each row written with its SGR codes. Static items are not
//! included; they only exist relative to a live frame.

use crate::error::RenderError;
use crate::layout::compute_layout;
use crate::primitives::Node;
use crate::renderer::{FrameBuffer, OutputBuffer, PaintOptions, StatefulCellRenderer, paint};
use crate::types::ColorMode;

/// Viewport height for percentage and absolute sizing. The frame itself is
/// as tall as its content.
const VIEWPORT_HEIGHT: u16 = 24;

fn frame(node: &Node, width: u16, unicode: bool) -> Result<FrameBuffer, RenderError> {
    let layout = compute_layout(node, width, VIEWPORT_HEIGHT)?;
    Ok(paint(node, &layout, &PaintOptions { unicode, width: Some(width) }))
}

/// Render `node` at `width` with truecolor SGR codes and Unicode borders.
///
/// Rows are joined with `\n`; trailing blanks on each row are dropped and
/// attributes are reset before each line break.
///
/// ```
/// use ember_tui::pipeline::render_once;
/// use ember_tui::primitives::{Node, text};
///
/// let out = render_once(&Node::from(text("error").fg("red")), 80)?;
/// assert_eq!(out, "\x1b[31merror\x1b[0m");
/// # Ok::<(), ember_tui::error::RenderError>(())
/// ```
pub fn render_once(node: &Node, width: u16) -> Result<String, RenderError> {
    render_with(node, width, true, ColorMode::TrueColor)
}

/// [`render_once`] with an explicit charset and color mode.
pub fn render_with(
    node: &Node,
    width: u16,
    unicode: bool,
    mode: ColorMode,
) -> Result<String, RenderError> {
    let frame = frame(node, width, unicode)?;
    let mut out = OutputBuffer::new();
    let mut cells = StatefulCellRenderer::new(mode);
    for y in 0..frame.height() {
        if y > 0 {
            out.write_char('\n');
        }
        cells.render_row(&mut out, frame.row(y))?;
        cells.finish(&mut out)?;
    }
    Ok(out.as_str().into_owned())
}

/// Render `node` at `width` as plain text without escape codes.
pub fn render_to_string(node: &Node, width: u16) -> Result<String, RenderError> {
    Ok(frame(node, width, true)?.to_plain_text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{BoxStyle, box_primitive, text};
    use crate::types::BorderStyle;

    #[test]
    fn test_red_sgr_precedes_text() {
        let out = render_once(&text("error").fg("red").into(), 80).unwrap();
        assert_eq!(out, "\x1b[31merror\x1b[0m");
    }

    #[test]
    fn test_bordered_box_glyphs() {
        let node = box_primitive(
            BoxStyle {
                border: BorderStyle::Single,
                ..BoxStyle::default()
            },
            [Node::from("hi")],
        );
        let out = render_once(&node, 80).unwrap();
        assert!(out.contains('─'));
        assert!(out.contains('│'));
        assert!(out.contains("hi"));
    }

    #[test]
    fn test_plain_text_and_ascii() {
        let node = box_primitive(
            BoxStyle {
                border: BorderStyle::Round,
                width: crate::types::Dimension::Cells(6),
                ..BoxStyle::default()
            },
            [text("hi").bold().into()],
        );
        assert_eq!(render_to_string(&node, 40).unwrap(), "╭────╮\n│hi  │\n╰────╯");
        let ascii = render_with(&node, 40, false, ColorMode::NoColor).unwrap();
        assert_eq!(ascii, "+----+\n|\x1b[1mhi\x1b[0m  |\n+----+");
    }
}
