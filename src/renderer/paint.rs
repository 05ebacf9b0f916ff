//! Painting a laid-out tree into a [`FrameBuffer`].
//!
//! The node tree and the layout tree are walked in lockstep: a box's layout
//! children correspond one to one with its flow children. Painting order is
//! document order, so later siblings draw over earlier ones.
//!
//! Colors are resolved here. A color that fails to parse is logged and the
//! subtree it belongs to is painted without any styling; the rest of the frame
//! is unaffected.

use tracing::warn;

use crate::error::PaintError;
use crate::layout::{LayoutBox, root_node};
use crate::primitives::{BoxNode, BoxStyle, ColorValue, Node, TextNode, flow_children};
use crate::types::{Attr, Rect, Rgba};

use super::buffer::{CellStyle, FrameBuffer};

/// Options fixed for a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaintOptions {
    /// Box-drawing glyphs when true, ASCII `+ - |` otherwise.
    pub unicode: bool,
    /// Frame width; defaults to the right edge of the root box.
    pub width: Option<u16>,
}

impl Default for PaintOptions {
    fn default() -> Self {
        Self {
            unicode: true,
            width: None,
        }
    }
}

/// Paint `node` (as laid out in `layout`) into a new frame.
///
/// The frame is as tall as the root's bottom edge.
pub fn paint(node: &Node, layout: &LayoutBox, options: &PaintOptions) -> FrameBuffer {
    let root = root_node(node);
    let width = options.width.unwrap_or_else(|| layout.rect.right());
    let mut buffer = FrameBuffer::new(width, layout.rect.bottom());
    let clip = buffer.bounds();

    let mut painter = Painter {
        buffer: &mut buffer,
        unicode: options.unicode,
    };
    painter.node(root.as_ref(), layout, clip, Inherited::default());
    buffer
}

/// Style carried down from ancestors.
#[derive(Debug, Clone, Copy, Default)]
struct Inherited {
    fg: Option<Rgba>,
    unstyled: bool,
}

struct BoxColors {
    fg: Option<Rgba>,
    bg: Option<Rgba>,
    border: Option<Rgba>,
}

fn resolve(value: &Option<ColorValue>) -> Result<Option<Rgba>, PaintError> {
    value.as_ref().map(ColorValue::resolve).transpose()
}

fn box_colors(style: &BoxStyle) -> Result<BoxColors, PaintError> {
    Ok(BoxColors {
        fg: resolve(&style.fg)?,
        bg: resolve(&style.bg)?,
        border: resolve(&style.border_color)?,
    })
}

struct Painter<'a> {
    buffer: &'a mut FrameBuffer,
    unicode: bool,
}

impl Painter<'_> {
    fn node(&mut self, node: &Node, layout: &LayoutBox, clip: Rect, inherited: Inherited) {
        match node {
            Node::Box(b) if !node.is_hidden() => self.boxed(b, layout, clip, inherited),
            Node::Text(text) => self.text(text, layout, clip, inherited),
            _ => {}
        }
    }

    fn boxed(&mut self, b: &BoxNode, layout: &LayoutBox, clip: Rect, mut inherited: Inherited) {
        let style = &b.style;

        let colors = if inherited.unstyled {
            None
        } else {
            match box_colors(style) {
                Ok(colors) => Some(colors),
                Err(err) => {
                    warn!(%err, "painting box subtree unstyled");
                    inherited.unstyled = true;
                    None
                }
            }
        };

        let mut border_fg = None;
        if let Some(colors) = &colors {
            if let Some(bg) = colors.bg {
                self.buffer.fill_rect(layout.rect, bg, &clip);
            }
            if colors.fg.is_some() {
                inherited.fg = colors.fg;
            }
            border_fg = colors.border.or(inherited.fg);
        }

        if style.border.is_set() {
            let attrs = if style.border_dim_color && !inherited.unstyled {
                Attr::DIM
            } else {
                Attr::NONE
            };
            let border_style = CellStyle {
                fg: border_fg.unwrap_or(Rgba::TERMINAL_DEFAULT),
                bg: None,
                attrs,
            };
            let chars = style.border.chars(self.unicode);
            self.buffer.draw_border(layout.rect, &chars, &border_style, &clip);
        }

        let Some(inner_clip) = layout.content.intersect(&clip) else {
            return;
        };
        let mut kids = Vec::new();
        flow_children(&b.children, &mut kids);
        for (kid, kid_layout) in kids.into_iter().zip(&layout.children) {
            self.node(kid, kid_layout, inner_clip, inherited);
        }
    }

    /// Cell styles for each span of `text`, or `None` to paint it plain.
    fn span_styles(text: &TextNode, inherited: Inherited) -> Option<Vec<CellStyle>> {
        if inherited.unstyled {
            return None;
        }
        let mut styles = Vec::with_capacity(text.spans.len());
        for span in &text.spans {
            let merged = span.style.inherit(&text.style);
            let colors = resolve(&merged.fg).and_then(|fg| resolve(&merged.bg).map(|bg| (fg, bg)));
            match colors {
                Ok((fg, bg)) => styles.push(CellStyle {
                    fg: fg.or(inherited.fg).unwrap_or(Rgba::TERMINAL_DEFAULT),
                    bg,
                    attrs: merged.attrs,
                }),
                Err(err) => {
                    warn!(%err, "painting text unstyled");
                    return None;
                }
            }
        }
        Some(styles)
    }

    fn text(&mut self, text: &TextNode, layout: &LayoutBox, clip: Rect, inherited: Inherited) {
        let Some(area) = layout.rect.intersect(&clip) else {
            return;
        };
        let styles = Self::span_styles(text, inherited);
        let plain = CellStyle::default();

        for (row, line) in layout.lines.iter().enumerate() {
            if row >= layout.rect.height as usize {
                break;
            }
            let y = layout.rect.y + row as u16;
            let mut x = layout.rect.x;
            for run in line {
                let style = styles
                    .as_ref()
                    .and_then(|styles| styles.get(run.span))
                    .unwrap_or(&plain);
                x = x.saturating_add(self.buffer.draw_text(x, y, &run.text, style, &area));
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::compute_layout;
    use crate::primitives::{box_primitive, text};
    use crate::types::{BorderStyle, Dimension};

    fn render(node: &Node, width: u16, unicode: bool) -> FrameBuffer {
        let layout = compute_layout(node, width, 24).unwrap();
        paint(
            node,
            &layout,
            &PaintOptions {
                unicode,
                width: Some(width),
            },
        )
    }

    #[test]
    fn test_text_color() {
        let node: Node = text("error").fg("red").into();
        let buf = render(&node, 80, true);
        assert_eq!(buf.width(), 80);
        assert_eq!(buf.height(), 1);
        assert_eq!(buf.row_text(0), "error");
        assert_eq!(buf.get(0, 0).unwrap().fg, Rgba::ansi(1));
        assert!(buf.get(5, 0).unwrap().is_blank());
    }

    #[test]
    fn test_bordered_box() {
        let node = box_primitive(
            BoxStyle {
                border: BorderStyle::Single,
                width: Dimension::Cells(6),
                ..Default::default()
            },
            [Node::from("hi")],
        );
        let buf = render(&node, 80, true);
        assert_eq!(buf.row_text(0), "┌────┐");
        assert_eq!(buf.row_text(1), "│hi  │");
        assert_eq!(buf.row_text(2), "└────┘");
    }

    #[test]
    fn test_ascii_border() {
        let node = box_primitive(
            BoxStyle {
                border: BorderStyle::Round,
                width: Dimension::Cells(4),
                ..Default::default()
            },
            [],
        );
        let buf = render(&node, 10, false);
        assert_eq!(buf.height(), 2);
        assert_eq!(buf.row_text(0), "+--+");
        assert_eq!(buf.row_text(1), "+--+");
    }

    #[test]
    fn test_box_colors_inherit() {
        let node = box_primitive(
            BoxStyle {
                fg: Some("green".into()),
                bg: Some("blue".into()),
                width: Dimension::Cells(4),
                ..Default::default()
            },
            [Node::from("ab")],
        );
        let buf = render(&node, 10, true);
        let cell = buf.get(0, 0).unwrap();
        assert_eq!(cell.fg, Rgba::ansi(2));
        assert_eq!(cell.bg, Rgba::ansi(4));
        // Filled but empty cells keep the background.
        assert_eq!(buf.get(3, 0).unwrap().bg, Rgba::ansi(4));
        assert!(buf.get(4, 0).unwrap().is_blank());
    }

    #[test]
    fn test_invalid_color_degrades_subtree_only() {
        let bad = box_primitive(
            BoxStyle {
                fg: Some("not-a-color".into()),
                ..Default::default()
            },
            [text("bad").fg("red").into()],
        );
        let good: Node = text("good").fg("red").into();
        let node = box_primitive(BoxStyle::column(), [bad, good]);
        let buf = render(&node, 10, true);
        assert_eq!(buf.row_text(0), "bad");
        assert_eq!(buf.get(0, 0).unwrap().fg, Rgba::TERMINAL_DEFAULT);
        assert_eq!(buf.get(0, 1).unwrap().fg, Rgba::ansi(1));
    }

    #[test]
    fn test_children_clipped_to_content() {
        let node = box_primitive(
            BoxStyle {
                border: BorderStyle::Single,
                width: Dimension::Cells(5),
                height: Dimension::Cells(3),
                ..BoxStyle::row()
            },
            [text("abcdef").wrap(crate::types::TextWrap::Truncate).into()],
        );
        let buf = render(&node, 10, true);
        assert_eq!(buf.row_text(1), "│ab…│");
    }

    #[test]
    fn test_nested_span_styles() {
        let node: Node = text("a")
            .fg("red")
            .child(text("b").bold())
            .into();
        let buf = render(&node, 10, true);
        let b = buf.get(1, 0).unwrap();
        assert_eq!(b.fg, Rgba::ansi(1));
        assert!(b.attrs.contains(Attr::BOLD));
        assert!(!buf.get(0, 0).unwrap().attrs.contains(Attr::BOLD));
    }
}
