//! TITAN Layout Engine
//!
//! Flexbox over immutable node trees.
//!
//! # Algorithm
//!
//! 1. **Measure**: intrinsic (max-content) width, and border-box height at a
//!    given width. A row is measured by running its flex distribution, so text
//!    that shrinks and wraps reports its real line count to ancestors.
//! 2. **Place**: top-down. Each container resolves its content box, sizes its
//!    flow children along the main axis, aligns them on the cross axis and
//!    recurses.
//! 3. **Absolute**: out-of-flow boxes are placed against the content box of
//!    their nearest positioned ancestor.
//!
//! Percentages resolve against the parent's content box only when that size is
//! definite (the viewport width, an explicit size, absolute insets, or a flex
//! result inside a definite container). Inside an auto-sized parent they
//! behave as `Auto`, both when measuring and when placing.

use std::borrow::Cow;
use std::rc::Rc;

use crate::error::LayoutError;
use crate::primitives::{BoxNode, BoxStyle, Node, TextNode, flow_children};
use crate::types::{AlignItems, AlignSelf, Dimension, Edges, Position, Rect};

use super::flex::{FlexItem, justify_offsets, resolve_flexible_lengths};
use super::text_measure::{TextLine, intrinsic_width as text_intrinsic_width, layout_text};
use super::types::LayoutBox;

/// Deepest node nesting the engine will lay out.
pub const MAX_DEPTH: usize = 128;

// =============================================================================
// ITEM PROPERTIES
// =============================================================================

/// How a node behaves as a flex item of its parent.
struct ItemProps {
    grow: f32,
    shrink: f32,
    basis: Dimension,
    width: Dimension,
    height: Dimension,
    min_width: Dimension,
    max_width: Dimension,
    min_height: Dimension,
    max_height: Dimension,
    margin: Edges,
    align_self: AlignSelf,
}

impl ItemProps {
    fn leaf(grow: f32, height: Dimension) -> Self {
        Self {
            grow,
            shrink: 1.0,
            basis: Dimension::Auto,
            width: Dimension::Auto,
            height,
            min_width: Dimension::Auto,
            max_width: Dimension::Auto,
            min_height: Dimension::Auto,
            max_height: Dimension::Auto,
            margin: Edges::ZERO,
            align_self: AlignSelf::Auto,
        }
    }

    fn of(node: &Node) -> Self {
        match node {
            Node::Box(b) => {
                let s = &b.style;
                Self {
                    grow: s.flex_grow,
                    shrink: s.flex_shrink,
                    basis: s.flex_basis,
                    width: s.width,
                    height: s.height,
                    min_width: s.min_width,
                    max_width: s.max_width,
                    min_height: s.min_height,
                    max_height: s.max_height,
                    margin: s.margin,
                    align_self: s.align_self,
                }
            }
            Node::Spacer => Self::leaf(1.0, Dimension::Auto),
            Node::Newline(n) => Self::leaf(0.0, Dimension::Cells(*n)),
            Node::Text(_) | Node::Fragment(_) | Node::Static(_) => {
                Self::leaf(0.0, Dimension::Auto)
            }
        }
    }

    fn main_range(&self, row: bool, parent: Option<u16>) -> (u16, u16) {
        let (min, max) = if row {
            (self.min_width, self.max_width)
        } else {
            (self.min_height, self.max_height)
        };
        let min = min.resolve(parent).unwrap_or(0);
        let max = max.resolve(parent).unwrap_or(u16::MAX).max(min);
        (min, max)
    }
}

// =============================================================================
// HELPERS
// =============================================================================

#[inline]
fn check_depth(depth: usize) -> Result<(), LayoutError> {
    if depth > MAX_DEPTH {
        Err(LayoutError::TooDeep {
            depth,
            max: MAX_DEPTH,
        })
    } else {
        Ok(())
    }
}

/// Apply min/max constraints; min wins over max.
fn clamp_dimension(value: u16, min: Dimension, max: Dimension, parent: Option<u16>) -> u16 {
    let mut v = value;
    if let Some(max) = max.resolve(parent) {
        v = v.min(max);
    }
    if let Some(min) = min.resolve(parent) {
        v = v.max(min);
    }
    v
}

#[inline]
fn is_out_of_flow(node: &Node) -> bool {
    match node {
        Node::Box(b) => b.style.position == Position::Absolute,
        _ => false,
    }
}

/// Children that take part in flex distribution.
fn in_flow<'a>(children: &'a [Node]) -> Vec<&'a Node> {
    let mut all = Vec::new();
    flow_children(children, &mut all);
    all.retain(|child| !child.is_hidden() && !is_out_of_flow(child));
    all
}

fn total_gap(gap: u16, count: usize) -> u16 {
    let gaps = count.saturating_sub(1) as u32 * gap as u32;
    gaps.min(u16::MAX as u32) as u16
}

fn span_texts(text: &TextNode) -> Vec<&str> {
    text.spans.iter().map(|span| &*span.text).collect()
}

fn text_lines(text: &TextNode, width: u16) -> Vec<TextLine> {
    layout_text(&span_texts(text), text.wrap, width as usize)
}

/// Margin at the main-start and main-end side, honoring reversal.
fn main_margins(margin: Edges, row: bool, reverse: bool) -> (u16, u16) {
    let (start, end) = if row {
        (margin.left, margin.right)
    } else {
        (margin.top, margin.bottom)
    };
    if reverse { (end, start) } else { (start, end) }
}

/// The root must be a box; anything else gets an implicit column around it.
pub(crate) fn root_node(node: &Node) -> Cow<'_, Node> {
    match node {
        Node::Box(_) => Cow::Borrowed(node),
        other => Cow::Owned(Node::Box(BoxNode {
            style: BoxStyle::column(),
            children: Rc::from([other.clone()]),
        })),
    }
}

// =============================================================================
// MEASURE
// =============================================================================

/// Max-content border-box width.
fn intrinsic_width(node: &Node, parent_width: Option<u16>, depth: usize) -> Result<u16, LayoutError> {
    check_depth(depth)?;
    let b = match node {
        Node::Text(text) => {
            let width = text_intrinsic_width(&span_texts(text));
            return Ok(width.min(u16::MAX as usize) as u16);
        }
        Node::Box(b) if !node.is_hidden() => b,
        _ => return Ok(0),
    };

    let style = &b.style;
    if let Some(width) = style.width.resolve(parent_width) {
        return Ok(clamp_dimension(width, style.min_width, style.max_width, parent_width));
    }

    let kids = in_flow(&b.children);
    let mut content: u32 = 0;
    for kid in &kids {
        let outer = intrinsic_width(kid, None, depth + 1)? as u32
            + ItemProps::of(kid).margin.horizontal() as u32;
        if style.flex_direction.is_row() {
            content += outer;
        } else {
            content = content.max(outer);
        }
    }
    if style.flex_direction.is_row() {
        content += total_gap(style.gap, kids.len()) as u32;
    }

    let total = (content + style.inner_edges().horizontal() as u32).min(u16::MAX as u32) as u16;
    Ok(clamp_dimension(total, style.min_width, style.max_width, parent_width))
}

/// Border-box height of `node` when it is `width` cells wide.
fn height_for_width(
    node: &Node,
    width: u16,
    parent_height: Option<u16>,
    depth: usize,
) -> Result<u16, LayoutError> {
    check_depth(depth)?;
    let b = match node {
        Node::Text(text) => {
            return Ok(text_lines(text, width).len().min(u16::MAX as usize) as u16);
        }
        Node::Newline(n) => return Ok(*n),
        Node::Box(b) if !node.is_hidden() => b,
        _ => return Ok(0),
    };

    let style = &b.style;
    if let Some(height) = style.height.resolve(parent_height) {
        return Ok(clamp_dimension(height, style.min_height, style.max_height, parent_height));
    }

    let inner = style.inner_edges();
    let content_width = width.saturating_sub(inner.horizontal());
    let content = content_height(b, content_width, depth)?;
    let total = content.saturating_add(inner.vertical());
    Ok(clamp_dimension(total, style.min_height, style.max_height, parent_height))
}

/// Height of a container's flow content when its content box is
/// `content_width` wide and its height is still open.
fn content_height(b: &BoxNode, content_width: u16, depth: usize) -> Result<u16, LayoutError> {
    let style = &b.style;
    let kids = in_flow(&b.children);
    if kids.is_empty() {
        return Ok(0);
    }

    if style.flex_direction.is_row() {
        let widths = row_main_sizes(&kids, content_width, style.gap, depth)?;
        let mut tallest: u16 = 0;
        for (kid, width) in kids.iter().zip(widths) {
            let props = ItemProps::of(kid);
            let height = height_for_width(kid, width, None, depth + 1)?;
            let height = clamp_dimension(height, props.min_height, props.max_height, None);
            tallest = tallest.max(height.saturating_add(props.margin.vertical()));
        }
        Ok(tallest)
    } else {
        let mut total: u16 = total_gap(style.gap, kids.len());
        for kid in &kids {
            let width = column_cross_size(kid, content_width, style.align_items, depth)?;
            let height = column_basis(kid, width, None, depth)?;
            let props = ItemProps::of(kid);
            total = total
                .saturating_add(height)
                .saturating_add(props.margin.vertical());
        }
        Ok(total)
    }
}

// =============================================================================
// MAIN AXIS
// =============================================================================

/// Widths of row items inside a content box `content_width` wide.
fn row_main_sizes(
    kids: &[&Node],
    content_width: u16,
    gap: u16,
    depth: usize,
) -> Result<Vec<u16>, LayoutError> {
    let parent = Some(content_width);
    let mut items = Vec::with_capacity(kids.len());
    for kid in kids {
        let props = ItemProps::of(kid);
        let base = match props.basis.resolve(parent).or(props.width.resolve(parent)) {
            Some(base) => base,
            None => intrinsic_width(kid, parent, depth + 1)?,
        };
        let (min, max) = props.main_range(true, parent);
        items.push(FlexItem {
            base: base.clamp(min, max),
            grow: props.grow,
            shrink: props.shrink,
            min,
            max,
            margin: props.margin.horizontal(),
        });
    }
    let available = content_width.saturating_sub(total_gap(gap, kids.len()));
    Ok(resolve_flexible_lengths(&items, available))
}

/// Hypothetical height of a column item that is `width` wide.
fn column_basis(
    kid: &Node,
    width: u16,
    content_height: Option<u16>,
    depth: usize,
) -> Result<u16, LayoutError> {
    let props = ItemProps::of(kid);
    let base = match props.basis.resolve(content_height) {
        Some(base) => base,
        None => height_for_width(kid, width, content_height, depth + 1)?,
    };
    let (min, max) = props.main_range(false, content_height);
    Ok(base.clamp(min, max))
}

/// Heights of column items inside a content box `content_height` tall.
/// `definite` is that height when percentages may resolve against it.
fn column_main_sizes(
    kids: &[&Node],
    widths: &[u16],
    content_height: u16,
    definite: Option<u16>,
    gap: u16,
    depth: usize,
) -> Result<Vec<u16>, LayoutError> {
    let parent = definite;
    let mut items = Vec::with_capacity(kids.len());
    for (kid, width) in kids.iter().zip(widths) {
        let props = ItemProps::of(kid);
        let (min, max) = props.main_range(false, parent);
        items.push(FlexItem {
            base: column_basis(kid, *width, parent, depth)?,
            grow: props.grow,
            shrink: props.shrink,
            min,
            max,
            margin: props.margin.vertical(),
        });
    }
    let available = content_height.saturating_sub(total_gap(gap, kids.len()));
    Ok(resolve_flexible_lengths(&items, available))
}

// =============================================================================
// CROSS AXIS
// =============================================================================

/// Width of a column item.
fn column_cross_size(
    kid: &Node,
    content_width: u16,
    align_items: AlignItems,
    depth: usize,
) -> Result<u16, LayoutError> {
    let props = ItemProps::of(kid);
    let parent = Some(content_width);
    let available = content_width.saturating_sub(props.margin.horizontal());
    let width = match props.width.resolve(parent) {
        Some(width) => width,
        None if props.align_self.resolve(align_items) == AlignItems::Stretch => available,
        None => intrinsic_width(kid, parent, depth + 1)?.min(available),
    };
    Ok(clamp_dimension(width, props.min_width, props.max_width, parent))
}

/// Height of a row item that is `width` wide.
fn row_cross_size(
    kid: &Node,
    width: u16,
    content_height: u16,
    definite: Option<u16>,
    align_items: AlignItems,
    depth: usize,
) -> Result<u16, LayoutError> {
    let props = ItemProps::of(kid);
    let parent = definite;
    let available = content_height.saturating_sub(props.margin.vertical());
    let height = match props.height.resolve(parent) {
        Some(height) => height,
        None if props.align_self.resolve(align_items) == AlignItems::Stretch => available,
        None => height_for_width(kid, width, parent, depth + 1)?,
    };
    Ok(clamp_dimension(height, props.min_height, props.max_height, parent))
}

fn cross_offset(align: AlignItems, available: u16, size: u16) -> u16 {
    match align {
        AlignItems::Stretch | AlignItems::FlexStart => 0,
        AlignItems::Center => available.saturating_sub(size) / 2,
        AlignItems::FlexEnd => available.saturating_sub(size),
    }
}

// =============================================================================
// PLACE
// =============================================================================

/// Compute layout for a tree in a `viewport_width` x `viewport_height`
/// terminal.
///
/// The root spans the viewport width unless it sets its own width; its height
/// is its content height (the frame grows downward like inline output) unless
/// set explicitly.
pub fn compute_layout(
    root: &Node,
    viewport_width: u16,
    viewport_height: u16,
) -> Result<LayoutBox, LayoutError> {
    let root = root_node(root);
    let node = root.as_ref();
    let viewport = Rect::new(0, 0, viewport_width, viewport_height);

    let props = ItemProps::of(node);
    let margin = props.margin;
    let vw = Some(viewport_width);
    let vh = Some(viewport_height);

    let width = props
        .width
        .resolve(vw)
        .unwrap_or_else(|| viewport_width.saturating_sub(margin.horizontal()));
    let width = clamp_dimension(width, props.min_width, props.max_width, vw);
    let height = height_for_width(node, width, vh, 0)?;
    let definite_height = props.height.resolve(vh).is_some();

    let rect = if node.is_hidden() {
        Rect::new(margin.left, margin.top, 0, 0)
    } else {
        Rect::new(margin.left, margin.top, width, height)
    };
    layout_node(node, rect, definite_height, viewport, 0)
}

/// Lay out `node` into the border box `rect`. `definite_height` says whether
/// that height was fixed from outside rather than measured from content.
/// `containing` is the content box of the nearest positioned ancestor.
fn layout_node(
    node: &Node,
    rect: Rect,
    definite_height: bool,
    containing: Rect,
    depth: usize,
) -> Result<LayoutBox, LayoutError> {
    check_depth(depth)?;
    let b = match node {
        Node::Text(text) => {
            return Ok(LayoutBox {
                lines: text_lines(text, rect.width),
                ..LayoutBox::leaf(rect)
            });
        }
        Node::Box(b) if !node.is_hidden() => b,
        _ => return Ok(LayoutBox::leaf(rect)),
    };

    let style = &b.style;
    let content = rect.inset(style.inner_edges());
    let containing = if style.position.is_positioned() {
        content
    } else {
        containing
    };

    let mut all = Vec::new();
    flow_children(&b.children, &mut all);
    let flow: Vec<&Node> = all
        .iter()
        .copied()
        .filter(|kid| !kid.is_hidden() && !is_out_of_flow(kid))
        .collect();
    let definite = definite_height.then_some(content.height);
    let mut flow_boxes = place_flow(style, &flow, content, definite, containing, depth)?.into_iter();

    let mut children = Vec::with_capacity(all.len());
    for kid in all {
        let child = if kid.is_hidden() {
            LayoutBox::leaf(Rect::new(content.x, content.y, 0, 0))
        } else if is_out_of_flow(kid) {
            layout_absolute(kid, containing, depth + 1)?
        } else {
            match flow_boxes.next() {
                Some(child) => child,
                None => LayoutBox::leaf(Rect::new(content.x, content.y, 0, 0)),
            }
        };
        children.push(child);
    }

    Ok(LayoutBox {
        rect,
        content,
        lines: Vec::new(),
        children,
    })
}

/// Size, align and recurse into the flow children of a container.
/// `definite` is the content height when it does not depend on the children.
fn place_flow(
    style: &BoxStyle,
    kids: &[&Node],
    content: Rect,
    definite: Option<u16>,
    containing: Rect,
    depth: usize,
) -> Result<Vec<LayoutBox>, LayoutError> {
    if kids.is_empty() {
        return Ok(Vec::new());
    }

    let row = style.flex_direction.is_row();
    let reverse = style.flex_direction.is_reverse();

    // Main sizes first, then cross sizes (rows need final widths for text).
    let (mains, crosses) = if row {
        let widths = row_main_sizes(kids, content.width, style.gap, depth)?;
        let mut heights = Vec::with_capacity(kids.len());
        for (kid, width) in kids.iter().zip(&widths) {
            heights.push(row_cross_size(
                kid,
                *width,
                content.height,
                definite,
                style.align_items,
                depth,
            )?);
        }
        (widths, heights)
    } else {
        let mut widths = Vec::with_capacity(kids.len());
        for kid in kids {
            widths.push(column_cross_size(kid, content.width, style.align_items, depth)?);
        }
        let heights = column_main_sizes(kids, &widths, content.height, definite, style.gap, depth)?;
        (heights, widths)
    };

    let main_size = if row { content.width } else { content.height };
    let cross_size = if row { content.height } else { content.width };
    let gaps = total_gap(style.gap, kids.len());

    let used: u32 = kids
        .iter()
        .zip(&mains)
        .map(|(kid, size)| *size as u32 + ItemProps::of(kid).margin.along(row) as u32)
        .sum::<u32>()
        + gaps as u32;
    let free = (main_size as u32).saturating_sub(used).min(u16::MAX as u32) as u16;
    let offsets = justify_offsets(style.justify_content, free, kids.len());

    let mut out = Vec::with_capacity(kids.len());
    let mut cursor: u32 = 0;
    for (i, kid) in kids.iter().enumerate() {
        let props = ItemProps::of(kid);
        let (margin_start, margin_end) = main_margins(props.margin, row, reverse);

        let start = cursor + offsets[i] as u32 + margin_start as u32;
        let main_pos = start.min(main_size as u32) as u16;
        let main_len = mains[i].min(main_size - main_pos);
        cursor += margin_start as u32 + mains[i] as u32 + margin_end as u32 + style.gap as u32;

        let main_pos = if reverse {
            main_size - main_pos - main_len
        } else {
            main_pos
        };

        let align = props.align_self.resolve(style.align_items);
        // Flex results inside a definite container are definite too.
        let kid_definite = props.height.resolve(definite).is_some()
            || (definite.is_some() && (!row || align == AlignItems::Stretch));
        let (cross_margin_start, cross_margins) = if row {
            (props.margin.top, props.margin.vertical())
        } else {
            (props.margin.left, props.margin.horizontal())
        };
        let cross_available = cross_size.saturating_sub(cross_margins);
        let cross_pos = cross_margin_start.saturating_add(cross_offset(align, cross_available, crosses[i]));

        let rect = if row {
            Rect::new(
                content.x.saturating_add(main_pos),
                content.y.saturating_add(cross_pos),
                main_len,
                crosses[i],
            )
        } else {
            Rect::new(
                content.x.saturating_add(cross_pos),
                content.y.saturating_add(main_pos),
                crosses[i],
                main_len,
            )
        };
        out.push(layout_node(kid, rect, kid_definite, containing, depth + 1)?);
    }
    Ok(out)
}

/// Place an out-of-flow box against `containing`.
fn layout_absolute(node: &Node, containing: Rect, depth: usize) -> Result<LayoutBox, LayoutError> {
    check_depth(depth)?;
    let Some(style) = node.box_style() else {
        return Ok(LayoutBox::leaf(Rect::new(containing.x, containing.y, 0, 0)));
    };
    let margin = style.margin;
    let cw = Some(containing.width);
    let ch = Some(containing.height);

    let width = match (style.width.resolve(cw), style.left, style.right) {
        (Some(width), _, _) => width,
        (None, Some(left), Some(right)) => containing
            .width
            .saturating_sub(left)
            .saturating_sub(right)
            .saturating_sub(margin.horizontal()),
        _ => intrinsic_width(node, cw, depth + 1)?
            .min(containing.width.saturating_sub(margin.horizontal())),
    };
    let width = clamp_dimension(width, style.min_width, style.max_width, cw);

    let height = match (style.height.resolve(ch), style.top, style.bottom) {
        (Some(height), _, _) => height,
        (None, Some(top), Some(bottom)) => containing
            .height
            .saturating_sub(top)
            .saturating_sub(bottom)
            .saturating_sub(margin.vertical()),
        _ => height_for_width(node, width, ch, depth + 1)?,
    };
    let height = clamp_dimension(height, style.min_height, style.max_height, ch);
    let definite_height =
        style.height.resolve(ch).is_some() || (style.top.is_some() && style.bottom.is_some());

    let x = match (style.left, style.right) {
        (Some(left), _) => containing.x.saturating_add(left).saturating_add(margin.left),
        (None, Some(right)) => containing
            .right()
            .saturating_sub(right)
            .saturating_sub(margin.right)
            .saturating_sub(width),
        (None, None) => containing.x.saturating_add(margin.left),
    };
    let y = match (style.top, style.bottom) {
        (Some(top), _) => containing.y.saturating_add(top).saturating_add(margin.top),
        (None, Some(bottom)) => containing
            .bottom()
            .saturating_sub(bottom)
            .saturating_sub(margin.bottom)
            .saturating_sub(height),
        (None, None) => containing.y.saturating_add(margin.top),
    };

    layout_node(node, Rect::new(x, y, width, height), definite_height, containing, depth)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{box_primitive, newline, spacer, text};
    use crate::types::{BorderStyle, Display, FlexDirection, JustifyContent};

    fn boxed(style: BoxStyle, children: impl IntoIterator<Item = Node>) -> Node {
        box_primitive(style, children)
    }

    fn widths(layout: &LayoutBox) -> Vec<u16> {
        layout.children.iter().map(|c| c.rect.width).collect()
    }

    fn grow(factor: f32) -> Node {
        boxed(
            BoxStyle {
                flex_grow: factor,
                ..Default::default()
            },
            [],
        )
    }

    #[test]
    fn test_row_fixed_and_growers() {
        let root = boxed(
            BoxStyle {
                width: Dimension::Cells(100),
                ..BoxStyle::row()
            },
            [
                boxed(
                    BoxStyle {
                        width: Dimension::Cells(30),
                        ..Default::default()
                    },
                    [],
                ),
                grow(1.0),
                grow(1.0),
            ],
        );
        let layout = compute_layout(&root, 120, 40).unwrap();
        assert_eq!(widths(&layout), vec![30, 35, 35]);
        let xs: Vec<u16> = layout.children.iter().map(|c| c.rect.x).collect();
        assert_eq!(xs, vec![0, 30, 65]);
    }

    #[test]
    fn test_row_weighted_growers() {
        let root = boxed(
            BoxStyle {
                width: Dimension::Cells(100),
                ..BoxStyle::row()
            },
            [grow(1.0), grow(2.0), grow(1.0)],
        );
        let layout = compute_layout(&root, 120, 40).unwrap();
        assert_eq!(widths(&layout), vec![25, 50, 25]);
    }

    #[test]
    fn test_column_stacks_text() {
        let root = boxed(BoxStyle::column(), [Node::from("one"), Node::from("two\nthree")]);
        let layout = compute_layout(&root, 20, 10).unwrap();
        assert_eq!(layout.rect, Rect::new(0, 0, 20, 3));
        assert_eq!(layout.children[0].rect, Rect::new(0, 0, 20, 1));
        assert_eq!(layout.children[1].rect, Rect::new(0, 1, 20, 2));
    }

    #[test]
    fn test_border_and_padding_shrink_content() {
        let root = boxed(
            BoxStyle {
                border: BorderStyle::Single,
                padding: Edges::symmetric(1, 0),
                ..Default::default()
            },
            [Node::from("hi")],
        );
        let layout = compute_layout(&root, 10, 5).unwrap();
        assert_eq!(layout.rect, Rect::new(0, 0, 10, 3));
        assert_eq!(layout.content, Rect::new(2, 1, 6, 1));
        assert_eq!(layout.children[0].rect, Rect::new(2, 1, 6, 1));
    }

    #[test]
    fn test_wrapped_text_feeds_auto_height() {
        let root = boxed(
            BoxStyle {
                width: Dimension::Cells(10),
                ..Default::default()
            },
            [Node::from("hello world foo")],
        );
        let layout = compute_layout(&root, 80, 24).unwrap();
        assert_eq!(layout.rect.height, 2);
        assert_eq!(layout.children[0].lines.len(), 2);
    }

    #[test]
    fn test_shrunk_row_text_wraps_and_grows_row() {
        let root = boxed(
            BoxStyle {
                width: Dimension::Cells(10),
                ..BoxStyle::row()
            },
            [Node::from("aaaa bbbb"), Node::from("cccc dddd")],
        );
        let layout = compute_layout(&root, 80, 24).unwrap();
        assert_eq!(widths(&layout), vec![5, 5]);
        assert_eq!(layout.rect.height, 2);
    }

    #[test]
    fn test_childless_auto_box_is_empty() {
        let root = boxed(
            BoxStyle {
                align_items: AlignItems::FlexStart,
                ..BoxStyle::row()
            },
            [boxed(BoxStyle::default(), [])],
        );
        let layout = compute_layout(&root, 80, 24).unwrap();
        assert_eq!(layout.children[0].rect.width, 0);
        assert_eq!(layout.children[0].rect.height, 0);
    }

    #[test]
    fn test_justify_and_align() {
        let item = || {
            boxed(
                BoxStyle {
                    width: Dimension::Cells(2),
                    height: Dimension::Cells(1),
                    ..Default::default()
                },
                [],
            )
        };
        let root = boxed(
            BoxStyle {
                width: Dimension::Cells(10),
                height: Dimension::Cells(3),
                justify_content: JustifyContent::SpaceBetween,
                align_items: AlignItems::Center,
                ..BoxStyle::row()
            },
            [item(), item(), item()],
        );
        let layout = compute_layout(&root, 80, 24).unwrap();
        let xs: Vec<u16> = layout.children.iter().map(|c| c.rect.x).collect();
        assert_eq!(xs, vec![0, 4, 8]);
        assert!(layout.children.iter().all(|c| c.rect.y == 1));
    }

    #[test]
    fn test_row_reverse() {
        let root = boxed(
            BoxStyle {
                width: Dimension::Cells(10),
                flex_direction: FlexDirection::RowReverse,
                ..Default::default()
            },
            [Node::from("ab"), Node::from("cd")],
        );
        let layout = compute_layout(&root, 80, 24).unwrap();
        assert_eq!(layout.children[0].rect.x, 8);
        assert_eq!(layout.children[1].rect.x, 6);
    }

    #[test]
    fn test_gap_and_margin() {
        let root = boxed(
            BoxStyle {
                gap: 2,
                ..BoxStyle::row()
            },
            [
                Node::from("a"),
                boxed(
                    BoxStyle {
                        margin: Edges {
                            left: 1,
                            ..Edges::ZERO
                        },
                        ..Default::default()
                    },
                    [Node::from("b")],
                ),
            ],
        );
        let layout = compute_layout(&root, 80, 24).unwrap();
        assert_eq!(layout.children[1].rect.x, 4);
    }

    #[test]
    fn test_percent_width() {
        let root = boxed(
            BoxStyle {
                width: Dimension::Cells(50),
                ..BoxStyle::row()
            },
            [boxed(
                BoxStyle {
                    width: Dimension::Percent(50.0),
                    ..Default::default()
                },
                [],
            )],
        );
        let layout = compute_layout(&root, 80, 24).unwrap();
        assert_eq!(layout.children[0].rect.width, 25);
    }

    #[test]
    fn test_percent_height_in_auto_parent_is_auto() {
        let half = boxed(
            BoxStyle {
                height: Dimension::Percent(50.0),
                ..Default::default()
            },
            [Node::from("a\nb\nc\nd")],
        );
        let root = boxed(BoxStyle::column(), [half, Node::from("x")]);
        let layout = compute_layout(&root, 20, 24).unwrap();
        assert_eq!(layout.rect.height, 5);
        assert_eq!(layout.children[0].rect.height, 4);
        assert_eq!(layout.children[0].children[0].lines.len(), 4);
        assert_eq!(layout.children[1].rect.y, 4);
    }

    #[test]
    fn test_percent_height_in_auto_row_is_auto() {
        let half = boxed(
            BoxStyle {
                height: Dimension::Percent(50.0),
                ..Default::default()
            },
            [Node::from("a\nb")],
        );
        let root = boxed(
            BoxStyle {
                align_items: AlignItems::FlexStart,
                ..BoxStyle::row()
            },
            [half, Node::from("1\n2\n3")],
        );
        let layout = compute_layout(&root, 20, 24).unwrap();
        assert_eq!(layout.rect.height, 3);
        assert_eq!(layout.children[0].rect.height, 2);
    }

    #[test]
    fn test_percent_height_in_definite_parent() {
        let half = boxed(
            BoxStyle {
                height: Dimension::Percent(50.0),
                ..Default::default()
            },
            [Node::from("a")],
        );
        let root = boxed(
            BoxStyle {
                height: Dimension::Cells(10),
                ..BoxStyle::column()
            },
            [half],
        );
        let layout = compute_layout(&root, 20, 24).unwrap();
        assert_eq!(layout.children[0].rect.height, 5);

        // A stretched row item of a fixed-height row passes its height on.
        let inner = boxed(
            BoxStyle {
                height: Dimension::Percent(50.0),
                ..Default::default()
            },
            [],
        );
        let row = boxed(
            BoxStyle {
                height: Dimension::Cells(8),
                ..BoxStyle::row()
            },
            [boxed(BoxStyle::column(), [inner])],
        );
        let layout = compute_layout(&row, 20, 24).unwrap();
        assert_eq!(layout.children[0].rect.height, 8);
        assert_eq!(layout.children[0].children[0].rect.height, 4);
    }

    #[test]
    fn test_rigid_overflow_is_clamped() {
        let rigid = || {
            boxed(
                BoxStyle {
                    width: Dimension::Cells(8),
                    flex_shrink: 0.0,
                    ..Default::default()
                },
                [],
            )
        };
        let root = boxed(
            BoxStyle {
                width: Dimension::Cells(10),
                ..BoxStyle::row()
            },
            [rigid(), rigid()],
        );
        let layout = compute_layout(&root, 80, 24).unwrap();
        assert_eq!(widths(&layout), vec![8, 2]);
        assert!(layout.children.iter().all(|c| c.rect.right() <= 10));
    }

    #[test]
    fn test_spacer_and_newline() {
        let row = boxed(
            BoxStyle {
                width: Dimension::Cells(10),
                ..BoxStyle::row()
            },
            [Node::from("a"), spacer(), Node::from("b")],
        );
        let root = boxed(BoxStyle::column(), [row, newline(2), Node::from("c")]);
        let layout = compute_layout(&root, 80, 24).unwrap();
        assert_eq!(layout.children[0].children[2].rect.x, 9);
        assert_eq!(layout.children[1].rect.height, 2);
        assert_eq!(layout.children[2].rect.y, 3);
    }

    #[test]
    fn test_absolute_uses_insets() {
        let overlay = boxed(
            BoxStyle {
                position: Position::Absolute,
                right: Some(1),
                top: Some(0),
                ..Default::default()
            },
            [Node::from("x")],
        );
        let root = boxed(
            BoxStyle {
                width: Dimension::Cells(10),
                height: Dimension::Cells(4),
                ..Default::default()
            },
            [Node::from("body"), overlay],
        );
        let layout = compute_layout(&root, 80, 24).unwrap();
        assert_eq!(layout.children[1].rect, Rect::new(8, 0, 1, 1));
        // The absolute child takes no flow space.
        assert_eq!(layout.children[0].rect.y, 0);
    }

    #[test]
    fn test_absolute_skips_static_ancestor() {
        let overlay = boxed(
            BoxStyle {
                position: Position::Absolute,
                left: Some(0),
                top: Some(0),
                ..Default::default()
            },
            [Node::from("x")],
        );
        let inner = boxed(
            BoxStyle {
                position: Position::Static,
                margin: Edges::all(2),
                ..Default::default()
            },
            [Node::from("inner"), overlay],
        );
        let root = boxed(
            BoxStyle {
                padding: Edges::all(1),
                ..Default::default()
            },
            [inner],
        );
        let layout = compute_layout(&root, 20, 10).unwrap();
        let placed = &layout.children[0].children[1];
        assert_eq!((placed.rect.x, placed.rect.y), (1, 1));
    }

    #[test]
    fn test_display_none_takes_no_space() {
        let hidden = boxed(
            BoxStyle {
                display: Display::None,
                ..Default::default()
            },
            [Node::from("gone")],
        );
        let root = boxed(BoxStyle::column(), [hidden, Node::from("shown")]);
        let layout = compute_layout(&root, 20, 10).unwrap();
        assert_eq!(layout.children.len(), 2);
        assert!(layout.children[0].rect.is_empty());
        assert_eq!(layout.children[1].rect.y, 0);
        assert_eq!(layout.rect.height, 1);
    }

    #[test]
    fn test_text_root_gets_implicit_box() {
        let layout = compute_layout(&text("hello").into(), 80, 24).unwrap();
        assert_eq!(layout.rect.width, 80);
        assert_eq!(layout.children.len(), 1);
        assert_eq!(layout.children[0].lines.len(), 1);
    }

    #[test]
    fn test_too_deep() {
        let mut node = Node::from("leaf");
        for _ in 0..(MAX_DEPTH + 10) {
            node = boxed(BoxStyle::default(), [node]);
        }
        let err = compute_layout(&node, 80, 24).unwrap_err();
        assert!(matches!(err, LayoutError::TooDeep { max: MAX_DEPTH, .. }));
    }
}
