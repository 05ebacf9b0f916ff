//! Render nodes.
//!
//! A [`Node`] is an immutable tree value. Children live in `Rc<[Node]>` so a
//! producer can hand out subtrees without copying them, and nothing in the
//! pipeline ever mutates a tree after construction.

use std::rc::Rc;

use super::text::TextNode;
use super::types::BoxStyle;
use crate::types::Display;

/// One node of the render tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Flex container.
    Box(BoxNode),
    /// Styled text runs.
    Text(TextNode),
    /// Flexible empty space (`flex_grow: 1` along the parent's main axis).
    Spacer,
    /// `n` empty lines.
    Newline(u16),
    /// Children spliced into the parent in place.
    Fragment(Rc<[Node]>),
    /// Append-only items written once above the live frame.
    Static(StaticNode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxNode {
    pub style: BoxStyle,
    pub children: Rc<[Node]>,
}

/// Items rendered permanently above the live region.
///
/// Only items past the count already flushed by the render loop are written,
/// so callers append to the list and never rewrite earlier entries.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticNode {
    pub style: BoxStyle,
    pub items: Rc<[Node]>,
}

impl Node {
    /// The box style, if this is a box.
    pub fn box_style(&self) -> Option<&BoxStyle> {
        match self {
            Node::Box(b) => Some(&b.style),
            _ => None,
        }
    }

    /// True for boxes with `display: none`.
    pub fn is_hidden(&self) -> bool {
        matches!(self, Node::Box(b) if b.style.display == Display::None)
    }
}

impl From<BoxNode> for Node {
    fn from(node: BoxNode) -> Self {
        Node::Box(node)
    }
}

impl From<StaticNode> for Node {
    fn from(node: StaticNode) -> Self {
        Node::Static(node)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Text(super::text::text(s))
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Text(super::text::text(s))
    }
}

// =============================================================================
// Constructors
// =============================================================================

/// A box with the given style and children.
pub fn box_primitive(style: BoxStyle, children: impl IntoIterator<Item = Node>) -> Node {
    Node::Box(BoxNode {
        style,
        children: children.into_iter().collect(),
    })
}

pub fn spacer() -> Node {
    Node::Spacer
}

pub fn newline(count: u16) -> Node {
    Node::Newline(count)
}

pub fn fragment(children: impl IntoIterator<Item = Node>) -> Node {
    Node::Fragment(children.into_iter().collect())
}

/// Static items laid out as a column.
pub fn static_items(items: impl IntoIterator<Item = Node>) -> Node {
    Node::Static(StaticNode {
        style: BoxStyle::column(),
        items: items.into_iter().collect(),
    })
}

// =============================================================================
// Traversal
// =============================================================================

/// Append the flow children of `children` to `out`, splicing fragments and
/// skipping static nodes (those are painted outside the live frame).
pub fn flow_children<'a>(children: &'a [Node], out: &mut Vec<&'a Node>) {
    for child in children {
        match child {
            Node::Fragment(inner) => flow_children(inner, out),
            Node::Static(_) => {}
            _ => out.push(child),
        }
    }
}

/// All static nodes in document order.
pub fn collect_static(root: &Node) -> Vec<&StaticNode> {
    fn walk<'a>(node: &'a Node, out: &mut Vec<&'a StaticNode>) {
        match node {
            Node::Static(s) => out.push(s),
            Node::Box(b) => b.children.iter().for_each(|c| walk(c, out)),
            Node::Fragment(children) => children.iter().for_each(|c| walk(c, out)),
            Node::Text(_) | Node::Spacer | Node::Newline(_) => {}
        }
    }

    let mut out = Vec::new();
    walk(root, &mut out);
    out
}
