//! Layout output.

use crate::types::Rect;

use super::text_measure::TextLine;

/// Computed geometry for one node, in absolute cell coordinates.
///
/// `children` mirrors the node's flow children (fragments spliced, static
/// nodes skipped) one to one, including absolutely positioned and hidden
/// children so the painter can walk both trees in lockstep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutBox {
    /// Border box.
    pub rect: Rect,
    /// Border box minus border and padding.
    pub content: Rect,
    /// Laid-out lines for text nodes; empty otherwise.
    pub lines: Vec<TextLine>,
    pub children: Vec<LayoutBox>,
}

impl LayoutBox {
    pub fn leaf(rect: Rect) -> Self {
        Self {
            rect,
            content: rect,
            lines: Vec::new(),
            children: Vec::new(),
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.rect.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.rect.height
    }

    /// Depth-first iterator over this box and its descendants.
    pub fn walk(&self) -> impl Iterator<Item = &LayoutBox> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(next.children.iter().rev());
            Some(next)
        })
    }
}
