//! Static region: output written once, permanently, above the live frame.
//!
//! Each [`Node::Static`] in the tree is a list the application only appends
//! to. The ledger remembers how many items of each list were already flushed
//! (by document order) and hands out only the new ones. Flushed rows are
//! never diffed or repainted; they scroll away with the terminal.

use crate::error::LayoutError;
use crate::layout::compute_layout;
use crate::primitives::{BoxNode, Node, StaticNode, collect_static};
use crate::types::ColorMode;

use super::ansi;
use super::output::{OutputBuffer, StatefulCellRenderer};
use super::paint::{PaintOptions, paint};

/// Items not yet flushed from one static node.
#[derive(Debug, Clone)]
pub struct PendingStatic {
    pub node: Node,
    pub count: usize,
}

/// Per-static-node flushed counts. Counts only ever grow.
#[derive(Debug, Default, Clone)]
pub struct StaticLedger {
    flushed: Vec<usize>,
}

impl StaticLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the items appended since the last call and mark them flushed.
    ///
    /// The returned nodes are boxes styled like their static node holding
    /// only the new items. A list that got shorter yields nothing until it
    /// grows past its previous length.
    pub fn take_new(&mut self, root: &Node) -> Vec<PendingStatic> {
        let statics = collect_static(root);
        if self.flushed.len() < statics.len() {
            self.flushed.resize(statics.len(), 0);
        }

        let mut pending = Vec::new();
        for (slot, node) in self.flushed.iter_mut().zip(statics) {
            if node.items.len() > *slot {
                pending.push(new_items(node, *slot));
                *slot = node.items.len();
            }
        }
        pending
    }

    /// Flushed count for the static node at `index` in document order.
    pub fn flushed(&self, index: usize) -> usize {
        self.flushed.get(index).copied().unwrap_or(0)
    }

    pub fn total_flushed(&self) -> usize {
        self.flushed.iter().sum()
    }
}

fn new_items(node: &StaticNode, from: usize) -> PendingStatic {
    let items = &node.items[from..];
    PendingStatic {
        node: Node::Box(BoxNode {
            style: node.style.clone(),
            children: items.iter().cloned().collect(),
        }),
        count: items.len(),
    }
}

/// Lay out and paint `pending` in a `width` x `height` viewport, producing
/// rows ready to write at column zero. Every row ends with `\r\n`.
pub fn render_static(
    pending: &[PendingStatic],
    width: u16,
    height: u16,
    unicode: bool,
    mode: ColorMode,
) -> Result<Vec<u8>, LayoutError> {
    let mut out = OutputBuffer::new();
    let mut cells = StatefulCellRenderer::new(mode);
    let options = PaintOptions {
        unicode,
        width: Some(width),
    };

    for entry in pending {
        let layout = compute_layout(&entry.node, width, height)?;
        let frame = paint(&entry.node, &layout, &options);
        for y in 0..frame.height() {
            // Writes into memory cannot fail.
            let _ = cells
                .render_row(&mut out, frame.row(y))
                .and_then(|()| cells.finish(&mut out))
                .and_then(|()| ansi::newline(&mut out));
        }
    }
    Ok(out.take())
}
