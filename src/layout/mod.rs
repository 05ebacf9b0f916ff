//! Layout Module
//!
//! Flexbox layout for terminal cells.
//!
//! [`compute_layout`] turns a [`Node`](crate::primitives::Node) tree into a
//! [`LayoutBox`] tree of absolute rectangles. Sizes are whole cells; free
//! space is distributed with cumulative rounding so siblings always add up to
//! their container (see [`flex`]).
//!
//! # Example
//!
//! ```
//! use ember_tui::layout::compute_layout;
//! use ember_tui::primitives::{box_primitive, BoxStyle, Node};
//!
//! let tree = box_primitive(BoxStyle::row(), [Node::from("a"), Node::from("b")]);
//! let layout = compute_layout(&tree, 80, 24).unwrap();
//! assert_eq!(layout.children[1].rect.x, 1);
//! ```

pub mod flex;
mod text_measure;
mod titan;
mod types;

pub use text_measure::*;
pub use titan::{MAX_DEPTH, compute_layout};
pub use types::LayoutBox;

pub(crate) use titan::root_node;
