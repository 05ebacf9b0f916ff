//! Render-node model.
//!
//! Producers build an immutable [`Node`] tree out of:
//!
//! - [`box_primitive`]: flex container with borders, padding, colors
//! - [`text`]: styled text runs (nest with [`TextNode::child`])
//! - [`spacer`]: flexible empty space
//! - [`newline`]: blank lines
//! - [`fragment`]: splice several children in place
//! - [`static_items`]: append-only output above the live frame
//!
//! # Example
//!
//! ```
//! use ember_tui::primitives::{box_primitive, spacer, text, BoxStyle};
//! use ember_tui::types::BorderStyle;
//!
//! let tree = box_primitive(
//!     BoxStyle { border: BorderStyle::Round, ..BoxStyle::row() },
//!     [text("left").into(), spacer(), text("right").fg("green").into()],
//! );
//! # let _ = tree;
//! ```

mod node;
mod text;
mod types;

pub use node::{
    BoxNode, Node, StaticNode, box_primitive, collect_static, flow_children, fragment, newline,
    spacer, static_items,
};
pub use text::{TextChild, TextNode, TextSpan, text};
pub use types::{BoxStyle, ColorValue, TextStyle};
