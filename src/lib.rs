//! # ember-tui
//!
//! Reactive terminal UI engine.
//!
//! Describe the screen as a tree of boxes, text and spacers; read signals
//! while building it; the render loop keeps the terminal in sync by re-running
//! the producer when those signals change and writing only the cells that
//! differ from the previous frame.
//!
//! ## Architecture
//!
//! ```text
//! reactive (signals/effects) → primitives (Node tree) → layout (TITAN flex)
//!     → renderer (paint + diff) → pipeline (render loop, terminal I/O)
//! ```
//!
//! ## Modules
//!
//! - [`reactive`] - Signals, effects, memos, batching
//! - [`primitives`] - Immutable render nodes and their styles
//! - [`layout`] - Flexbox layout and text measurement
//! - [`renderer`] - Frame buffers, painting, ANSI diffing
//! - [`pipeline`] - Mounting, the render loop, one-shot rendering
//! - [`types`] - Colors, cells, rectangles, layout enums
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```
//! use ember_tui::pipeline::render_to_string;
//! use ember_tui::primitives::{box_primitive, spacer, text, BoxStyle, Node};
//! use ember_tui::types::Dimension;
//!
//! let tree = box_primitive(
//!     BoxStyle { width: Dimension::Cells(12), ..BoxStyle::row() },
//!     [text("ready").into(), spacer(), Node::from("42")],
//! );
//! assert_eq!(render_to_string(&tree, 80)?, "ready     42");
//! # Ok::<(), ember_tui::error::RenderError>(())
//! ```

pub mod error;
pub mod layout;
pub mod pipeline;
pub mod primitives;
pub mod reactive;
pub mod renderer;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::{LayoutError, PaintError, RenderError};

pub use reactive::{
    Effect, Memo, ReadSignal, Signal, WriteSignal, batch, create_effect, create_memo,
    create_signal, on_cleanup, untrack,
};

pub use primitives::{
    BoxStyle, Node, TextNode, TextStyle, box_primitive, fragment, newline, spacer, static_items,
    text,
};

pub use layout::{LayoutBox, compute_layout, string_width, truncate_text, wrap_text};

pub use renderer::{DiffRenderer, FrameBuffer, PaintOptions, diff, paint};

pub use pipeline::{
    Instance, RenderOptions, TerminalCaps, render, render_once, render_to_string,
};
