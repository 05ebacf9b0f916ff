//! Terminal renderer.
//!
//! Painting turns a laid-out node tree into a [`FrameBuffer`] of styled cells.
//! From there the renderer knows only about cells: [`diff`] compares two
//! frames and emits the ANSI bytes that turn one into the other.
//!
//! - [`paint`]: node tree + layout into a frame
//! - [`diff`] / [`DiffRenderer`]: minimal inline updates between frames
//! - [`static_region`]: append-only output above the live frame
//! - [`ansi`]: escape sequences

pub mod ansi;
pub mod buffer;
pub mod diff;
pub mod output;
pub mod paint;
pub mod static_region;

pub use buffer::{CellStyle, FrameBuffer};
pub use diff::{DiffRenderer, diff};
pub use output::{OutputBuffer, StatefulCellRenderer};
pub use paint::{PaintOptions, paint};
pub use static_region::{PendingStatic, StaticLedger, render_static};
