//! Render loop.
//!
//! Ties the reactive core to the terminal:
//!
//! ```text
//! producer (root effect) → Node → compute_layout → paint → diff → stdout
//!        ↑                                                          │
//!        └────── signal write marks dirty, tick renders ────────────┘
//! ```
//!
//! - [`render`] mounts an [`Instance`]; [`Instance::tick`] and
//!   [`Instance::wait_until_exit`] drive it cooperatively on one thread.
//! - [`render_once`] and [`render_to_string`] draw a tree once, with no
//!   state.
//! - [`TerminalCaps`] describes the output terminal; [`InputSource`] feeds
//!   key and resize events.

mod capture;
mod input;
mod mount;
mod render_once;
mod terminal;
mod throttle;

pub use capture::SharedBuffer;
pub use input::{CrosstermInput, InputEvent, InputSource, ScriptedInput};
pub use mount::{ExitOutcome, Instance, IntoProducer, Producer, RenderOptions, render};
pub use render_once::{render_once, render_to_string, render_with};
pub use terminal::TerminalCaps;
