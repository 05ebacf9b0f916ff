//! Error types.
//!
//! Layout and paint failures are local to one frame. `RenderError` is what the
//! render loop surfaces to the caller: it is `Clone` so the same outcome can be
//! handed to every exit listener.

use std::io;
use std::sync::Arc;

use thiserror::Error;

/// Fatal layout failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("node tree exceeds maximum nesting depth of {max} (at depth {depth})")]
    TooDeep { depth: usize, max: usize },
}

/// A style value the renderer could not resolve.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaintError {
    #[error("unrecognized color: {0:?}")]
    InvalidColor(String),
}

/// Errors surfaced by the render loop.
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    #[error("layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("producer panicked: {0}")]
    Producer(String),

    #[error("terminal I/O failed: {0}")]
    Io(Arc<io::Error>),

    #[error("instance is unmounted")]
    Unmounted,
}

impl From<io::Error> for RenderError {
    fn from(err: io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}

impl RenderError {
    /// Build a `Producer` error from a `catch_unwind` payload.
    pub fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self::Producer(message)
    }
}
