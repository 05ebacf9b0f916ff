//! Fine-grained reactive core.
//!
//! # Model
//!
//! - [`Signal`]: a mutable cell. Reads inside a running effect subscribe it.
//! - [`Effect`]: a callback that re-runs when any signal it read on its
//!   latest run changes. Dependencies are rebuilt from scratch every run.
//! - [`Memo`]: a derived value, recomputed on change, renotifying only when
//!   the result differs.
//! - [`batch`]: coalesce writes so each effect runs at most once.
//! - [`untrack`]: read without subscribing.
//!
//! Everything is single-threaded. The runtime lives in a thread-local; effects
//! are stored in a generational arena and refer to each other by handle.
//!
//! # Ownership
//!
//! An effect created while another effect runs becomes its child. Children
//! are disposed before the parent re-runs and when the parent is disposed.
//!
//! # Re-entrancy
//!
//! A write that would trigger the effect currently running is dropped; the
//! effect does not run again for it. Writes from inside an effect to signals
//! read by *other* effects are delivered once the writing effect returns.

mod effect;
mod memo;
mod runtime;
mod signal;

pub use effect::{Effect, batch, create_effect, live_effect_count, on_cleanup, untrack};
pub use memo::{Memo, create_memo};
pub use signal::{ReadSignal, Signal, WriteSignal, create_signal};

pub(crate) use effect::create_deferred_effect;
