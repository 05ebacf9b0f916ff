//! Effects, cleanups, batching and untracked reads.

use std::rc::Rc;

use super::runtime::{EffectId, try_with_runtime, with_runtime};

/// Handle to a running effect.
///
/// Effects are owned by the effect that was running when they were created
/// and are disposed when that parent re-runs or is disposed. Top-level
/// effects live until [`dispose`](Effect::dispose) is called; dropping the
/// handle does not stop them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Effect {
    id: EffectId,
}

impl Effect {
    /// Stop the effect: runs its cleanups, disposes its children and removes
    /// it from every signal it read. Idempotent.
    pub fn dispose(&self) {
        with_runtime(|rt| rt.dispose_effect(self.id));
    }

    /// Like [`dispose`](Effect::dispose), but a no-op once the thread's
    /// runtime is gone. For use from `Drop`.
    pub(crate) fn try_dispose(&self) {
        try_with_runtime(|rt| rt.dispose_effect(self.id));
    }

    pub fn is_disposed(&self) -> bool {
        !with_runtime(|rt| rt.is_alive(self.id))
    }

    /// Number of signals read during the latest run. Diagnostic.
    pub fn dependency_count(&self) -> usize {
        with_runtime(|rt| rt.dependency_count(self.id))
    }

    /// Run the effect now, rebuilding its dependencies.
    pub(crate) fn run(&self) {
        with_runtime(|rt| rt.run_effect(self.id));
    }
}

/// Create an effect and run it immediately.
///
/// Every signal read during a run becomes a dependency; signals not read on
/// the latest run are dropped. Cleanups registered with [`on_cleanup`] during
/// a run execute before the next run and on disposal.
pub fn create_effect(f: impl FnMut() + 'static) -> Effect {
    let id = with_runtime(|rt| rt.alloc_effect(Box::new(f), None));
    let effect = Effect { id };
    effect.run();
    effect
}

/// Create an effect that is not run on creation and, when one of its
/// dependencies changes, calls `on_invalidate` instead of re-running.
///
/// The owner decides when to call [`Effect::run`]. The render loop uses this
/// to throttle redraws.
pub(crate) fn create_deferred_effect(
    f: impl FnMut() + 'static,
    on_invalidate: impl Fn() + 'static,
) -> Effect {
    let id = with_runtime(|rt| rt.alloc_effect(Box::new(f), Some(Rc::new(on_invalidate))));
    Effect { id }
}

/// Register a cleanup on the currently running effect.
///
/// Outside an effect there is nothing to attach to and `f` is dropped without
/// running.
pub fn on_cleanup(f: impl FnOnce() + 'static) {
    let rejected = with_runtime(|rt| rt.add_cleanup(Box::new(f)));
    drop(rejected);
}

/// Run `f`, deferring effect notifications until it returns.
///
/// Each affected effect runs at most once per outermost batch. Nested
/// batches flatten into the outermost one.
pub fn batch<R>(f: impl FnOnce() -> R) -> R {
    struct BatchGuard;

    impl Drop for BatchGuard {
        fn drop(&mut self) {
            with_runtime(|rt| rt.exit_batch());
        }
    }

    with_runtime(|rt| rt.enter_batch());
    let _guard = BatchGuard;
    f()
}

/// Run `f` without registering any dependency on the running effect.
pub fn untrack<R>(f: impl FnOnce() -> R) -> R {
    struct UntrackGuard;

    impl Drop for UntrackGuard {
        fn drop(&mut self) {
            with_runtime(|rt| rt.pop_frame());
        }
    }

    with_runtime(|rt| rt.push_untracked());
    let _guard = UntrackGuard;
    f()
}

/// Number of effects alive on this thread. Diagnostic.
pub fn live_effect_count() -> usize {
    with_runtime(|rt| rt.live_effect_count())
}
