//! Reactive runtime.
//!
//! One runtime per thread. It owns:
//! - the effect arena (generational slots with a free list)
//! - the signal → subscriber table, in subscription order
//! - the observer stack of [`Frame`]s used for dependency tracking
//! - the pending-run queue and the batch depth
//!
//! User callbacks are never invoked while a `RefCell` borrow of the runtime is
//! held, and user values (callbacks, cleanups) are always dropped after the
//! borrow is released: dropping a closure can drop signals, which call back
//! into the runtime.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use tracing::trace;

thread_local! {
    static RUNTIME: Runtime = Runtime::new();
}

/// Run `f` with this thread's runtime.
pub(crate) fn with_runtime<R>(f: impl FnOnce(&Runtime) -> R) -> R {
    RUNTIME.with(f)
}

/// Like [`with_runtime`] but a no-op once the thread-local is torn down.
pub(crate) fn try_with_runtime(f: impl FnOnce(&Runtime)) {
    let _ = RUNTIME.try_with(f);
}

// =============================================================================
// Ids
// =============================================================================

/// Identifies a signal for dependency bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct SignalId(u64);

/// Generational handle into the effect arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EffectId {
    index: u32,
    generation: u32,
}

pub(crate) type Callback = Box<dyn FnMut()>;
pub(crate) type Cleanup = Box<dyn FnOnce()>;
pub(crate) type InvalidateHook = Rc<dyn Fn()>;

// =============================================================================
// Effect records
// =============================================================================

#[derive(Default)]
struct EffectRecord {
    generation: u32,
    alive: bool,
    /// `None` while the callback is executing.
    callback: Option<Callback>,
    cleanups: Vec<Cleanup>,
    deps: Vec<SignalId>,
    parent: Option<EffectId>,
    children: Vec<EffectId>,
    running: bool,
    queued: bool,
    /// Deferred effects call this instead of re-running.
    on_invalidate: Option<InvalidateHook>,
}

/// One entry of the observer stack.
#[derive(Debug, Clone, Copy)]
struct Frame {
    effect: Option<EffectId>,
    tracking: bool,
}

/// What the flush loop should do with a dequeued effect.
enum Pending {
    Run,
    Invalidate(InvalidateHook),
    Skip,
}

// =============================================================================
// Runtime
// =============================================================================

pub(crate) struct Runtime {
    effects: RefCell<Vec<EffectRecord>>,
    free: RefCell<Vec<u32>>,
    subscribers: RefCell<HashMap<SignalId, Vec<EffectId>>>,
    next_signal: Cell<u64>,
    stack: RefCell<Vec<Frame>>,
    queue: RefCell<VecDeque<EffectId>>,
    batch_depth: Cell<usize>,
    flushing: Cell<bool>,
}

impl Runtime {
    fn new() -> Self {
        Self {
            effects: RefCell::new(Vec::new()),
            free: RefCell::new(Vec::new()),
            subscribers: RefCell::new(HashMap::new()),
            next_signal: Cell::new(0),
            stack: RefCell::new(Vec::new()),
            queue: RefCell::new(VecDeque::new()),
            batch_depth: Cell::new(0),
            flushing: Cell::new(false),
        }
    }

    // -------------------------------------------------------------------------
    // Signals
    // -------------------------------------------------------------------------

    pub(crate) fn next_signal_id(&self) -> SignalId {
        let id = self.next_signal.get();
        self.next_signal.set(id + 1);
        SignalId(id)
    }

    pub(crate) fn remove_signal(&self, signal: SignalId) {
        self.subscribers.borrow_mut().remove(&signal);
    }

    pub(crate) fn subscriber_count(&self, signal: SignalId) -> usize {
        self.subscribers
            .borrow()
            .get(&signal)
            .map_or(0, |subs| subs.len())
    }

    /// Register `signal` as a dependency of the effect on top of the stack.
    pub(crate) fn track(&self, signal: SignalId) {
        let Some(frame) = self.stack.borrow().last().copied() else {
            return;
        };
        let Some(effect) = frame.effect else {
            return;
        };
        if !frame.tracking {
            return;
        }

        {
            let mut effects = self.effects.borrow_mut();
            let Some(record) = Self::record_mut(&mut effects, effect) else {
                return;
            };
            if record.deps.contains(&signal) {
                return;
            }
            record.deps.push(signal);
        }

        let mut subscribers = self.subscribers.borrow_mut();
        let subs = subscribers.entry(signal).or_default();
        if !subs.contains(&effect) {
            subs.push(effect);
        }
    }

    /// Queue every live subscriber of `signal`, then flush unless a batch or
    /// an effect run is in progress.
    pub(crate) fn notify(&self, signal: SignalId) {
        let subs = match self.subscribers.borrow().get(&signal) {
            Some(subs) => subs.clone(),
            None => return,
        };

        {
            let mut effects = self.effects.borrow_mut();
            let mut queue = self.queue.borrow_mut();
            for effect in subs {
                let Some(record) = Self::record_mut(&mut effects, effect) else {
                    continue;
                };
                // Re-entrant triggers are dropped.
                if record.running || record.queued {
                    continue;
                }
                record.queued = true;
                queue.push_back(effect);
            }
        }

        self.flush_if_idle();
    }

    // -------------------------------------------------------------------------
    // Effects
    // -------------------------------------------------------------------------

    /// Allocate an effect owned by the effect currently on the stack.
    pub(crate) fn alloc_effect(
        &self,
        callback: Callback,
        on_invalidate: Option<InvalidateHook>,
    ) -> EffectId {
        let parent = self.current_effect();

        let id = {
            let mut effects = self.effects.borrow_mut();
            let index = match self.free.borrow_mut().pop() {
                Some(index) => index,
                None => {
                    effects.push(EffectRecord::default());
                    (effects.len() - 1) as u32
                }
            };
            let record = &mut effects[index as usize];
            record.alive = true;
            record.running = false;
            record.queued = false;
            record.callback = Some(callback);
            record.parent = parent;
            record.on_invalidate = on_invalidate;
            EffectId {
                index,
                generation: record.generation,
            }
        };

        if let Some(parent) = parent {
            let mut effects = self.effects.borrow_mut();
            if let Some(record) = Self::record_mut(&mut effects, parent) {
                record.children.push(id);
            }
        }

        id
    }

    pub(crate) fn is_alive(&self, effect: EffectId) -> bool {
        let mut effects = self.effects.borrow_mut();
        Self::record_mut(&mut effects, effect).is_some()
    }

    pub(crate) fn live_effect_count(&self) -> usize {
        self.effects.borrow().iter().filter(|r| r.alive).count()
    }

    pub(crate) fn dependency_count(&self, effect: EffectId) -> usize {
        let mut effects = self.effects.borrow_mut();
        Self::record_mut(&mut effects, effect).map_or(0, |r| r.deps.len())
    }

    /// Run an effect: dispose its children, run its cleanups, rebuild its
    /// dependencies from scratch while the callback executes.
    pub(crate) fn run_effect(&self, effect: EffectId) {
        let (callback, children, cleanups, deps) = {
            let mut effects = self.effects.borrow_mut();
            let Some(record) = Self::record_mut(&mut effects, effect) else {
                return;
            };
            let Some(callback) = record.callback.take() else {
                return;
            };
            record.running = true;
            (
                callback,
                std::mem::take(&mut record.children),
                std::mem::take(&mut record.cleanups),
                std::mem::take(&mut record.deps),
            )
        };

        self.unsubscribe(effect, &deps);
        for child in children {
            self.dispose_effect(child);
        }
        for cleanup in cleanups {
            cleanup();
        }

        trace!(effect = effect.index, "running effect");

        self.stack.borrow_mut().push(Frame {
            effect: Some(effect),
            tracking: true,
        });
        self.batch_depth.set(self.batch_depth.get() + 1);

        let mut guard = RunGuard {
            runtime: self,
            effect,
            callback: Some(callback),
        };
        if let Some(callback) = guard.callback.as_mut() {
            callback();
        }
    }

    /// Dispose an effect and, recursively, its children.
    pub(crate) fn dispose_effect(&self, effect: EffectId) {
        let (callback, children, cleanups, deps, parent) = {
            let mut effects = self.effects.borrow_mut();
            let Some(record) = Self::record_mut(&mut effects, effect) else {
                return;
            };
            record.alive = false;
            record.running = false;
            record.queued = false;
            record.on_invalidate = None;
            let taken = (
                record.callback.take(),
                std::mem::take(&mut record.children),
                std::mem::take(&mut record.cleanups),
                std::mem::take(&mut record.deps),
                record.parent.take(),
            );
            record.generation = record.generation.wrapping_add(1);
            taken
        };
        self.free.borrow_mut().push(effect.index);

        trace!(effect = effect.index, "disposing effect");

        self.unsubscribe(effect, &deps);
        for child in children {
            self.dispose_effect(child);
        }
        for cleanup in cleanups {
            cleanup();
        }

        if let Some(parent) = parent {
            let mut effects = self.effects.borrow_mut();
            if let Some(record) = Self::record_mut(&mut effects, parent) {
                record.children.retain(|c| *c != effect);
            }
        }

        drop(callback);
    }

    /// Attach a cleanup to the effect currently on the stack. Returns the
    /// cleanup back when there is no effect to own it.
    pub(crate) fn add_cleanup(&self, cleanup: Cleanup) -> Option<Cleanup> {
        let Some(effect) = self.current_effect() else {
            return Some(cleanup);
        };
        let mut effects = self.effects.borrow_mut();
        match Self::record_mut(&mut effects, effect) {
            Some(record) => {
                record.cleanups.push(cleanup);
                None
            }
            None => Some(cleanup),
        }
    }

    fn current_effect(&self) -> Option<EffectId> {
        self.stack.borrow().last().and_then(|frame| frame.effect)
    }

    fn unsubscribe(&self, effect: EffectId, deps: &[SignalId]) {
        let mut subscribers = self.subscribers.borrow_mut();
        for signal in deps {
            if let Some(subs) = subscribers.get_mut(signal) {
                subs.retain(|e| *e != effect);
            }
        }
    }

    fn record_mut(effects: &mut [EffectRecord], id: EffectId) -> Option<&mut EffectRecord> {
        effects
            .get_mut(id.index as usize)
            .filter(|r| r.alive && r.generation == id.generation)
    }

    // -------------------------------------------------------------------------
    // Scheduling
    // -------------------------------------------------------------------------

    pub(crate) fn enter_batch(&self) {
        self.batch_depth.set(self.batch_depth.get() + 1);
    }

    pub(crate) fn exit_batch(&self) {
        self.batch_depth.set(self.batch_depth.get().saturating_sub(1));
        if !std::thread::panicking() {
            self.flush_if_idle();
        }
    }

    pub(crate) fn push_untracked(&self) {
        let effect = self.current_effect();
        self.stack.borrow_mut().push(Frame {
            effect,
            tracking: false,
        });
    }

    pub(crate) fn pop_frame(&self) {
        self.stack.borrow_mut().pop();
    }

    fn flush_if_idle(&self) {
        if self.batch_depth.get() == 0 && !self.flushing.get() {
            self.flush();
        }
    }

    /// Drain the queue in notification order.
    fn flush(&self) {
        self.flushing.set(true);
        let _guard = FlushGuard { runtime: self };

        loop {
            let Some(effect) = self.queue.borrow_mut().pop_front() else {
                break;
            };

            let pending = {
                let mut effects = self.effects.borrow_mut();
                match Self::record_mut(&mut effects, effect) {
                    Some(record) => {
                        record.queued = false;
                        match &record.on_invalidate {
                            Some(hook) => Pending::Invalidate(Rc::clone(hook)),
                            None => Pending::Run,
                        }
                    }
                    None => Pending::Skip,
                }
            };

            match pending {
                Pending::Run => self.run_effect(effect),
                Pending::Invalidate(hook) => hook(),
                Pending::Skip => {}
            }
        }
    }
}

/// Restores effect state after its callback returns or unwinds.
struct RunGuard<'a> {
    runtime: &'a Runtime,
    effect: EffectId,
    callback: Option<Callback>,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        let rt = self.runtime;
        rt.stack.borrow_mut().pop();

        let orphaned = {
            let mut effects = rt.effects.borrow_mut();
            match Runtime::record_mut(&mut effects, self.effect) {
                Some(record) => {
                    record.running = false;
                    record.callback = self.callback.take();
                    None
                }
                // Disposed during its own run.
                None => self.callback.take(),
            }
        };
        drop(orphaned);

        rt.exit_batch();
    }
}

struct FlushGuard<'a> {
    runtime: &'a Runtime,
}

impl Drop for FlushGuard<'_> {
    fn drop(&mut self) {
        self.runtime.flushing.set(false);
        if std::thread::panicking() {
            // Leave no stale queued flags behind after an unwind.
            let drained: Vec<EffectId> = self.runtime.queue.borrow_mut().drain(..).collect();
            let mut effects = self.runtime.effects.borrow_mut();
            for effect in drained {
                if let Some(record) = Runtime::record_mut(&mut effects, effect) {
                    record.queued = false;
                }
            }
        }
    }
}
