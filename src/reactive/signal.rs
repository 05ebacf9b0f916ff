//! Signals: mutable cells that notify the effects reading them.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::runtime::{SignalId, try_with_runtime, with_runtime};

struct SignalInner<T> {
    id: SignalId,
    value: RefCell<T>,
}

impl<T> Drop for SignalInner<T> {
    fn drop(&mut self) {
        let id = self.id;
        try_with_runtime(|rt| rt.remove_signal(id));
    }
}

/// A reactive value.
///
/// Cloning is cheap and every clone refers to the same cell. Reading with
/// [`get`](Signal::get) or [`with`](Signal::with) inside a running effect makes
/// that effect a subscriber; writing a value different from the current one
/// re-runs the subscribers (or defers them to the enclosing [`batch`]).
///
/// ```
/// use ember_tui::reactive::{Signal, create_effect};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let count = Signal::new(1);
/// let seen = Rc::new(Cell::new(0));
///
/// let c = count.clone();
/// let s = seen.clone();
/// create_effect(move || s.set(c.get()));
/// assert_eq!(seen.get(), 1);
///
/// count.set(2);
/// assert_eq!(seen.get(), 2);
/// ```
///
/// [`batch`]: super::batch
pub struct Signal<T> {
    inner: Rc<SignalInner<T>>,
}

impl<T: 'static> Signal<T> {
    pub fn new(value: T) -> Self {
        let id = with_runtime(|rt| rt.next_signal_id());
        Self {
            inner: Rc::new(SignalInner {
                id,
                value: RefCell::new(value),
            }),
        }
    }

    /// Read through a reference, tracking the dependency.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.track();
        f(&self.inner.value.borrow())
    }

    /// Read through a reference without tracking.
    pub fn with_untracked<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Number of effects currently subscribed. Diagnostic.
    pub fn subscriber_count(&self) -> usize {
        with_runtime(|rt| rt.subscriber_count(self.inner.id))
    }

    fn track(&self) {
        with_runtime(|rt| rt.track(self.inner.id));
    }

    fn notify(&self) {
        with_runtime(|rt| rt.notify(self.inner.id));
    }
}

impl<T: Clone + 'static> Signal<T> {
    /// Current value, tracking the dependency.
    pub fn get(&self) -> T {
        self.track();
        self.inner.value.borrow().clone()
    }

    /// Current value without tracking.
    pub fn get_untracked(&self) -> T {
        self.inner.value.borrow().clone()
    }
}

impl<T: PartialEq + 'static> Signal<T> {
    /// Store `value`. Equal values are ignored and notify nobody.
    pub fn set(&self, value: T) {
        {
            let mut current = self.inner.value.borrow_mut();
            if *current == value {
                return;
            }
            *current = value;
        }
        self.notify();
    }
}

impl<T: Clone + PartialEq + 'static> Signal<T> {
    /// Mutate in place; subscribers are notified only if the value changed.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let changed = {
            let mut current = self.inner.value.borrow_mut();
            let before = current.clone();
            f(&mut current);
            *current != before
        };
        if changed {
            self.notify();
        }
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("value", &self.inner.value)
            .finish()
    }
}

// =============================================================================
// Read / write halves
// =============================================================================

/// Read half returned by [`create_signal`].
pub struct ReadSignal<T>(Signal<T>);

/// Write half returned by [`create_signal`].
pub struct WriteSignal<T>(Signal<T>);

/// Create a signal split into read and write halves.
pub fn create_signal<T: 'static>(value: T) -> (ReadSignal<T>, WriteSignal<T>) {
    let signal = Signal::new(value);
    (ReadSignal(signal.clone()), WriteSignal(signal))
}

impl<T: 'static> ReadSignal<T> {
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.0.with(f)
    }

    pub fn with_untracked<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.0.with_untracked(f)
    }
}

impl<T: Clone + 'static> ReadSignal<T> {
    pub fn get(&self) -> T {
        self.0.get()
    }

    pub fn get_untracked(&self) -> T {
        self.0.get_untracked()
    }
}

impl<T: PartialEq + 'static> WriteSignal<T> {
    pub fn set(&self, value: T) {
        self.0.set(value);
    }
}

impl<T: Clone + PartialEq + 'static> WriteSignal<T> {
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.0.update(f);
    }
}

impl<T> Clone for ReadSignal<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Clone for WriteSignal<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> From<ReadSignal<T>> for Signal<T> {
    fn from(read: ReadSignal<T>) -> Self {
        read.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::create_effect;
    use std::cell::Cell;

    #[test]
    fn test_get_set() {
        let s = Signal::new(1);
        assert_eq!(s.get(), 1);
        s.set(2);
        assert_eq!(s.get_untracked(), 2);
    }

    #[test]
    fn test_equal_write_does_not_notify() {
        let s = Signal::new(5);
        let runs = Rc::new(Cell::new(0));

        let (sig, r) = (s.clone(), runs.clone());
        create_effect(move || {
            sig.get();
            r.set(r.get() + 1);
        });
        assert_eq!(runs.get(), 1);

        s.set(5);
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn test_update_notifies_only_on_change() {
        let s = Signal::new(vec![1, 2]);
        let runs = Rc::new(Cell::new(0));

        let (sig, r) = (s.clone(), runs.clone());
        create_effect(move || {
            sig.with(|v| v.len());
            r.set(r.get() + 1);
        });

        s.update(|v| v.sort());
        assert_eq!(runs.get(), 1);

        s.update(|v| v.push(3));
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn test_split_halves() {
        let (read, write) = create_signal(String::from("a"));
        write.set("b".into());
        assert_eq!(read.get(), "b");
        write.update(|s| s.push('c'));
        assert_eq!(read.with(|s| s.len()), 2);
    }

    #[test]
    fn test_dispose_releases_subscribers() {
        let s = Signal::new(0);
        let sig = s.clone();
        let effect = create_effect(move || {
            sig.get();
        });
        assert_eq!(s.subscriber_count(), 1);
        effect.dispose();
        assert_eq!(s.subscriber_count(), 0);
    }
}
