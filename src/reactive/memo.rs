//! Memos: derived signals.

use std::cell::RefCell;
use std::rc::Rc;

use super::effect::{Effect, create_effect};
use super::signal::Signal;

/// A read-only value derived from other signals.
///
/// The computation re-runs only when one of the signals it read changes, and
/// readers of the memo are notified only when the computed value differs
/// from the previous one.
pub struct Memo<T> {
    value: Signal<T>,
    effect: Effect,
}

/// Create a memo from `f`. `f` runs once immediately.
pub fn create_memo<T, F>(mut f: F) -> Memo<T>
where
    T: Clone + PartialEq + 'static,
    F: FnMut() -> T + 'static,
{
    let slot: Rc<RefCell<Option<Signal<T>>>> = Rc::new(RefCell::new(None));

    let inner = Rc::clone(&slot);
    let effect = create_effect(move || {
        let next = f();
        let existing = inner.borrow().clone();
        match existing {
            Some(signal) => signal.set(next),
            None => *inner.borrow_mut() = Some(Signal::new(next)),
        }
    });

    let value = slot
        .borrow()
        .clone()
        .unwrap_or_else(|| unreachable!("memo computation runs during create_effect"));

    Memo { value, effect }
}

impl<T: Clone + 'static> Memo<T> {
    /// Current value, tracking the dependency.
    pub fn get(&self) -> T {
        self.value.get()
    }

    pub fn get_untracked(&self) -> T {
        self.value.get_untracked()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.value.with(f)
    }

    /// Stop recomputing. The last value stays readable.
    pub fn dispose(&self) {
        self.effect.dispose();
    }
}

impl<T> Clone for Memo<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            effect: self.effect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_memo_recomputes_on_change() {
        let n = Signal::new(2);
        let computes = Rc::new(Cell::new(0));

        let (s, c) = (n.clone(), computes.clone());
        let doubled = create_memo(move || {
            c.set(c.get() + 1);
            s.get() * 2
        });
        assert_eq!(doubled.get(), 4);
        assert_eq!(computes.get(), 1);

        n.set(5);
        assert_eq!(doubled.get(), 10);
        assert_eq!(computes.get(), 2);
    }

    #[test]
    fn test_memo_notifies_only_when_value_changes() {
        let n = Signal::new(3);
        let parity_runs = Rc::new(Cell::new(0));

        let s = n.clone();
        let is_even = create_memo(move || s.get() % 2 == 0);

        let (m, r) = (is_even.clone(), parity_runs.clone());
        create_effect(move || {
            m.get();
            r.set(r.get() + 1);
        });
        assert_eq!(parity_runs.get(), 1);

        n.set(5);
        assert_eq!(parity_runs.get(), 1, "still odd");

        n.set(6);
        assert_eq!(parity_runs.get(), 2);
        assert!(is_even.get_untracked());
    }

    #[test]
    fn test_disposed_memo_keeps_last_value() {
        let n = Signal::new(1);
        let s = n.clone();
        let m = create_memo(move || s.get() + 1);
        m.dispose();
        n.set(10);
        assert_eq!(m.get(), 2);
    }
}
