//! Observable Implementation
//!
//! An [`Observable`] holds a single value and notifies subscribers when the
//! value changes.
//!
//! # How Observables Work
//!
//! 1. `get` returns a clone of the current value.
//!
//! 2. `set` compares the incoming value with the current one. Equal values
//!    are dropped without a notification; this is what stops two
//!    observables bound to each other from ping-ponging forever.
//!
//! 3. A changed value is stored, the lock is released, and subscribers are
//!    called with the new value.
//!
//! Clones share state, so an observable can be handed to a behavior while
//! its owner keeps reading it.

use std::fmt::Debug;
use std::sync::Arc;

use parking_lot::RwLock;

use super::event::Event;
use super::subscriber::Subscription;

/// A shared, change-notifying value cell.
pub struct Observable<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// The current value.
    value: Arc<RwLock<T>>,

    /// Raised with the new value after every effective change.
    changed: Arc<Event<T>>,
}

impl<T> Observable<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Create a new observable with the given initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: Arc::new(RwLock::new(value)),
            changed: Arc::new(Event::new()),
        }
    }

    /// Get the current value.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Set a new value and notify subscribers.
    ///
    /// Returns `false`, without notifying, when `value` equals the current
    /// value.
    pub fn set(&self, value: T) -> bool {
        {
            let mut guard = self.value.write();
            if *guard == value {
                return false;
            }
            *guard = value.clone();
        }

        self.changed.emit(&value);
        true
    }

    /// Register a callback invoked with every new value.
    pub fn subscribe<F>(&self, on_change: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.changed.subscribe(on_change)
    }

    /// Get the number of subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.changed.subscriber_count()
    }
}

impl<T> Clone for Observable<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            changed: Arc::clone(&self.changed),
        }
    }
}

impl<T> Default for Observable<T>
where
    T: Clone + PartialEq + Send + Sync + Default + 'static,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Debug for Observable<T>
where
    T: Clone + PartialEq + Send + Sync + Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.get())
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI32, Ordering};

    #[test]
    fn observable_get_and_set() {
        let observable = Observable::new(0);
        assert_eq!(observable.get(), 0);

        assert!(observable.set(42));
        assert_eq!(observable.get(), 42);
    }

    #[test]
    fn observable_notifies_on_change() {
        let observable = Observable::new(0);
        let seen = Arc::new(AtomicI32::new(-1));
        let seen_clone = seen.clone();

        let _sub = observable.subscribe(move |v| {
            seen_clone.store(*v, Ordering::SeqCst);
        });

        observable.set(5);
        assert_eq!(seen.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn equal_value_is_not_notified() {
        let observable = Observable::new(3);
        let call_count = Arc::new(AtomicI32::new(0));
        let call_count_clone = call_count.clone();

        let _sub = observable.subscribe(move |_| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!observable.set(3));
        assert_eq!(call_count.load(Ordering::SeqCst), 0);

        assert!(observable.set(4));
        assert!(!observable.set(4));
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn observable_clone_shares_state() {
        let observable1 = Observable::new(0);
        let observable2 = observable1.clone();

        observable1.set(42);
        assert_eq!(observable2.get(), 42);

        let _sub = observable2.subscribe(|_| {});
        assert_eq!(observable1.subscriber_count(), 1);
    }

    #[test]
    fn subscriber_may_write_back_without_recursing() {
        let observable = Observable::new(0);
        let call_count = Arc::new(AtomicI32::new(0));

        let writer = observable.clone();
        let call_count_clone = call_count.clone();
        let _sub = observable.subscribe(move |v| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
            writer.set(*v);
        });

        observable.set(9);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }
}
