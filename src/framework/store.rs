//! # Observable Store
//!
//! A mutable state container with a list of registered listeners. Every mutation is
//! applied synchronously and every listener is invoked synchronously afterwards with
//! the new state and the mutation that produced it.
//!
//! ## Key Types
//!
//! - [`StoreState`]: The trait a state type implements to be held by a [`Store`].
//! - [`Store`]: The shared, cloneable container.
//! - [`Subscription`]: Handle returned by [`Store::subscribe`]; dropping it unsubscribes.

use std::fmt::Debug;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tracing::debug;

// =============================================================================
// 1. THE ABSTRACTION
// =============================================================================

/// Trait that any state type must implement to be managed by a [`Store`].
///
/// # Architecture Note
/// The store only knows how to hold state, apply mutations and fan out notifications.
/// What a mutation *means* lives in the state type, so the same container powers the
/// cart session and the order board.
///
/// Mutations are plain data (an enum per state type). Listeners receive the mutation
/// alongside the new state, which lets them react only to the changes they care about.
pub trait StoreState: Clone + Debug + Send + Sync + 'static {
    /// The set of changes this state accepts.
    type Mutation: Debug + Send + Sync;

    /// Apply one mutation in place. Must not fail: invalid input is normalised by the
    /// state type itself (e.g. a zero quantity removes the line).
    fn apply(&mut self, mutation: &Self::Mutation);
}

/// Listener callback: new state, then the mutation that produced it.
pub type Listener<S> = Arc<dyn Fn(&S, &<S as StoreState>::Mutation) + Send + Sync>;

// =============================================================================
// 2. THE CONTAINER
// =============================================================================

struct Inner<S: StoreState> {
    state: S,
    listeners: Vec<(u64, Listener<S>)>,
    next_listener_id: u64,
}

/// Shared observable state container.
///
/// Cloning a `Store` is cheap and yields another handle to the same state.
///
/// **Concurrency Model**:
/// Mutations are applied under a mutex, but listeners run *after* the lock is released.
/// A listener may therefore read the store (or even dispatch) without deadlocking.
///
/// The state passed to a listener is the state as of *its* dispatch. When two threads
/// dispatch at once, the older notification can arrive after the newer one. Listeners
/// that mirror a value must re-read the store (see [`WeakStore`]) instead of trusting
/// the state they were handed.
pub struct Store<S: StoreState> {
    inner: Arc<Mutex<Inner<S>>>,
}

impl<S: StoreState> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: StoreState> Store<S> {
    pub fn new(initial: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state: initial,
                listeners: Vec::new(),
                next_listener_id: 1,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<S>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a clone of the current state.
    pub fn snapshot(&self) -> S {
        self.lock().state.clone()
    }

    /// Runs `f` against the current state without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.lock().state)
    }

    /// Applies one mutation and notifies every listener.
    pub fn dispatch(&self, mutation: S::Mutation) {
        self.dispatch_all(vec![mutation]);
    }

    /// Applies several mutations as one unit.
    ///
    /// All mutations are applied before any listener runs, so no listener can observe
    /// an intermediate state. Each listener is then called once per mutation, in order,
    /// always with the final state.
    pub fn dispatch_all(&self, mutations: Vec<S::Mutation>) {
        if mutations.is_empty() {
            return;
        }

        let (state, listeners) = {
            let mut inner = self.lock();
            for mutation in &mutations {
                debug!(?mutation, "Dispatch");
                inner.state.apply(mutation);
            }
            let listeners: Vec<Listener<S>> =
                inner.listeners.iter().map(|(_, l)| Arc::clone(l)).collect();
            (inner.state.clone(), listeners)
        };

        for mutation in &mutations {
            for listener in &listeners {
                listener(&state, mutation);
            }
        }
    }

    /// Registers a listener. It stays registered until the returned [`Subscription`]
    /// is dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(
        &self,
        listener: impl Fn(&S, &S::Mutation) + Send + Sync + 'static,
    ) -> Subscription {
        let listener: Listener<S> = Arc::new(listener);
        let id = {
            let mut inner = self.lock();
            let id = inner.next_listener_id;
            inner.next_listener_id += 1;
            inner.listeners.push((id, listener));
            id
        };

        let weak: Weak<Mutex<Inner<S>>> = Arc::downgrade(&self.inner);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
                    inner.listeners.retain(|(lid, _)| *lid != id);
                }
            })),
        }
    }

    /// Number of currently registered listeners.
    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    /// A handle that does not keep the state alive. Listeners capture this instead of a
    /// `Store` so the store and its listener list do not own each other.
    pub fn downgrade(&self) -> WeakStore<S> {
        WeakStore {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

/// Non-owning handle to a [`Store`].
pub struct WeakStore<S: StoreState> {
    inner: Weak<Mutex<Inner<S>>>,
}

impl<S: StoreState> Clone for WeakStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<S: StoreState> WeakStore<S> {
    /// The store, if any strong handle is still alive.
    pub fn upgrade(&self) -> Option<Store<S>> {
        self.inner.upgrade().map(|inner| Store { inner })
    }
}

// =============================================================================
// 3. THE SUBSCRIPTION HANDLE
// =============================================================================

/// Keeps a listener registered. Dropping it unsubscribes.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Unsubscribes now. Equivalent to dropping the handle.
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Counter {
        value: i64,
    }

    #[derive(Debug)]
    enum CounterMutation {
        Add(i64),
        Reset,
    }

    impl StoreState for Counter {
        type Mutation = CounterMutation;

        fn apply(&mut self, mutation: &CounterMutation) {
            match mutation {
                CounterMutation::Add(n) => self.value += n,
                CounterMutation::Reset => self.value = 0,
            }
        }
    }

    #[test]
    fn test_dispatch_notifies_listeners_synchronously() {
        let store = Store::new(Counter::default());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        let _sub = store.subscribe(move |state: &Counter, _| {
            sink.lock().unwrap().push(state.value);
        });

        store.dispatch(CounterMutation::Add(2));
        store.dispatch(CounterMutation::Add(3));

        // No await in between: listeners already ran
        assert_eq!(*seen.lock().unwrap(), vec![2, 5]);
        assert_eq!(store.snapshot().value, 5);
    }

    #[test]
    fn test_dropping_subscription_unsubscribes() {
        let store = Store::new(Counter::default());
        let calls = Arc::new(AtomicUsize::new(0));

        let c = calls.clone();
        let sub = store.subscribe(move |_, _| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(store.listener_count(), 1);

        store.dispatch(CounterMutation::Add(1));
        drop(sub);
        store.dispatch(CounterMutation::Add(1));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.listener_count(), 0);
    }

    #[test]
    fn test_dispatch_all_hides_intermediate_state() {
        let store = Store::new(Counter { value: 10 });
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        let _sub = store.subscribe(move |state: &Counter, _| {
            sink.lock().unwrap().push(state.value);
        });

        store.dispatch_all(vec![CounterMutation::Reset, CounterMutation::Add(4)]);

        // One call per mutation, both with the final state
        assert_eq!(*seen.lock().unwrap(), vec![4, 4]);
    }

    #[test]
    fn test_listener_can_read_store_without_deadlock() {
        let store = Store::new(Counter::default());
        let observed = Arc::new(Mutex::new(None));

        let reader = store.clone();
        let sink = observed.clone();
        let _sub = store.subscribe(move |_, _| {
            *sink.lock().unwrap() = Some(reader.read(|s| s.value));
        });

        store.dispatch(CounterMutation::Add(7));
        assert_eq!(*observed.lock().unwrap(), Some(7));
    }

    #[test]
    fn test_weak_store_does_not_keep_state_alive() {
        let store = Store::new(Counter { value: 3 });
        let weak = store.downgrade();
        assert_eq!(weak.upgrade().map(|s| s.read(|c| c.value)), Some(3));

        drop(store);
        assert!(weak.upgrade().is_none());
    }
}
