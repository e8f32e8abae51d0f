//! Recording listeners for asserting delivery counts and order.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tierbus_events::Listener;

/// Listener that records the data of every invocation.
///
/// [`Spy::listener`] always returns the same listener identity, so the spy can
/// also be used to unsubscribe.
pub struct Spy<T> {
    calls: Arc<Mutex<Vec<Vec<T>>>>,
    listener: Listener<T>,
}

impl<T: Clone + Send + 'static> Spy<T> {
    /// Create a spy with no recorded calls.
    #[must_use]
    pub fn new() -> Self {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        let listener = Listener::new(move |_, data: &[T]| {
            lock(&sink).push(data.to_vec());
        });
        Self { calls, listener }
    }

    /// The recording listener.
    #[must_use]
    pub fn listener(&self) -> Listener<T> {
        self.listener.clone()
    }

    /// Number of recorded invocations.
    #[must_use]
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Whether the spy ran exactly once.
    #[must_use]
    pub fn called_once(&self) -> bool {
        self.call_count() == 1
    }

    /// Data of every invocation, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<Vec<T>> {
        lock(&self.calls).clone()
    }
}

impl<T: Clone + Send + 'static> Default for Spy<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared, ordered log of labelled invocations across many listeners.
#[derive(Clone, Default)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Listener that appends `label` to the log when invoked.
    #[must_use]
    pub fn listener<T: 'static>(&self, label: impl Into<String>) -> Listener<T> {
        let label = label.into();
        let entries = Arc::clone(&self.entries);
        Listener::new(move |_, _| lock(&entries).push(label.clone()))
    }

    /// Labels in invocation order.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        lock(&self.entries).clone()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        lock(&self.entries).clear();
    }
}

fn lock<V>(mutex: &Mutex<V>) -> MutexGuard<'_, V> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
