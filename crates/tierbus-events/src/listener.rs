//! Listener callbacks and the entries that hold them inside the topic tree.

use std::fmt::{self, Debug, Display, Formatter};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::ListenerResult;
use crate::routing::Registry;

type Callback<T> = dyn Fn(&Registry<T>, &[T]) -> ListenerResult + Send + Sync;

/// Shared callback invoked with the registry and the published data.
///
/// Identity is the identity of the shared callback: clones compare equal, two
/// listeners built from identical closures do not. Unsubscribing with a
/// listener removes every entry registered with that same listener.
pub struct Listener<T> {
    callback: Arc<Callback<T>>,
}

impl<T: 'static> Listener<T> {
    /// Wrap an infallible callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&Registry<T>, &[T]) + Send + Sync + 'static,
    {
        Self::fallible(move |registry, data| {
            callback(registry, data);
            Ok(())
        })
    }

    /// Wrap a callback that may report an error.
    ///
    /// Errors are absorbed by the delivery pass and never reach the publisher.
    pub fn fallible<F>(callback: F) -> Self
    where
        F: Fn(&Registry<T>, &[T]) -> ListenerResult + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
        }
    }
}

impl<T> Listener<T> {
    pub(crate) fn invoke(&self, registry: &Registry<T>, data: &[T]) -> ListenerResult {
        (self.callback)(registry, data)
    }

    /// Whether both handles refer to the same callback.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.callback, &other.callback)
    }
}

impl<T> Clone for Listener<T> {
    fn clone(&self) -> Self {
        Self {
            callback: Arc::clone(&self.callback),
        }
    }
}

impl<T> PartialEq for Listener<T> {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl<T> Eq for Listener<T> {}

impl<T> Debug for Listener<T> {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Listener")
            .field("callback", &Arc::as_ptr(&self.callback).cast::<()>())
            .finish()
    }
}

/// Per-registry identifier assigned to each registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl Display for ListenerId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "#{}", self.0)
    }
}

/// A registration stored at one node of the topic tree.
pub(crate) struct ListenerEntry<T> {
    pub(crate) id: ListenerId,
    pub(crate) listener: Listener<T>,
    pub(crate) once: bool,
    consumed: AtomicBool,
}

impl<T> ListenerEntry<T> {
    pub(crate) fn new(id: ListenerId, listener: Listener<T>, once: bool) -> Self {
        Self {
            id,
            listener,
            once,
            consumed: AtomicBool::new(false),
        }
    }

    /// Claim the right to invoke this entry.
    ///
    /// Persistent entries can always be invoked; a `once` entry is claimable
    /// exactly one time across every pass, nested or concurrent.
    pub(crate) fn claim(&self) -> bool {
        !self.once || !self.consumed.swap(true, Ordering::AcqRel)
    }
}
