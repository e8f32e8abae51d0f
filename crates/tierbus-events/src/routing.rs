//! The topic registry: subscription, removal and hierarchical delivery.

use std::any::Any;
use std::fmt::{self, Debug, Formatter};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, trace};

use crate::config::{FailureHook, RegistryBuilder, RegistryConfig};
use crate::error::SubscriberFailure;
use crate::listener::{Listener, ListenerEntry, ListenerId};
use crate::topics::Chain;
use crate::tree::{TopicNode, TopicView};

/// Hierarchical publish/subscribe registry.
///
/// Publishing a chain invokes the root listeners first, then the listeners of
/// every chain prefix in turn down to the most specific node that exists.
/// Within a node, listeners run in registration order.
///
/// The tree lock is never held while a listener runs, so listeners may call
/// back into the registry. Each pass works on a snapshot of the delivery path
/// taken when it starts: changes made by listeners apply to later passes.
pub struct Registry<T> {
    root: Mutex<TopicNode<T>>,
    next_id: AtomicU64,
    config: RegistryConfig,
    failure_hook: Option<FailureHook>,
}

impl<T> Registry<T> {
    /// Construct an empty registry with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(RegistryConfig::default(), None)
    }

    /// Construct an empty registry with the provided configuration.
    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        Self::from_parts(config, None)
    }

    /// Start building a registry with a failure hook or custom configuration.
    #[must_use]
    pub const fn builder() -> RegistryBuilder<T> {
        RegistryBuilder::new()
    }

    pub(crate) fn from_parts(config: RegistryConfig, failure_hook: Option<FailureHook>) -> Self {
        Self {
            root: Mutex::new(TopicNode::default()),
            next_id: AtomicU64::new(1),
            config,
            failure_hook,
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Register `listener` for `chain`, creating missing nodes.
    pub fn subscribe(&self, chain: impl Into<Chain>, listener: Listener<T>) -> &Self {
        self.register(&chain.into(), listener, false);
        self
    }

    /// Register `listener` for `chain`; it is removed after its first invocation.
    pub fn subscribe_once(&self, chain: impl Into<Chain>, listener: Listener<T>) -> &Self {
        self.register(&chain.into(), listener, true);
        self
    }

    /// Remove every entry at exactly `chain` registered with `listener`.
    ///
    /// Deeper chains are untouched. A missing node is a no-op.
    pub fn unsubscribe(&self, chain: impl Into<Chain>, listener: &Listener<T>) -> &Self {
        let chain = chain.into();
        let mut root = self.lock_tree();
        let removed = root
            .descend_mut(chain.segments())
            .map_or(0, |node| node.remove_listener(listener));
        let pruned = self.prune_after_removal(&mut root, &chain);
        drop(root);
        trace!(chain = %chain, removed, pruned, "listener unsubscribed");
        self
    }

    /// Remove every listener at exactly `chain`, leaving deeper chains intact.
    ///
    /// A missing node is a no-op.
    pub fn unsubscribe_all(&self, chain: impl Into<Chain>) -> &Self {
        let chain = chain.into();
        let mut root = self.lock_tree();
        let removed = root.descend_mut(chain.segments()).map_or(0, TopicNode::clear);
        let pruned = self.prune_after_removal(&mut root, &chain);
        drop(root);
        trace!(chain = %chain, removed, pruned, "node cleared");
        self
    }

    /// Drop the whole tree and every listener in it.
    pub fn reset(&self) -> &Self {
        *self.lock_tree() = TopicNode::default();
        debug!("registry reset");
        self
    }

    /// Deliver `data` along `chain`, from the root to the most specific node.
    ///
    /// Traversal stops at the first segment without a node. Listener errors
    /// and panics are absorbed; nothing a listener does makes this fail.
    pub fn publish(&self, chain: impl Into<Chain>, data: &[T]) -> &Self {
        let chain = chain.into();
        let path = self.lock_tree().delivery_path(&chain);
        let reached = path.len() - 1;
        let mut invoked = 0_usize;
        let mut failed = 0_usize;

        for (depth, entries) in path.iter().enumerate() {
            for entry in entries {
                if !entry.claim() {
                    continue;
                }
                invoked += 1;
                if let Err(failure) = self.invoke(entry, &chain, depth, data) {
                    failed += 1;
                    self.report(&failure);
                }
                if entry.once {
                    self.consume(&chain, depth, entry.id);
                }
            }
        }

        debug!(chain = %chain, depth = reached, invoked, failed, "delivery pass complete");
        self
    }

    /// Owned snapshot of the root node and everything below it.
    #[must_use]
    pub fn root(&self) -> TopicView<T> {
        self.lock_tree().view()
    }

    fn register(&self, chain: &Chain, listener: Listener<T>, once: bool) {
        let id = ListenerId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock_tree()
            .descend_or_create(chain.segments())
            .push(ListenerEntry::new(id, listener, once));
        trace!(chain = %chain, listener = %id, once, "listener registered");
    }

    fn invoke(
        &self,
        entry: &ListenerEntry<T>,
        chain: &Chain,
        depth: usize,
        data: &[T],
    ) -> Result<(), SubscriberFailure> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| entry.listener.invoke(self, data)));
        match outcome {
            Ok(Ok(())) => Ok(()),
            Ok(Err(source)) => Err(SubscriberFailure::Returned {
                listener: entry.id,
                chain: chain.prefix(depth),
                source,
            }),
            Err(payload) => Err(SubscriberFailure::Panicked {
                listener: entry.id,
                chain: chain.prefix(depth),
                message: panic_message(payload.as_ref()),
            }),
        }
    }

    fn report(&self, failure: &SubscriberFailure) {
        if let Some(hook) = &self.failure_hook {
            let _ = panic::catch_unwind(AssertUnwindSafe(|| hook(failure)));
        }
    }

    /// Remove a consumed `once` entry from the node at `depth` along `chain`.
    fn consume(&self, chain: &Chain, depth: usize, id: ListenerId) {
        let prefix = &chain.segments()[..depth];
        let mut root = self.lock_tree();
        let removed = root
            .descend_mut(prefix)
            .is_some_and(|node| node.remove_id(id));
        if removed && self.config.prune_empty_nodes {
            root.prune(prefix);
        }
    }

    fn prune_after_removal(&self, root: &mut TopicNode<T>, chain: &Chain) -> usize {
        if self.config.prune_empty_nodes {
            root.prune(chain.segments())
        } else {
            0
        }
    }

    fn lock_tree(&self) -> MutexGuard<'_, TopicNode<T>> {
        self.root.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Debug for Registry<T> {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Registry")
            .field("config", &self.config)
            .field("failure_hook", &self.failure_hook.is_some())
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_owned())
}
