//! Topic tree: one node per chain prefix.
//!
//! # Design
//! - Nodes are created lazily on first subscription and owned exclusively by
//!   their parent; the root is owned by the registry.
//! - Lookups used by removal and delivery never create nodes.
//! - [`TopicView`] is an owned snapshot for diagnostics; it never aliases the
//!   live tree.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::listener::{Listener, ListenerEntry, ListenerId};
use crate::topics::Chain;

/// Listeners registered for an exact chain plus the nodes for deeper chains.
pub(crate) struct TopicNode<T> {
    children: HashMap<String, TopicNode<T>>,
    listeners: Vec<Arc<ListenerEntry<T>>>,
}

impl<T> Default for TopicNode<T> {
    fn default() -> Self {
        Self {
            children: HashMap::new(),
            listeners: Vec::new(),
        }
    }
}

impl<T> TopicNode<T> {
    /// Walk to the node for `segments`, creating empty nodes on the way.
    pub(crate) fn descend_or_create(&mut self, segments: &[String]) -> &mut Self {
        segments.iter().fold(self, |node, segment| {
            node.children.entry(segment.clone()).or_default()
        })
    }

    /// Walk to the node for `segments` without creating anything.
    pub(crate) fn descend_mut(&mut self, segments: &[String]) -> Option<&mut Self> {
        let mut node = self;
        for segment in segments {
            node = node.children.get_mut(segment)?;
        }
        Some(node)
    }

    pub(crate) fn push(&mut self, entry: ListenerEntry<T>) {
        self.listeners.push(Arc::new(entry));
    }

    /// Drop every listener at this node; returns how many were removed.
    pub(crate) fn clear(&mut self) -> usize {
        let removed = self.listeners.len();
        self.listeners.clear();
        removed
    }

    /// Drop every entry registered with `listener`; returns how many were removed.
    pub(crate) fn remove_listener(&mut self, listener: &Listener<T>) -> usize {
        let before = self.listeners.len();
        self.listeners
            .retain(|entry| !entry.listener.same_as(listener));
        before - self.listeners.len()
    }

    /// Drop the entry with `id`, if it is still present.
    pub(crate) fn remove_id(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|entry| entry.id != id);
        before != self.listeners.len()
    }

    /// Snapshot the listener lists along `chain`, root first.
    ///
    /// Stops at the first segment without a node; every node reached before
    /// that point is included.
    pub(crate) fn delivery_path(&self, chain: &Chain) -> Vec<Vec<Arc<ListenerEntry<T>>>> {
        let mut path = Vec::with_capacity(chain.len() + 1);
        let mut node = self;
        path.push(node.listeners.clone());
        for segment in chain.segments() {
            match node.children.get(segment) {
                Some(next) => {
                    node = next;
                    path.push(node.listeners.clone());
                }
                None => break,
            }
        }
        path
    }

    /// Remove empty descendants along `segments`, deepest first.
    ///
    /// Returns the number of nodes removed. `self` is never removed.
    pub(crate) fn prune(&mut self, segments: &[String]) -> usize {
        let Some((head, rest)) = segments.split_first() else {
            return 0;
        };
        let Some(child) = self.children.get_mut(head) else {
            return 0;
        };
        let mut removed = child.prune(rest);
        if child.is_vacant() {
            self.children.remove(head);
            removed += 1;
        }
        removed
    }

    fn is_vacant(&self) -> bool {
        self.listeners.is_empty() && self.children.is_empty()
    }

    pub(crate) fn view(&self) -> TopicView<T> {
        TopicView {
            children: self
                .children
                .iter()
                .map(|(segment, child)| (segment.clone(), child.view()))
                .collect(),
            listeners: self
                .listeners
                .iter()
                .map(|entry| ListenerView {
                    id: entry.id,
                    once: entry.once,
                    listener: entry.listener.clone(),
                })
                .collect(),
        }
    }
}

/// Owned snapshot of one node of the topic tree and everything below it.
#[derive(Debug)]
pub struct TopicView<T> {
    /// Nodes for deeper chains keyed by their next segment.
    pub children: BTreeMap<String, TopicView<T>>,
    /// Listeners registered for this exact chain, in registration order.
    pub listeners: Vec<ListenerView<T>>,
}

impl<T> TopicView<T> {
    /// Find the view for `chain` relative to this node.
    #[must_use]
    pub fn node(&self, chain: &Chain) -> Option<&Self> {
        chain
            .segments()
            .iter()
            .try_fold(self, |view, segment| view.children.get(segment))
    }

    /// Number of listeners registered directly at this node.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Whether the node has neither listeners nor children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty() && self.children.is_empty()
    }
}

/// Snapshot of a single registration.
#[derive(Debug)]
pub struct ListenerView<T> {
    /// Identifier assigned at registration.
    pub id: ListenerId,
    /// Whether the entry is removed after its first invocation.
    pub once: bool,
    /// The registered callback.
    pub listener: Listener<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u64, listener: &Listener<()>, once: bool) -> ListenerEntry<()> {
        ListenerEntry::new(ListenerId::new(id), listener.clone(), once)
    }

    fn chain(segments: &[&str]) -> Chain {
        Chain::from(segments)
    }

    #[test]
    fn descend_creates_intermediate_nodes() {
        let mut root = TopicNode::<()>::default();
        let listener = Listener::new(|_, _| {});
        root.descend_or_create(chain(&["top", "tierA"]).segments())
            .push(entry(1, &listener, false));

        let view = root.view();
        let top = view.node(&chain(&["top"])).expect("top node");
        assert_eq!(top.listener_count(), 0);
        let tier = view.node(&chain(&["top", "tierA"])).expect("tierA node");
        assert_eq!(tier.listener_count(), 1);
        assert_eq!(tier.listeners[0].listener, listener);
    }

    #[test]
    fn descend_mut_never_creates() {
        let mut root = TopicNode::<()>::default();
        assert!(root.descend_mut(chain(&["missing"]).segments()).is_none());
        assert!(root.view().is_empty());
    }

    #[test]
    fn delivery_path_stops_at_first_missing_child() {
        let mut root = TopicNode::<()>::default();
        let listener = Listener::new(|_, _| {});
        root.push(entry(1, &listener, false));
        root.descend_or_create(chain(&["top"]).segments())
            .push(entry(2, &listener, false));

        let path = root.delivery_path(&chain(&["top", "gap", "deeper"]));
        assert_eq!(path.len(), 2);
        assert_eq!(path[1][0].id, ListenerId::new(2));
    }

    #[test]
    fn remove_listener_drops_every_match() {
        let mut root = TopicNode::<()>::default();
        let kept = Listener::new(|_, _| {});
        let dropped = Listener::new(|_, _| {});
        root.push(entry(1, &dropped, false));
        root.push(entry(2, &kept, false));
        root.push(entry(3, &dropped, true));

        assert_eq!(root.remove_listener(&dropped), 2);
        let view = root.view();
        assert_eq!(view.listener_count(), 1);
        assert_eq!(view.listeners[0].id, ListenerId::new(2));
        assert!(!root.remove_id(ListenerId::new(1)));
        assert!(root.remove_id(ListenerId::new(2)));
    }

    #[test]
    fn prune_removes_only_vacant_nodes() {
        let mut root = TopicNode::<()>::default();
        let listener = Listener::new(|_, _| {});
        root.descend_or_create(chain(&["top"]).segments())
            .push(entry(1, &listener, false));
        root.descend_or_create(chain(&["top", "tierA", "tierB"]).segments());

        assert_eq!(root.prune(chain(&["top", "tierA", "tierB"]).segments()), 2);
        let view = root.view();
        let top = view.node(&chain(&["top"])).expect("top survives");
        assert!(top.children.is_empty());
        assert_eq!(top.listener_count(), 1);
    }
}
