//! Publisher capability that any type can carry by embedding a [`Registry`].
//!
//! Implementing [`Publisher::registry`] is enough to give a host type the
//! `on`/`once`/`off`/`emit` surface. Every provided method returns the host
//! itself, so fluent chains keep the caller's own type and identity.

use crate::args::Arg;
use crate::error::RegistryResult;
use crate::listener::Listener;
use crate::routing::Registry;
use crate::topics::Chain;
use crate::tree::TopicView;

/// Four-operation publish/subscribe surface plus root introspection.
pub trait Publisher<T> {
    /// Registry backing this publisher.
    fn registry(&self) -> &Registry<T>;

    /// Register `listener` for `chain`.
    fn on(&self, chain: impl Into<Chain>, listener: Listener<T>) -> &Self {
        self.registry().subscribe(chain, listener);
        self
    }

    /// Register `listener` for `chain` for a single invocation.
    fn once(&self, chain: impl Into<Chain>, listener: Listener<T>) -> &Self {
        self.registry().subscribe_once(chain, listener);
        self
    }

    /// Remove the entries at `chain` registered with `listener`.
    fn off(&self, chain: impl Into<Chain>, listener: &Listener<T>) -> &Self {
        self.registry().unsubscribe(chain, listener);
        self
    }

    /// Remove every listener at `chain`.
    fn off_all(&self, chain: impl Into<Chain>) -> &Self {
        self.registry().unsubscribe_all(chain);
        self
    }

    /// Remove every listener and node.
    fn reset(&self) -> &Self {
        self.registry().reset();
        self
    }

    /// Publish `data` along `chain`.
    fn emit(&self, chain: impl Into<Chain>, data: &[T]) -> &Self {
        self.registry().publish(chain, data);
        self
    }

    /// Variadic registration; see [`ArgList`](crate::ArgList) for the rule.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidArgument`](crate::RegistryError::InvalidArgument)
    /// when no trailing listener is supplied.
    fn on_args(&self, args: Vec<Arg<T>>) -> RegistryResult<&Self> {
        self.registry().on_args(args)?;
        Ok(self)
    }

    /// Variadic single-shot registration.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidArgument`](crate::RegistryError::InvalidArgument)
    /// when no trailing listener is supplied.
    fn once_args(&self, args: Vec<Arg<T>>) -> RegistryResult<&Self> {
        self.registry().once_args(args)?;
        Ok(self)
    }

    /// Variadic removal; an empty list resets.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidArgument`](crate::RegistryError::InvalidArgument)
    /// when a listener appears before the final position.
    fn off_args(&self, args: Vec<Arg<T>>) -> RegistryResult<&Self> {
        self.registry().off_args(args)?;
        Ok(self)
    }

    /// Snapshot of the root node.
    fn get_listener(&self) -> TopicView<T> {
        self.registry().root()
    }
}

impl<T> Publisher<T> for Registry<T> {
    fn registry(&self) -> &Registry<T> {
        self
    }
}

/// Construct a standalone registry.
///
/// To attach the capability to an existing type instead, embed a
/// [`Registry`] and implement [`Publisher`].
#[must_use]
pub fn create_registry<T>() -> Registry<T> {
    Registry::new()
}
