//! Registry configuration and construction.

use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, RegistryResult, SubscriberFailure};
use crate::routing::Registry;

/// Diagnostic callback receiving every absorbed listener failure.
pub type FailureHook = Arc<dyn Fn(&SubscriberFailure) + Send + Sync>;

/// Tunables for a [`Registry`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Remove nodes left without listeners or children after an unsubscribe
    /// or a `once` consumption. Disabled by default; empty nodes persist.
    pub prune_empty_nodes: bool,
}

impl RegistryConfig {
    /// Toggle pruning of vacant nodes.
    #[must_use]
    pub const fn prune_empty_nodes(mut self, enabled: bool) -> Self {
        self.prune_empty_nodes = enabled;
        self
    }

    /// Decode configuration from a JSON value; missing keys keep defaults.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Config`] when the value has the wrong shape.
    pub fn from_value(value: serde_json::Value) -> RegistryResult<Self> {
        serde_json::from_value(value).map_err(|source| RegistryError::Config { source })
    }
}

/// Builder combining a [`RegistryConfig`] with an optional failure hook.
pub struct RegistryBuilder<T> {
    config: RegistryConfig,
    failure_hook: Option<FailureHook>,
    marker: std::marker::PhantomData<fn() -> T>,
}

impl<T> RegistryBuilder<T> {
    pub(crate) const fn new() -> Self {
        Self {
            config: RegistryConfig {
                prune_empty_nodes: false,
            },
            failure_hook: None,
            marker: std::marker::PhantomData,
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    /// Install a hook that observes absorbed listener failures.
    ///
    /// The hook runs synchronously inside the delivery pass. Panics raised by
    /// the hook itself are absorbed as well.
    #[must_use]
    pub fn on_failure<F>(mut self, hook: F) -> Self
    where
        F: Fn(&SubscriberFailure) + Send + Sync + 'static,
    {
        self.failure_hook = Some(Arc::new(hook));
        self
    }

    /// Construct the registry.
    #[must_use]
    pub fn build(self) -> Registry<T> {
        Registry::from_parts(self.config, self.failure_hook)
    }
}

impl<T> Debug for RegistryBuilder<T> {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("RegistryBuilder")
            .field("config", &self.config)
            .field("failure_hook", &self.failure_hook.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_leave_pruning_disabled() {
        assert!(!RegistryConfig::default().prune_empty_nodes);
        assert!(RegistryConfig::default().prune_empty_nodes(true).prune_empty_nodes);
    }

    #[test]
    fn from_value_fills_missing_keys() -> RegistryResult<()> {
        assert_eq!(RegistryConfig::from_value(json!({}))?, RegistryConfig::default());
        let config = RegistryConfig::from_value(json!({"prune_empty_nodes": true}))?;
        assert!(config.prune_empty_nodes);
        Ok(())
    }

    #[test]
    fn from_value_rejects_wrong_types() {
        let err = RegistryConfig::from_value(json!({"prune_empty_nodes": "yes"}))
            .expect_err("string is not a bool");
        assert!(matches!(err, RegistryError::Config { .. }));
    }

    #[test]
    fn builder_debug_hides_hook() {
        let builder = RegistryBuilder::<()>::new().on_failure(|_| {});
        let rendered = format!("{builder:?}");
        assert!(rendered.contains("failure_hook: true"));
    }
}
