//! Registry error primitives.
//!
//! # Design
//! - Constant error messages; context lives in named fields.
//! - `RegistryError` is the only error a caller ever receives.
//! - `SubscriberFailure` describes a swallowed listener failure and is only
//!   handed to the diagnostic hook.

use std::error::Error;

use thiserror::Error;

use crate::listener::ListenerId;
use crate::topics::Chain;

/// Boxed error a fallible listener may return.
pub type ListenerError = Box<dyn Error + Send + Sync>;

/// Outcome of a single listener invocation.
pub type ListenerResult = Result<(), ListenerError>;

/// Errors surfaced synchronously by registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Argument list did not satisfy the trailing-listener rule.
    #[error("illegal argument")]
    InvalidArgument {
        /// Operation that rejected the arguments.
        operation: &'static str,
        /// Index of the offending argument when one exists.
        position: Option<usize>,
        /// Static reason for the rejection.
        reason: &'static str,
    },
    /// Registry configuration could not be decoded.
    #[error("invalid registry configuration")]
    Config {
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience alias for registry results.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// A listener failure that was absorbed during a delivery pass.
#[derive(Debug, Error)]
pub enum SubscriberFailure {
    /// The listener returned an error.
    #[error("listener returned an error")]
    Returned {
        /// Listener that failed.
        listener: ListenerId,
        /// Chain of the node being delivered when the failure occurred.
        chain: Chain,
        /// Error returned by the listener.
        #[source]
        source: ListenerError,
    },
    /// The listener panicked.
    #[error("listener panicked")]
    Panicked {
        /// Listener that failed.
        listener: ListenerId,
        /// Chain of the node being delivered when the failure occurred.
        chain: Chain,
        /// Panic payload rendered as text when it was a string.
        message: String,
    },
}

impl SubscriberFailure {
    /// Identifier of the listener that failed.
    #[must_use]
    pub const fn listener(&self) -> ListenerId {
        match self {
            Self::Returned { listener, .. } | Self::Panicked { listener, .. } => *listener,
        }
    }

    /// Chain of the node that was being delivered.
    #[must_use]
    pub const fn chain(&self) -> &Chain {
        match self {
            Self::Returned { chain, .. } | Self::Panicked { chain, .. } => chain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_error_messages_are_constant() {
        let err = RegistryError::InvalidArgument {
            operation: "on",
            position: Some(1),
            reason: "listener must be the final argument",
        };
        assert_eq!(err.to_string(), "illegal argument");
        assert!(err.source().is_none());

        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = RegistryError::Config { source: decode };
        assert_eq!(err.to_string(), "invalid registry configuration");
        assert!(err.source().is_some());
    }

    #[test]
    fn subscriber_failure_exposes_fields() {
        let failure = SubscriberFailure::Returned {
            listener: ListenerId::new(7),
            chain: Chain::from(["top", "tierA"]),
            source: "boom".into(),
        };
        assert_eq!(failure.listener(), ListenerId::new(7));
        assert_eq!(failure.chain().to_string(), "top.tierA");
        assert_eq!(failure.to_string(), "listener returned an error");
        assert_eq!(
            failure.source().map(ToString::to_string).as_deref(),
            Some("boom")
        );

        let panicked = SubscriberFailure::Panicked {
            listener: ListenerId::new(3),
            chain: Chain::root(),
            message: "oops".into(),
        };
        assert_eq!(panicked.listener(), ListenerId::new(3));
        assert!(panicked.chain().is_empty());
        assert!(panicked.source().is_none());
    }
}
