//! Variadic argument lists: segments followed by an optional trailing listener.
//!
//! A single parsing rule applies to every operation: when the last argument is
//! a listener it is the callback, and everything before it is the chain. A
//! listener anywhere else is rejected.

use crate::error::{RegistryError, RegistryResult};
use crate::listener::Listener;
use crate::routing::Registry;
use crate::topics::Chain;

/// One positional argument of a variadic call.
#[derive(Debug)]
pub enum Arg<T> {
    /// A chain segment.
    Segment(String),
    /// A callback.
    Listener(Listener<T>),
}

impl<T> From<&str> for Arg<T> {
    fn from(segment: &str) -> Self {
        Self::Segment(segment.to_owned())
    }
}

impl<T> From<String> for Arg<T> {
    fn from(segment: String) -> Self {
        Self::Segment(segment)
    }
}

impl<T> From<Listener<T>> for Arg<T> {
    fn from(listener: Listener<T>) -> Self {
        Self::Listener(listener)
    }
}

impl<T> From<&Listener<T>> for Arg<T> {
    fn from(listener: &Listener<T>) -> Self {
        Self::Listener(listener.clone())
    }
}

/// Build a `Vec<Arg<_>>` from segments and listeners.
///
/// ```
/// use tierbus_events::{Listener, Registry, args};
///
/// let registry = Registry::<()>::new();
/// let listener = Listener::new(|_, _| {});
/// registry.on_args(args!["top", "tierA", listener])?;
/// # Ok::<(), tierbus_events::RegistryError>(())
/// ```
#[macro_export]
macro_rules! args {
    ($($arg:expr),* $(,)?) => {
        ::std::vec![$($crate::Arg::from($arg)),*]
    };
}

/// Argument list split into its chain and optional trailing listener.
#[derive(Debug)]
pub struct ArgList<T> {
    /// Segments preceding the listener.
    pub chain: Chain,
    /// Trailing listener, when one was supplied.
    pub listener: Option<Listener<T>>,
}

impl<T> ArgList<T> {
    /// Apply the trailing-listener rule.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidArgument`] when a listener appears
    /// before the final position.
    pub fn parse(operation: &'static str, args: Vec<Arg<T>>) -> RegistryResult<Self> {
        let mut segments = Vec::with_capacity(args.len());
        let mut listener = None;
        let last = args.len().saturating_sub(1);

        for (position, arg) in args.into_iter().enumerate() {
            match arg {
                Arg::Segment(segment) => segments.push(segment),
                Arg::Listener(found) if position == last => listener = Some(found),
                Arg::Listener(_) => {
                    return Err(RegistryError::InvalidArgument {
                        operation,
                        position: Some(position),
                        reason: "listener must be the final argument",
                    });
                }
            }
        }

        Ok(Self {
            chain: Chain::from(segments),
            listener,
        })
    }

    /// Like [`ArgList::parse`], but a trailing listener is mandatory.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidArgument`] when the last argument is not
    /// a listener or a listener appears before the final position.
    pub fn parse_required(
        operation: &'static str,
        args: Vec<Arg<T>>,
    ) -> RegistryResult<(Chain, Listener<T>)> {
        let position = args.len().checked_sub(1);
        let parsed = Self::parse(operation, args)?;
        match parsed.listener {
            Some(listener) => Ok((parsed.chain, listener)),
            None => Err(RegistryError::InvalidArgument {
                operation,
                position,
                reason: "expects the last argument to be a listener",
            }),
        }
    }
}

impl<T> Registry<T> {
    /// Variadic [`Registry::subscribe`]: segments followed by a listener.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidArgument`] when no trailing listener
    /// is supplied.
    pub fn on_args(&self, args: Vec<Arg<T>>) -> RegistryResult<&Self> {
        let (chain, listener) = ArgList::parse_required("on", args)?;
        Ok(self.subscribe(chain, listener))
    }

    /// Variadic [`Registry::subscribe_once`]: segments followed by a listener.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidArgument`] when no trailing listener
    /// is supplied.
    pub fn once_args(&self, args: Vec<Arg<T>>) -> RegistryResult<&Self> {
        let (chain, listener) = ArgList::parse_required("once", args)?;
        Ok(self.subscribe_once(chain, listener))
    }

    /// Variadic removal.
    ///
    /// No arguments resets the registry; a trailing listener removes the
    /// matching entries at the chain; otherwise the node is cleared.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidArgument`] when a listener appears
    /// before the final position.
    pub fn off_args(&self, args: Vec<Arg<T>>) -> RegistryResult<&Self> {
        if args.is_empty() {
            return Ok(self.reset());
        }
        let parsed = ArgList::parse("off", args)?;
        Ok(match parsed.listener {
            Some(listener) => self.unsubscribe(parsed.chain, &listener),
            None => self.unsubscribe_all(parsed.chain),
        })
    }
}
