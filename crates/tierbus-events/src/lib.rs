#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]

//! Hierarchical publish/subscribe registry.
//!
//! Listeners register against a chain of topic segments (`["top"]`,
//! `["top", "tierA"]`, ...). Publishing a chain invokes every listener
//! registered at the root and at each prefix of the chain, most general first,
//! stopping at the deepest node that exists.
//!
//! ```
//! use tierbus_events::{Chain, Listener, Registry, TopicView};
//!
//! let registry = Registry::<String>::new();
//! registry
//!     .subscribe("top", Listener::new(|_, data: &[String]| println!("top: {data:?}")))
//!     .subscribe(["top", "tierA"], Listener::new(|_, data: &[String]| println!("{data:?}")))
//!     .publish(["top", "tierA"], &["payload".to_string()]);
//!
//! let root = registry.root();
//! assert_eq!(root.node(&Chain::from("top")).map(TopicView::listener_count), Some(1));
//! ```
//!
//! Layout: `topics.rs` (chains), `listener.rs` (callbacks and entries),
//! `tree.rs` (topic nodes and snapshots), `routing.rs` (the registry),
//! `args.rs` (variadic argument rule), `publisher.rs` (capability trait),
//! `config.rs` (configuration and builder), `error.rs` (error taxonomy).

pub mod args;
pub mod config;
pub mod error;
pub mod listener;
pub mod publisher;
pub mod routing;
pub mod topics;
pub mod tree;

pub use args::{Arg, ArgList};
pub use config::{FailureHook, RegistryBuilder, RegistryConfig};
pub use error::{ListenerError, ListenerResult, RegistryError, RegistryResult, SubscriberFailure};
pub use listener::{Listener, ListenerId};
pub use publisher::{Publisher, create_registry};
pub use routing::Registry;
pub use topics::Chain;
pub use tree::{ListenerView, TopicView};
