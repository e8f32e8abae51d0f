#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Telemetry primitives shared across the tierbus workspace.
//!
//! The registry itself only emits `tracing` events; this crate installs the
//! subscriber that renders them, either as JSON lines or human-readable text.

pub mod error;
pub mod init;

pub use error::{Result, TelemetryError};
pub use init::{
    DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging, installed_format,
    log_format_from_config,
};
