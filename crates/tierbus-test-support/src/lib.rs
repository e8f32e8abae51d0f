#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Shared test helpers used across integration suites.
//! Layout: fixtures.rs (logging bootstrap, canned listeners), spy.rs (recording listeners).

pub mod fixtures;
pub mod spy;

pub use fixtures::{failing_listener, init_test_logging, panicking_listener};
pub use spy::{CallLog, Spy};
