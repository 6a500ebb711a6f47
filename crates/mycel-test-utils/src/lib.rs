//! Shared fixtures for Mycel tests and benchmarks.
//!
//! Species profiles, obstacle masks, hand-placed agents, and a tracing
//! subscriber installer. Nothing here depends on the engine, so every
//! crate in the workspace can use it as a dev-dependency.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::*;

use std::sync::Once;

static TRACING: Once = Once::new();

/// Install a `tracing-subscriber` fmt subscriber for the test binary.
///
/// Filtered by `RUST_LOG` (default `warn`). Output goes through the test
/// writer so it is captured per test. Safe to call from every test.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
