//! Shared utilities for OPAL tooling.

pub mod logging;

pub use logging::init_tracing;
