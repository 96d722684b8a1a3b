//! Aggregator access for the OPAL protocol.
//!
//! The aggregator network is consumed as an opaque service with exactly two
//! operations: submit a commitment, fetch an inclusion proof. The
//! [`AggregatorClient`] trait is the seam: [`HttpAggregatorClient`] speaks
//! JSON-RPC to a real endpoint, [`InMemoryAggregator`] is the test double.
//!
//! Proof retrieval is idempotent and safe to retry; commitment submission
//! is not, and [`submit_and_wait`] checks recorded status before submitting.

pub mod client;
pub mod config;
pub mod error;
pub mod fake;
pub mod http;
pub mod submit;

pub use client::{AggregatorClient, SubmitAck};
pub use config::AggregatorConfig;
pub use error::AggregatorError;
pub use fake::InMemoryAggregator;
pub use http::HttpAggregatorClient;
pub use submit::submit_and_wait;
