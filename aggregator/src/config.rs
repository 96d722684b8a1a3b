//! Aggregator connection configuration.
//!
//! Threaded explicitly through constructors and call sites; there is no
//! process-wide endpoint state.

use opal_types::NetworkId;
use std::time::Duration;

/// Default per-request timeout.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Default interval between proof polls.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
/// Default ceiling on a whole poll loop.
const DEFAULT_POLL_CEILING: Duration = Duration::from_secs(30);

/// Endpoint and timing parameters for talking to an aggregator.
#[derive(Clone, Debug)]
pub struct AggregatorConfig {
    /// Base URL of the aggregator's JSON-RPC endpoint.
    pub endpoint: String,
    /// Timeout applied to each HTTP request.
    pub request_timeout: Duration,
    /// Fixed interval between polls while waiting for a proof.
    pub poll_interval: Duration,
    /// Maximum total time a poll loop may run before giving up.
    pub poll_ceiling: Duration,
}

impl AggregatorConfig {
    /// Configuration for a network's default endpoint.
    pub fn for_network(network: NetworkId) -> Self {
        Self::with_endpoint(network.default_endpoint())
    }

    /// Configuration for an explicit endpoint with default timings.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_ceiling: DEFAULT_POLL_CEILING,
        }
    }
}
