//! Network identifier.

use serde::{Deserialize, Serialize};

/// Identifies which OPAL network a token or commitment belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkId {
    /// The production network.
    Live,
    /// The public test network.
    Test,
    /// Local development network.
    Dev,
}

impl NetworkId {
    /// Human-readable name, also used in the TXF file format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Test => "test",
            Self::Dev => "dev",
        }
    }

    /// Default aggregator endpoint for this network.
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Self::Live => "https://aggregator.opal.network",
            Self::Test => "https://aggregator-test.opal.network",
            Self::Dev => "http://127.0.0.1:3001",
        }
    }

    /// Parse from the TXF string form.
    pub fn from_str_tag(s: &str) -> Option<Self> {
        match s {
            "live" => Some(Self::Live),
            "test" => Some(Self::Test),
            "dev" => Some(Self::Dev),
            _ => None,
        }
    }
}
