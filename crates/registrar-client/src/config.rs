//! Client configuration

use registrar_params::Network;
use serde::{Deserialize, Serialize};

/// Registry client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Registry endpoint
    pub base_url: String,
    /// Whole-request timeout; `None` waits indefinitely
    pub timeout_secs: Option<u64>,
    /// User-Agent header
    pub user_agent: String,
}

impl ClientConfig {
    /// Configuration for a network preset
    pub fn for_network(network: &Network) -> Self {
        Self {
            base_url: network.api_base_url.to_string(),
            ..Self::default()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Network::mainnet().api_base_url.to_string(),
            timeout_secs: None,
            user_agent: format!("phpcoin-registrar/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
