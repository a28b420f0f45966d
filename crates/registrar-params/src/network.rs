//! Network definitions

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Chain identifier prefixed to every fixed message the wallet signs.
pub const DEFAULT_CHAIN_ID: &str = "01";

/// Network type enumeration
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    /// Mainnet
    #[default]
    Mainnet,
    /// Testnet
    Testnet,
    /// Local registry (development)
    Local,
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkType::Mainnet => write!(f, "mainnet"),
            NetworkType::Testnet => write!(f, "testnet"),
            NetworkType::Local => write!(f, "local"),
        }
    }
}

impl FromStr for NetworkType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" | "main" => Ok(NetworkType::Mainnet),
            "testnet" | "test" => Ok(NetworkType::Testnet),
            "local" | "dev" => Ok(NetworkType::Local),
            other => Err(Error::InvalidNetwork(other.to_string())),
        }
    }
}

/// Network configuration
#[derive(Debug, Clone)]
pub struct Network {
    /// Network type
    pub network_type: NetworkType,
    /// Human-readable name
    pub name: &'static str,
    /// Registry API endpoint
    pub api_base_url: &'static str,
    /// Explorer prefix for transaction ids
    pub explorer_tx_url: &'static str,
    /// Explorer prefix for wallet addresses
    pub explorer_address_url: &'static str,
    /// Extension appended to bare search queries
    pub default_extension: &'static str,
    /// Extensions the registry accepts
    pub extensions: &'static [&'static str],
    /// Chain identifier for fixed-message signing
    pub chain_id: &'static str,
}

const PHPCOIN_EXTENSIONS: &[&str] = &[".phpcoin", ".phpcoin.net", ".dap.ad"];

impl Network {
    /// Get mainnet parameters
    pub const fn mainnet() -> Self {
        Self {
            network_type: NetworkType::Mainnet,
            name: "mainnet",
            api_base_url: "http://phpcoin.net:5000/api.php",
            explorer_tx_url: "https://explorer.phpcoin.net/tx/",
            explorer_address_url: "https://explorer.phpcoin.net/address/",
            default_extension: ".phpcoin",
            extensions: PHPCOIN_EXTENSIONS,
            chain_id: DEFAULT_CHAIN_ID,
        }
    }

    /// Get testnet parameters
    pub const fn testnet() -> Self {
        Self {
            network_type: NetworkType::Testnet,
            name: "testnet",
            api_base_url: "http://testnet.phpcoin.net:5000/api.php",
            explorer_tx_url: "https://testnet.phpcoin.net/tx/",
            explorer_address_url: "https://testnet.phpcoin.net/address/",
            default_extension: ".phpcoin",
            extensions: PHPCOIN_EXTENSIONS,
            chain_id: "00",
        }
    }

    /// Get local development parameters
    pub const fn local() -> Self {
        Self {
            network_type: NetworkType::Local,
            name: "local",
            api_base_url: "http://127.0.0.1:5000/api.php",
            explorer_tx_url: "http://127.0.0.1:5001/tx/",
            explorer_address_url: "http://127.0.0.1:5001/address/",
            default_extension: ".phpcoin",
            extensions: PHPCOIN_EXTENSIONS,
            chain_id: "00",
        }
    }

    /// Get network by type
    pub const fn from_type(network_type: NetworkType) -> Self {
        match network_type {
            NetworkType::Mainnet => Self::mainnet(),
            NetworkType::Testnet => Self::testnet(),
            NetworkType::Local => Self::local(),
        }
    }

    /// Whether `name` already ends with an extension this network serves
    pub fn has_known_extension(&self, name: &str) -> bool {
        self.extensions.iter().any(|ext| name.ends_with(ext))
    }

    /// Explorer link for a transaction
    pub fn tx_url(&self, transaction_id: &str) -> String {
        format!("{}{}", self.explorer_tx_url, transaction_id)
    }

    /// Explorer link for a wallet address
    pub fn address_url(&self, address: &str) -> String {
        format!("{}{}", self.explorer_address_url, address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mainnet_params() {
        let net = Network::mainnet();
        assert_eq!(net.network_type, NetworkType::Mainnet);
        assert_eq!(net.chain_id, "01");
        assert_eq!(net.default_extension, ".phpcoin");
        assert!(net.has_known_extension("dapp.phpcoin"));
        assert!(net.has_known_extension("web3.phpcoin.net"));
        assert!(net.has_known_extension("test.dap.ad"));
        assert!(!net.has_known_extension("example.com"));
    }

    #[test]
    fn test_network_from_type() {
        let net = Network::from_type(NetworkType::Testnet);
        assert_eq!(net.network_type, NetworkType::Testnet);
    }

    #[test]
    fn test_explorer_links() {
        let net = Network::mainnet();
        assert_eq!(net.tx_url("abc"), "https://explorer.phpcoin.net/tx/abc");
        assert_eq!(
            net.address_url("Pa1"),
            "https://explorer.phpcoin.net/address/Pa1"
        );
    }

    #[test]
    fn test_network_type_parse() {
        assert_eq!("Mainnet".parse::<NetworkType>().unwrap(), NetworkType::Mainnet);
        assert_eq!("local".parse::<NetworkType>().unwrap(), NetworkType::Local);
        assert!("moon".parse::<NetworkType>().is_err());
        let json = serde_json::to_string(&NetworkType::Testnet).unwrap();
        assert_eq!(json, "\"testnet\"");
    }
}
