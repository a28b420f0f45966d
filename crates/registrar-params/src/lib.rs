//! PHPCoin name service network parameters
//!
//! Registry endpoints, explorer links, domain extensions and the chain
//! identifier used for fixed-message signing.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod network;

pub use network::{Network, NetworkType, DEFAULT_CHAIN_ID};

/// Error types for parameter operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid network specified
    #[error("Invalid network: {0}")]
    InvalidNetwork(String),
}

/// Result type for parameter operations
pub type Result<T> = std::result::Result<T, Error>;
