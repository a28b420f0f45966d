//! PHPCoin name registry client
//!
//! Typed wrapper around the registry's single JSON endpoint. Every call
//! returns a `Result`; an unreachable registry is always [`ApiError::Offline`],
//! distinct from any answer the server gives.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod types;

pub use api::{Operation, RegistryApi};
pub use client::RegistryClient;
pub use config::ClientConfig;
pub use envelope::Envelope;
pub use error::{ApiError, Result, NETWORK_ERROR_MESSAGE};
pub use types::{
    AuthRequest, AuthResponse, FinalizeRequest, PrepareRegisterRequest, PrepareTransferRequest,
    PrepareUpdateRequest, TransactionReceipt, UnregisterRequest,
};
