//! Registry operations

use crate::error::Result;
use crate::types::{
    AuthRequest, AuthResponse, FinalizeRequest, PrepareRegisterRequest, PrepareTransferRequest,
    PrepareUpdateRequest, TransactionReceipt, UnregisterRequest,
};
use async_trait::async_trait;
use registrar_core::{AccountInfo, Domain, GlobalStats, SignablePayload};
use std::fmt;

/// Registry operation, named as it appears in the `q` query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Wallet login
    Auth,
    /// Aggregate counters
    Stats,
    /// Single-name lookup
    Search,
    /// Popular names
    Trending,
    /// Build a registration payload
    PrepareRegister,
    /// Commit a signed registration
    FinalizeRegister,
    /// Build a DNS update payload
    PrepareUpdate,
    /// Commit a signed DNS update
    FinalizeUpdate,
    /// Build a transfer payload
    PrepareTransfer,
    /// Commit a signed transfer
    FinalizeTransfer,
    /// Release a name
    Unregister,
    /// Balance and owned names
    Account,
}

impl Operation {
    /// Query parameter value
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Auth => "auth",
            Operation::Stats => "stats",
            Operation::Search => "search",
            Operation::Trending => "trending",
            Operation::PrepareRegister => "prepareRegister",
            Operation::FinalizeRegister => "finalizeRegister",
            Operation::PrepareUpdate => "prepareUpdate",
            Operation::FinalizeUpdate => "finalizeUpdate",
            Operation::PrepareTransfer => "prepareTransfer",
            Operation::FinalizeTransfer => "finalizeTransfer",
            Operation::Unregister => "unregister",
            Operation::Account => "account",
        }
    }

    /// Whether the operation changes registry state
    pub fn is_mutating(&self) -> bool {
        !matches!(
            self,
            Operation::Auth
                | Operation::Stats
                | Operation::Search
                | Operation::Trending
                | Operation::Account
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remote registry
///
/// One method per registry operation. Implementations own no state and
/// report an unreachable registry as [`crate::ApiError::Offline`].
#[async_trait]
pub trait RegistryApi: Send + Sync {
    /// Exchange a signed nonce for the wallet address
    async fn auth(&self, request: &AuthRequest) -> Result<AuthResponse>;

    /// Registry-wide counters
    async fn stats(&self) -> Result<GlobalStats>;

    /// Look up one name
    async fn search(&self, name: &str) -> Result<Domain>;

    /// Popular names
    async fn trending(&self) -> Result<Vec<String>>;

    /// Build the registration payload
    async fn prepare_register(&self, request: &PrepareRegisterRequest) -> Result<SignablePayload>;

    /// Commit a signed registration
    async fn finalize_register(&self, request: &FinalizeRequest) -> Result<TransactionReceipt>;

    /// Build the DNS update payload
    async fn prepare_update(&self, request: &PrepareUpdateRequest) -> Result<SignablePayload>;

    /// Commit a signed DNS update
    async fn finalize_update(&self, request: &FinalizeRequest) -> Result<TransactionReceipt>;

    /// Build the transfer payload
    async fn prepare_transfer(&self, request: &PrepareTransferRequest) -> Result<SignablePayload>;

    /// Commit a signed transfer
    async fn finalize_transfer(&self, request: &FinalizeRequest) -> Result<TransactionReceipt>;

    /// Release a name with a fixed-message signature
    async fn unregister(&self, request: &UnregisterRequest) -> Result<TransactionReceipt>;

    /// Balance and owned names for `address`
    async fn account(&self, address: &str) -> Result<AccountInfo>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_names() {
        assert_eq!(Operation::PrepareRegister.to_string(), "prepareRegister");
        assert_eq!(Operation::Account.as_str(), "account");
        assert!(Operation::FinalizeTransfer.is_mutating());
        assert!(Operation::Unregister.is_mutating());
        assert!(!Operation::Search.is_mutating());
    }
}
