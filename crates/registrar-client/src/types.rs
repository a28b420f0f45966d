//! Request and response bodies

use registrar_core::{DnsRecord, SignablePayload};
use serde::{Deserialize, Serialize};

/// Login challenge response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest {
    /// Client nonce
    pub nonce: String,
    /// Signature over chain id and nonce
    pub signature: String,
    /// Signer public key
    pub public_key: String,
}

/// Authenticated wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Wallet address bound to the public key
    pub address: String,
}

/// Intent to register a name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepareRegisterRequest {
    /// Normalized name
    pub name: String,
    /// Registrant public key
    pub public_key: String,
}

/// Intent to replace a name's DNS record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepareUpdateRequest {
    /// Normalized name
    pub name: String,
    /// Single-field record; empty clears every field
    pub dns: DnsRecord,
}

/// Intent to hand a name to another wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepareTransferRequest {
    /// Normalized name
    pub name: String,
    /// Recipient address
    pub new_owner: String,
}

/// Signed prepare-phase payload sent back to commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalizeRequest {
    /// Payload exactly as the registry issued it
    #[serde(rename = "dataToSign")]
    pub serialized_payload: SignablePayload,
    /// Signature over the payload bytes
    #[serde(rename = "finalSignature")]
    pub signature: String,
    /// Signer public key
    #[serde(rename = "publicKey")]
    pub public_key: String,
}

/// One-phase unregister
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnregisterRequest {
    /// Normalized name
    pub name: String,
    /// Signature over chain id and name
    pub signature: String,
    /// Signer public key
    pub public_key: String,
}

/// Committed transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    /// On-chain transaction id
    pub transaction_id: String,
}
