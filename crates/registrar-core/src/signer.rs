//! Signing capability
//!
//! Key derivation, the signature algorithm and address validation live
//! outside this workspace. Workflows only see the [`Signer`] trait.

use crate::domain::normalize_name;
use crate::Result;
use async_trait::async_trait;
use std::fmt;
use zeroize::Zeroizing;

/// Wallet private key, wiped on drop
#[derive(Clone)]
pub struct PrivateKey(Zeroizing<String>);

impl PrivateKey {
    /// Wrap key material
    pub fn new(key: impl Into<String>) -> Self {
        Self(Zeroizing::new(key.into().trim().to_string()))
    }

    /// Key material for the signer
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Whether any key material is present
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_str() == other.0.as_str()
    }
}

impl Eq for PrivateKey {}

/// External signing capability
///
/// Implementations must be deterministic: the same key and message always
/// yield the same signature.
#[async_trait]
pub trait Signer: Send + Sync {
    /// Derive the public key for `key`
    async fn public_key(&self, key: &PrivateKey) -> Result<String>;

    /// Sign `message` with `key`
    async fn sign(&self, message: &str, key: &PrivateKey) -> Result<String>;

    /// Whether `address` is a well-formed wallet address
    async fn is_valid_address(&self, address: &str) -> Result<bool>;
}

/// Fixed message for one-phase operations: chain id followed by the
/// normalized domain name
pub fn fixed_message(chain_id: &str, name: &str) -> String {
    format!("{}{}", chain_id, normalize_name(name))
}

/// Login challenge: chain id followed by the client nonce
pub fn login_message(chain_id: &str, nonce: &str) -> String {
    format!("{}{}", chain_id, nonce)
}
