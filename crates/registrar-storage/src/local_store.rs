//! Key/value persistence seam

use crate::Result;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Key holding the full name-to-domain JSON map
pub const DOMAINS_KEY: &str = "phpcoin_domains";
/// Key holding the wallet private key
pub const PRIVATE_KEY_KEY: &str = "phpcoin_wallet_private_key";
/// Key holding the wallet address
pub const ADDRESS_KEY: &str = "phpcoin_wallet_address";

/// Durable string key/value store
pub trait LocalStore: Send + Sync {
    /// Read a value
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value; missing keys are not an error
    fn remove(&self, key: &str) -> Result<()>;
}

/// Process-local store for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    /// Whether the store holds nothing
    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values.write().remove(key);
        Ok(())
    }
}
