//! Wallet credential persistence
//!
//! The private key is stored in plaintext, next to the wallet address, so a
//! session survives restarts. Anyone who can read the data directory can
//! read the key.

use crate::local_store::{LocalStore, ADDRESS_KEY, PRIVATE_KEY_KEY};
use crate::Result;
use registrar_core::PrivateKey;
use std::sync::Arc;
use zeroize::Zeroizing;

/// Persisted wallet session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredWallet {
    /// Private key
    pub private_key: PrivateKey,
    /// Address the registry bound to the key
    pub address: String,
}

/// Reads and writes the wallet's key and address
#[derive(Clone)]
pub struct WalletStore {
    store: Arc<dyn LocalStore>,
}

impl WalletStore {
    /// Create over a local store
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    /// Persist a logged-in wallet
    pub fn save(&self, private_key: &PrivateKey, address: &str) -> Result<()> {
        self.store.set(PRIVATE_KEY_KEY, private_key.expose())?;
        self.store.set(ADDRESS_KEY, address)?;
        tracing::debug!("Persisted wallet session for {}", address);
        Ok(())
    }

    /// Restore a previous session; a key without an address (or the reverse)
    /// counts as no session
    pub fn load(&self) -> Result<Option<StoredWallet>> {
        let key = self.store.get(PRIVATE_KEY_KEY)?.map(Zeroizing::new);
        let address = self.store.get(ADDRESS_KEY)?;
        Ok(match (key, address) {
            (Some(key), Some(address)) if !key.trim().is_empty() && !address.is_empty() => {
                Some(StoredWallet {
                    private_key: PrivateKey::new(key.as_str()),
                    address,
                })
            }
            _ => None,
        })
    }

    /// Stored private key
    pub fn private_key(&self) -> Result<Option<PrivateKey>> {
        Ok(self
            .store
            .get(PRIVATE_KEY_KEY)?
            .map(Zeroizing::new)
            .filter(|k| !k.trim().is_empty())
            .map(|k| PrivateKey::new(k.as_str())))
    }

    /// Forget the wallet
    pub fn clear(&self) -> Result<()> {
        self.store.remove(PRIVATE_KEY_KEY)?;
        self.store.remove(ADDRESS_KEY)?;
        Ok(())
    }
}
