//! Wallet session
//!
//! Holds the active wallet's key and address, and the balance last reported
//! for it. Address and balance changes are published on watch channels so
//! the account coordinator and open views can react.

use crate::{Error, Result};
use parking_lot::RwLock;
use rand::distributions::Alphanumeric;
use rand::Rng;
use registrar_client::{AuthRequest, RegistryApi};
use registrar_core::{login_message, Amount, PrivateKey, Signer};
use registrar_params::Network;
use registrar_storage::WalletStore;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Length of the login nonce
pub const NONCE_LENGTH: usize = 10;

/// Random alphanumeric login nonce
pub fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LENGTH)
        .map(char::from)
        .collect()
}

/// Active wallet session
pub struct Session {
    api: Arc<dyn RegistryApi>,
    signer: Arc<dyn Signer>,
    wallet_store: WalletStore,
    network: Network,
    key: RwLock<Option<PrivateKey>>,
    address: watch::Sender<Option<String>>,
    balance: watch::Sender<Amount>,
}

impl Session {
    /// Create a session, restoring any persisted wallet
    pub fn restore(
        api: Arc<dyn RegistryApi>,
        signer: Arc<dyn Signer>,
        wallet_store: WalletStore,
        network: Network,
    ) -> Self {
        let stored = match wallet_store.load() {
            Ok(stored) => stored,
            Err(e) => {
                error!("Could not read stored wallet: {}", e);
                None
            }
        };

        let (key, address) = match stored {
            Some(wallet) => {
                info!("Restored wallet session for {}", wallet.address);
                (Some(wallet.private_key), Some(wallet.address))
            }
            None => (None, None),
        };

        let (address, _) = watch::channel(address);
        let (balance, _) = watch::channel(Amount::ZERO);
        Self {
            api,
            signer,
            wallet_store,
            network,
            key: RwLock::new(key),
            address,
            balance,
        }
    }

    /// Log in: sign a fresh challenge, exchange it for the wallet address,
    /// then persist and publish the session. Returns the address.
    pub async fn connect(&self, private_key: PrivateKey) -> Result<String> {
        if private_key.is_empty() {
            return Err(Error::Validation("Please enter your private key.".to_string()));
        }

        let nonce = generate_nonce();
        let message = login_message(self.network.chain_id, &nonce);
        let public_key = self
            .signer
            .public_key(&private_key)
            .await
            .map_err(|e| Error::ClientException(format!("Error signing login: {}", e)))?;
        let signature = self
            .signer
            .sign(&message, &private_key)
            .await
            .map_err(|e| Error::ClientException(format!("Error signing login: {}", e)))?;

        debug!("Authenticating public key {}", public_key);
        let response = self
            .api
            .auth(&AuthRequest {
                nonce,
                signature,
                public_key,
            })
            .await
            .map_err(|e| {
                warn!("Login failed: {}", e);
                Error::from(e)
            })?;

        if response.address.trim().is_empty() {
            return Err(Error::RemoteRejected(
                "Authentication failed. Please check your key.".to_string(),
            ));
        }

        self.wallet_store.save(&private_key, &response.address)?;
        *self.key.write() = Some(private_key);
        self.address.send_replace(Some(response.address.clone()));
        info!("Wallet connected: {}", response.address);
        Ok(response.address)
    }

    /// Log out and forget the persisted key
    pub fn disconnect(&self) -> Result<()> {
        *self.key.write() = None;
        self.address.send_replace(None);
        self.balance.send_replace(Amount::ZERO);
        self.wallet_store.clear()?;
        info!("Wallet disconnected");
        Ok(())
    }

    /// Signing key, if logged in
    pub fn private_key(&self) -> Option<PrivateKey> {
        self.key.read().clone()
    }

    /// Active address, if logged in
    pub fn address(&self) -> Option<String> {
        self.address.borrow().clone()
    }

    /// Whether a wallet is connected
    pub fn is_connected(&self) -> bool {
        self.address.borrow().is_some()
    }

    /// Watch the active address
    pub fn subscribe_address(&self) -> watch::Receiver<Option<String>> {
        self.address.subscribe()
    }

    /// Last reported balance
    pub fn balance(&self) -> Amount {
        *self.balance.borrow()
    }

    /// Record a balance for the active wallet
    pub fn set_balance(&self, balance: Amount) {
        self.balance.send_replace(balance);
    }

    /// Watch the balance
    pub fn subscribe_balance(&self) -> watch::Receiver<Amount> {
        self.balance.subscribe()
    }

    /// Network this session signs for
    pub fn network(&self) -> &Network {
        &self.network
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonce_shape() {
        let a = generate_nonce();
        let b = generate_nonce();
        assert_eq!(a.len(), NONCE_LENGTH);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }
}
