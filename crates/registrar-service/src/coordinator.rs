//! Account coordinator
//!
//! Keeps the session balance and the domain cache in line with what the
//! registry reports for the active wallet. Refreshes run whenever the
//! address changes and, out of band, after every successful mutation.

use crate::session::Session;
use crate::{Error, Result};
use parking_lot::Mutex;
use registrar_client::RegistryApi;
use registrar_core::{AccountInfo, Amount};
use registrar_storage::DomainCache;
use std::sync::Arc;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info, warn};

/// Account refresh driver
pub struct AccountCoordinator {
    api: Arc<dyn RegistryApi>,
    cache: Arc<DomainCache>,
    session: Arc<Session>,
    pending: Mutex<JoinSet<()>>,
}

impl AccountCoordinator {
    /// Create coordinator
    pub fn new(api: Arc<dyn RegistryApi>, cache: Arc<DomainCache>, session: Arc<Session>) -> Arc<Self> {
        Arc::new(Self {
            api,
            cache,
            session,
            pending: Mutex::new(JoinSet::new()),
        })
    }

    /// Fetch the account for `address`, write its domains into the cache and
    /// its balance into the session. On failure the balance drops to zero
    /// rather than staying stale.
    pub async fn refresh(&self, address: &str) -> Result<AccountInfo> {
        debug!("Refreshing account {}", address);
        match self.api.account(address).await {
            Ok(info) => {
                if self.session.address().as_deref() == Some(address) {
                    self.session.set_balance(info.balance);
                } else {
                    debug!("Address changed during refresh; keeping balance of new wallet");
                }
                let changed = self.cache.upsert_many(info.domains.iter().cloned());
                info!(
                    "Account {} refreshed: balance {}, {} domains ({} changed)",
                    address,
                    info.balance,
                    info.domains.len(),
                    changed
                );
                Ok(info)
            }
            Err(e) => {
                warn!("Account refresh for {} failed: {}", address, e);
                if self.session.address().as_deref() == Some(address) {
                    self.session.set_balance(Amount::ZERO);
                }
                Err(Error::from(e))
            }
        }
    }

    /// Run [`refresh`](Self::refresh) in the background
    pub fn schedule_refresh(self: &Arc<Self>, address: String) {
        let this = Arc::clone(self);
        self.pending.lock().spawn(async move {
            // Failures are logged and reflected in the balance
            let _ = this.refresh(&address).await;
        });
        debug!("Scheduled account refresh");
    }

    /// Wait until every scheduled refresh has finished
    pub async fn settle(&self) {
        loop {
            let mut set = std::mem::take(&mut *self.pending.lock());
            if set.is_empty() {
                break;
            }
            while let Some(joined) = set.join_next().await {
                if let Err(e) = joined {
                    warn!("Account refresh task failed: {}", e);
                }
            }
        }
    }

    /// Refresh on every change of the active address, starting with the
    /// current one
    pub fn watch_address(self: &Arc<Self>) -> JoinHandle<()> {
        let this = Arc::clone(self);
        let mut rx = self.session.subscribe_address();
        tokio::spawn(async move {
            loop {
                let address = rx.borrow_and_update().clone();
                match address {
                    Some(address) => {
                        let _ = this.refresh(&address).await;
                    }
                    None => this.session.set_balance(Amount::ZERO),
                }
                if rx.changed().await.is_err() {
                    break;
                }
            }
            debug!("Address watcher stopped");
        })
    }
}
