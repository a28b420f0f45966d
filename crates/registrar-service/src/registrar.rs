//! Registrar facade
//!
//! Builds every component from one configuration and hands out shared
//! handles. Components receive their collaborators explicitly; there is no
//! process-wide state.

use crate::config::ServiceConfig;
use crate::connectivity::{ApiStatus, Connectivity};
use crate::coordinator::AccountCoordinator;
use crate::directory::{Bootstrap, Directory, Quote};
use crate::reconcile::{DomainView, ViewEvent};
use crate::session::Session;
use crate::workflow::{TransactionEngine, TransactionOutcome};
use crate::{Error, Result};
use parking_lot::Mutex;
use registrar_client::{RegistryApi, RegistryClient};
use registrar_core::{AccountInfo, Amount, DnsTarget, Domain, PrivateKey, Signer};
use registrar_params::Network;
use registrar_storage::{Database, DomainCache, LocalStore, WalletStore};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

/// Wired registrar
pub struct Registrar {
    network: Network,
    connectivity: Arc<Connectivity>,
    session: Arc<Session>,
    cache: Arc<DomainCache>,
    coordinator: Arc<AccountCoordinator>,
    engine: TransactionEngine,
    directory: Directory,
    watcher: Mutex<Option<JoinHandle<()>>>,
}

impl Registrar {
    /// Open the on-disk store and HTTP client described by `config`
    pub fn open(config: &ServiceConfig, signer: Arc<dyn Signer>) -> Result<Self> {
        let data_dir = config.data_dir();
        std::fs::create_dir_all(&data_dir).map_err(|e| {
            Error::Config(format!("Cannot create {}: {}", data_dir.display(), e))
        })?;

        let db_path = config.database_path();
        let store: Arc<dyn LocalStore> = Arc::new(Database::open(&db_path)?);
        let api: Arc<dyn RegistryApi> = Arc::new(RegistryClient::new(&config.client_config())?);
        info!(
            "Registrar opened on {} (data: {})",
            config.network().name,
            db_path.display()
        );

        Ok(Self::with_parts(
            config.network(),
            config.reserved_seed(),
            api,
            store,
            signer,
        ))
    }

    /// Wire components around the given collaborators
    pub fn with_parts(
        network: Network,
        seed: Vec<Domain>,
        api: Arc<dyn RegistryApi>,
        store: Arc<dyn LocalStore>,
        signer: Arc<dyn Signer>,
    ) -> Self {
        let cache = Arc::new(DomainCache::load(Arc::clone(&store), seed));
        let connectivity = Arc::new(Connectivity::new());
        let session = Arc::new(Session::restore(
            Arc::clone(&api),
            Arc::clone(&signer),
            WalletStore::new(store),
            network.clone(),
        ));
        let coordinator = AccountCoordinator::new(Arc::clone(&api), Arc::clone(&cache), Arc::clone(&session));
        let engine = TransactionEngine::new(
            Arc::clone(&api),
            signer,
            Arc::clone(&session),
            Arc::clone(&connectivity),
            Arc::clone(&coordinator),
            network.clone(),
        );
        let directory = Directory::new(api, Arc::clone(&cache), Arc::clone(&connectivity), network.clone());

        Self {
            network,
            connectivity,
            session,
            cache,
            coordinator,
            engine,
            directory,
            watcher: Mutex::new(None),
        }
    }

    /// Start refreshing the account whenever the active address changes
    pub fn start(&self) {
        let mut watcher = self.watcher.lock();
        if watcher.is_none() {
            *watcher = Some(self.coordinator.watch_address());
        }
    }

    /// Network parameters
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Connectivity state
    pub fn connectivity(&self) -> &Arc<Connectivity> {
        &self.connectivity
    }

    /// Current connectivity
    pub fn status(&self) -> ApiStatus {
        self.connectivity.status()
    }

    /// Wallet session
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Domain cache
    pub fn cache(&self) -> &Arc<DomainCache> {
        &self.cache
    }

    /// Transaction engine
    pub fn engine(&self) -> &TransactionEngine {
        &self.engine
    }

    /// Probe and load landing data
    pub async fn bootstrap(&self) -> Bootstrap {
        self.directory.bootstrap().await
    }

    /// Look up a name
    pub async fn search(&self, query: &str) -> Result<Domain> {
        self.directory.search(query).await
    }

    /// Price quote
    pub fn quote(&self, query: &str) -> Result<Quote> {
        self.directory.quote(query)
    }

    /// Log in with a private key
    pub async fn login(&self, private_key: PrivateKey) -> Result<String> {
        self.session.connect(private_key).await
    }

    /// Log out
    pub fn logout(&self) -> Result<()> {
        self.session.disconnect()
    }

    /// Active wallet address
    pub fn address(&self) -> Option<String> {
        self.session.address()
    }

    /// Last reported balance
    pub fn balance(&self) -> Amount {
        self.session.balance()
    }

    /// Fetch the active account now
    pub async fn refresh_account(&self) -> Result<AccountInfo> {
        let address = self.session.address().ok_or(Error::Unauthenticated)?;
        self.coordinator.refresh(&address).await
    }

    /// Cached domains owned by the active wallet
    pub fn owned_domains(&self) -> Vec<Domain> {
        self.directory.owned_domains(self.session.address().as_deref())
    }

    /// Cached record
    pub fn domain(&self, name: &str) -> Option<Domain> {
        self.directory.get(name)
    }

    /// Register `name`
    pub async fn register(&self, name: &str) -> Result<TransactionOutcome> {
        self.engine.register(name).await
    }

    /// Replace the DNS target of `name`
    pub async fn update_dns(&self, name: &str, target: DnsTarget) -> Result<TransactionOutcome> {
        self.engine.update_dns(name, target).await
    }

    /// Transfer `name` to `recipient`
    pub async fn transfer(&self, name: &str, recipient: &str) -> Result<TransactionOutcome> {
        self.engine.transfer(name, recipient).await
    }

    /// Release `name`
    pub async fn unregister(&self, name: &str) -> Result<TransactionOutcome> {
        self.engine.unregister(name).await
    }

    /// Wait for background account refreshes to finish
    pub async fn settle(&self) {
        self.coordinator.settle().await
    }

    /// Follow `domain` while it is open for management
    pub fn open_view(&self, domain: Domain) -> (JoinHandle<()>, mpsc::Receiver<ViewEvent>) {
        DomainView::open(domain).follow(Arc::clone(&self.cache), Arc::clone(&self.session))
    }
}

impl Drop for Registrar {
    fn drop(&mut self) {
        if let Some(handle) = self.watcher.lock().take() {
            handle.abort();
        }
    }
}
