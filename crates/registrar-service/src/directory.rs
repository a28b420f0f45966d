//! Read paths: bootstrap, search, owned domains and price quotes
//!
//! Nothing here writes the domain cache. Reads degrade instead of failing:
//! an unreachable registry yields placeholders and locally derived stats.

use crate::connectivity::{ApiStatus, Connectivity};
use crate::{Error, Result};
use registrar_client::RegistryApi;
use registrar_core::{
    qualify_name, refund_quote, registration_price, validate_name, Amount, Domain, DomainStatus,
    GlobalStats,
};
use registrar_params::Network;
use registrar_storage::DomainCache;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Landing-page data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bootstrap {
    /// Registry counters, or counters derived from the cache
    pub stats: GlobalStats,
    /// Trending names; empty when unavailable
    pub trending: Vec<String>,
    /// Connectivity after probing
    pub status: ApiStatus,
    /// Whether `stats` came from the cache
    pub derived: bool,
}

/// Price quote for a name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    /// Qualified name
    pub name: String,
    /// Registration price
    pub registration: Amount,
    /// Refund on unregister
    pub refund: Amount,
}

/// Registry read access
pub struct Directory {
    api: Arc<dyn RegistryApi>,
    cache: Arc<DomainCache>,
    connectivity: Arc<Connectivity>,
    network: Network,
}

impl Directory {
    /// Create directory
    pub fn new(
        api: Arc<dyn RegistryApi>,
        cache: Arc<DomainCache>,
        connectivity: Arc<Connectivity>,
        network: Network,
    ) -> Self {
        Self {
            api,
            cache,
            connectivity,
            network,
        }
    }

    /// Probe the registry and load stats and trending names
    pub async fn bootstrap(&self) -> Bootstrap {
        match self.connectivity.probe(self.api.as_ref()).await {
            Ok(stats) => {
                let trending = self.api.trending().await.unwrap_or_else(|e| {
                    warn!("Trending names unavailable: {}", e);
                    Vec::new()
                });
                info!(
                    "Registry reports {} domains, {} trending",
                    stats.total_domains,
                    trending.len()
                );
                Bootstrap {
                    stats,
                    trending,
                    status: self.connectivity.status(),
                    derived: false,
                }
            }
            Err(e) => {
                warn!("Stats unavailable, deriving from cache: {}", e);
                Bootstrap {
                    stats: GlobalStats::derive(self.cache.snapshot().iter()),
                    trending: Vec::new(),
                    status: self.connectivity.status(),
                    derived: true,
                }
            }
        }
    }

    /// Look up a name. Offline yields a taken placeholder; a registry error
    /// yields an available record at the local price.
    pub async fn search(&self, query: &str) -> Result<Domain> {
        let name = qualify_name(query, &self.network);
        if name.is_empty() {
            return Err(Error::Validation("Please enter a domain name.".to_string()));
        }
        validate_name(&name)?;

        if self.connectivity.is_offline() {
            debug!("Offline; returning placeholder for {}", name);
            return Ok(Domain::unreachable(&name));
        }

        let result = self.api.search(&name).await;
        self.connectivity.observe(&result);
        match result {
            Ok(domain) => {
                let mut domain = domain.canonicalize();
                if domain.name.is_empty() {
                    domain.name = name.clone();
                }
                if domain.status == DomainStatus::Available && domain.price.is_none() {
                    domain.price = Some(registration_price(&domain.name));
                }
                debug!("Search {}: {}", domain.name, domain.status);
                Ok(domain)
            }
            Err(e) if e.is_offline() => Ok(Domain::unreachable(&name)),
            Err(e) => {
                warn!("Search for {} failed, assuming available: {}", name, e);
                Ok(Domain::available(&name, registration_price(&name)))
            }
        }
    }

    /// Cached records owned by `address`
    pub fn owned_domains(&self, address: Option<&str>) -> Vec<Domain> {
        self.cache.owned_by(address)
    }

    /// Cached record for `name`
    pub fn get(&self, name: &str) -> Option<Domain> {
        self.cache.get(name)
    }

    /// Registration price and refund for `query`. The refund uses the
    /// recorded purchase price when the cache has one.
    pub fn quote(&self, query: &str) -> Result<Quote> {
        let name = qualify_name(query, &self.network);
        validate_name(&name)?;
        let registration = registration_price(&name);
        let paid = self
            .cache
            .get(&name)
            .and_then(|d| d.price)
            .unwrap_or(registration);
        Ok(Quote {
            name,
            registration,
            refund: refund_quote(paid),
        })
    }
}
