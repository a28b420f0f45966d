//! Domain cache
//!
//! The local view of domain records between registry refreshes. Keys are
//! always normalized names. Every mutation rewrites the full map to the
//! local store before the lock is released, and bumps a revision counter
//! that observers can watch.

use crate::local_store::{LocalStore, DOMAINS_KEY};
use parking_lot::RwLock;
use registrar_core::{normalize_name, Domain};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, warn};

/// Name-keyed domain records backed by a [`LocalStore`]
pub struct DomainCache {
    store: Arc<dyn LocalStore>,
    domains: RwLock<BTreeMap<String, Domain>>,
    revision: watch::Sender<u64>,
}

impl DomainCache {
    /// Load the persisted map. A missing or unreadable map falls back to
    /// `seed`; individual unreadable records are dropped.
    pub fn load(store: Arc<dyn LocalStore>, seed: Vec<Domain>) -> Self {
        let loaded = match store.get(DOMAINS_KEY) {
            Ok(Some(json)) => decode_map(&json),
            Ok(None) => None,
            Err(e) => {
                error!("Could not read domains from local storage: {}", e);
                None
            }
        };

        let (domains, seeded) = match loaded {
            Some(map) => (map, false),
            None => {
                let map = seed
                    .into_iter()
                    .map(Domain::canonicalize)
                    .filter(|d| !d.status.is_transient())
                    .map(|d| (d.name.clone(), d))
                    .collect();
                (map, true)
            }
        };

        debug!("Domain cache loaded with {} records (seeded={})", domains.len(), seeded);

        let (revision, _) = watch::channel(0);
        let cache = Self {
            store,
            domains: RwLock::new(domains),
            revision,
        };
        if seeded {
            cache.persist(&cache.domains.read());
        }
        cache
    }

    /// Record for `name`, normalized before lookup
    pub fn get(&self, name: &str) -> Option<Domain> {
        self.domains.read().get(&normalize_name(name)).cloned()
    }

    /// Replace or insert each record wholesale under its normalized name.
    /// Returns how many entries changed; identical records are no-ops.
    pub fn upsert_many<I>(&self, domains: I) -> usize
    where
        I: IntoIterator<Item = Domain>,
    {
        let mut map = self.domains.write();
        let mut changed = 0;
        for domain in domains {
            let domain = domain.canonicalize();
            if map.get(&domain.name) != Some(&domain) {
                map.insert(domain.name.clone(), domain);
                changed += 1;
            }
        }

        if changed > 0 {
            self.persist(&map);
            self.revision.send_modify(|r| *r += 1);
            debug!("Domain cache updated {} records", changed);
        }
        changed
    }

    /// Records owned by `address`, in name order; empty when no address
    pub fn owned_by(&self, address: Option<&str>) -> Vec<Domain> {
        let Some(address) = address else {
            return Vec::new();
        };
        self.domains
            .read()
            .values()
            .filter(|d| d.is_owned_by(address))
            .cloned()
            .collect()
    }

    /// All records, in name order
    pub fn snapshot(&self) -> Vec<Domain> {
        self.domains.read().values().cloned().collect()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.domains.read().len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.domains.read().is_empty()
    }

    /// Mutation counter
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Watch the mutation counter
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn persist(&self, map: &BTreeMap<String, Domain>) {
        let durable: BTreeMap<&str, &Domain> = map
            .iter()
            .filter(|(_, d)| !d.status.is_transient())
            .map(|(k, d)| (k.as_str(), d))
            .collect();

        let result = serde_json::to_string(&durable)
            .map_err(crate::Error::from)
            .and_then(|json| self.store.set(DOMAINS_KEY, &json));
        if let Err(e) = result {
            error!("Could not save domains to local storage: {}", e);
        }
    }
}

fn decode_map(json: &str) -> Option<BTreeMap<String, Domain>> {
    let raw: BTreeMap<String, serde_json::Value> = match serde_json::from_str(json) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Could not parse domains from local storage: {}", e);
            return None;
        }
    };

    let mut map = BTreeMap::new();
    for (key, value) in raw {
        match serde_json::from_value::<Domain>(value) {
            Ok(domain) => {
                let domain = domain.canonicalize();
                if !domain.status.is_transient() {
                    map.insert(domain.name.clone(), domain);
                }
            }
            Err(e) => warn!("Dropping unreadable cached record {}: {}", key, e),
        }
    }
    Some(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_store::MemoryStore;
    use registrar_core::DomainStatus;

    fn setup_cache() -> (Arc<MemoryStore>, DomainCache) {
        let store = Arc::new(MemoryStore::new());
        let cache = DomainCache::load(store.clone(), vec![Domain::reserved("admin.phpcoin")]);
        (store, cache)
    }

    fn owned(name: &str, owner: &str) -> Domain {
        Domain {
            owner: Some(owner.to_string()),
            ..Domain::new(name, DomainStatus::Taken)
        }
    }

    #[test]
    fn test_empty_store_is_seeded_and_persisted() {
        let (store, cache) = setup_cache();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("ADMIN.phpcoin").unwrap().status, DomainStatus::Reserved);
        assert!(store.get(DOMAINS_KEY).unwrap().unwrap().contains("admin.phpcoin"));
    }

    #[test]
    fn test_corrupt_store_falls_back_to_seed() {
        let store = Arc::new(MemoryStore::new());
        store.set(DOMAINS_KEY, "{{{not json").unwrap();
        let cache = DomainCache::load(store, vec![Domain::reserved("system.dap.ad")]);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("system.dap.ad").is_some());
    }

    #[test]
    fn test_bad_record_is_dropped() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(
                DOMAINS_KEY,
                r#"{"Good.phpcoin":{"name":"Good.phpcoin","owner":"Pa1","status":"taken"},"bad.phpcoin":{"status":7}}"#,
            )
            .unwrap();
        let cache = DomainCache::load(store, vec![]);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("good.phpcoin").is_some());
    }

    #[test]
    fn test_upsert_normalizes_and_overwrites_wholesale() {
        let (_store, cache) = setup_cache();
        let mut first = owned("Dapp.PHPCoin", "Pa1");
        first.linked_site = Some("https://phpcoin.net".to_string());
        cache.upsert_many(vec![first]);

        cache.upsert_many(vec![owned("dapp.phpcoin", "Pa1")]);
        let stored = cache.get("DAPP.phpcoin").unwrap();
        assert_eq!(stored.name, "dapp.phpcoin");
        assert_eq!(stored.linked_site, None);
    }

    #[test]
    fn test_identical_upsert_is_noop() {
        let (_store, cache) = setup_cache();
        assert_eq!(cache.upsert_many(vec![owned("a.phpcoin", "Pa1")]), 1);
        let revision = cache.revision();
        assert_eq!(cache.upsert_many(vec![owned("A.phpcoin", "Pa1")]), 0);
        assert_eq!(cache.revision(), revision);
    }

    #[test]
    fn test_owned_by() {
        let (_store, cache) = setup_cache();
        cache.upsert_many(vec![
            owned("b.phpcoin", "Pa1"),
            owned("a.phpcoin", "Pa1"),
            owned("c.phpcoin", "Pb2"),
        ]);
        let names: Vec<_> = cache
            .owned_by(Some("Pa1"))
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["a.phpcoin", "b.phpcoin"]);
        assert!(cache.owned_by(None).is_empty());
    }

    #[test]
    fn test_searching_records_are_not_persisted() {
        let (store, cache) = setup_cache();
        cache.upsert_many(vec![Domain::new("pending.phpcoin", DomainStatus::Searching)]);
        assert!(cache.get("pending.phpcoin").is_some());

        let json = store.get(DOMAINS_KEY).unwrap().unwrap();
        assert!(!json.contains("pending.phpcoin"));
    }

    #[tokio::test]
    async fn test_subscribers_see_revisions() {
        let (_store, cache) = setup_cache();
        let mut rx = cache.subscribe();
        cache.upsert_many(vec![owned("a.phpcoin", "Pa1")]);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), 1);
    }
}
