//! Open-domain view reconciliation
//!
//! While a domain is open for management, every cache revision and every
//! address change re-derives what the view should show. Refreshes arrive
//! asynchronously and out of order, so the decision is recomputed each time
//! rather than tracked incrementally.

use crate::session::Session;
use registrar_core::Domain;
use registrar_storage::DomainCache;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Outcome of comparing the displayed record with the cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewDecision {
    /// Displayed record is current
    Keep,
    /// Show this fresher record instead
    Replace(Domain),
    /// Record vanished or changed hands; leave for the owned-domains list
    NavigateToOwnedList,
}

/// Decide what to do with `displayed` given the latest cache entry for the
/// same name and the active wallet
pub fn reconcile(displayed: &Domain, latest: Option<&Domain>, active: Option<&str>) -> ViewDecision {
    match latest {
        None => ViewDecision::NavigateToOwnedList,
        Some(latest) if latest.owner.as_deref() != active || active.is_none() => {
            ViewDecision::NavigateToOwnedList
        }
        Some(latest) if latest != displayed => ViewDecision::Replace(latest.clone()),
        Some(_) => ViewDecision::Keep,
    }
}

/// Event emitted by a followed view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// The open record changed
    Updated(Domain),
    /// The view is no longer valid
    NavigateToOwnedList,
}

/// The domain currently open for management
#[derive(Debug, Default, Clone)]
pub struct DomainView {
    current: Option<Domain>,
}

impl DomainView {
    /// Open a record
    pub fn open(domain: Domain) -> Self {
        Self {
            current: Some(domain),
        }
    }

    /// Displayed record
    pub fn current(&self) -> Option<&Domain> {
        self.current.as_ref()
    }

    /// Whether a record is open
    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// Re-evaluate against the cache. After navigating away the view holds
    /// nothing, so navigation is reported once.
    pub fn apply(&mut self, cache: &DomainCache, active: Option<&str>) -> Option<ViewEvent> {
        let displayed = self.current.as_ref()?;
        let latest = cache.get(&displayed.name);
        match reconcile(displayed, latest.as_ref(), active) {
            ViewDecision::Keep => None,
            ViewDecision::Replace(domain) => {
                debug!("View of {} refreshed from cache", domain.name);
                self.current = Some(domain.clone());
                Some(ViewEvent::Updated(domain))
            }
            ViewDecision::NavigateToOwnedList => {
                debug!("View of {} no longer valid", displayed.name);
                self.current = None;
                Some(ViewEvent::NavigateToOwnedList)
            }
        }
    }

    /// Follow cache revisions and address changes in a background task,
    /// sending events until the view closes or the receiver is dropped
    pub fn follow(
        mut self,
        cache: Arc<DomainCache>,
        session: Arc<Session>,
    ) -> (JoinHandle<()>, mpsc::Receiver<ViewEvent>) {
        let (tx, rx) = mpsc::channel(16);
        let mut revisions = cache.subscribe();
        let mut addresses = session.subscribe_address();

        let handle = tokio::spawn(async move {
            while self.is_open() {
                tokio::select! {
                    changed = revisions.changed() => if changed.is_err() { break },
                    changed = addresses.changed() => if changed.is_err() { break },
                }
                let active = addresses.borrow_and_update().clone();
                revisions.borrow_and_update();
                if let Some(event) = self.apply(&cache, active.as_deref()) {
                    if tx.send(event).await.is_err() {
                        break;
                    }
                }
            }
            debug!("View follower stopped");
        });

        (handle, rx)
    }
}
