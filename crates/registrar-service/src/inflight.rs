//! In-flight operation registry
//!
//! At most one submission per (operation, name) pair runs at a time. The
//! slot is held by an [`InFlightGuard`] and released when it drops, whether
//! the workflow succeeded, failed or was abandoned mid-await.

use crate::{Error, Result};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Mutating workflow kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Registration
    Register,
    /// DNS update
    Update,
    /// Ownership transfer
    Transfer,
    /// Release
    Unregister,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Register => write!(f, "registration"),
            OperationKind::Update => write!(f, "update"),
            OperationKind::Transfer => write!(f, "transfer"),
            OperationKind::Unregister => write!(f, "unregistration"),
        }
    }
}

type Key = (OperationKind, String);

/// Set of operations currently running
#[derive(Debug, Default)]
pub struct InFlightRegistry {
    active: Mutex<HashSet<Key>>,
}

impl InFlightRegistry {
    /// Create empty registry
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Claim the slot for `name` (already normalized), or fail with
    /// [`Error::InFlight`] when another submission holds it
    pub fn try_acquire(self: &Arc<Self>, operation: OperationKind, name: &str) -> Result<InFlightGuard> {
        let key = (operation, name.to_string());
        if !self.active.lock().insert(key.clone()) {
            tracing::debug!("Rejecting duplicate {} of {}", operation, name);
            return Err(Error::InFlight {
                operation,
                name: name.to_string(),
            });
        }
        Ok(InFlightGuard {
            registry: Arc::clone(self),
            key: Some(key),
        })
    }

    /// Whether the slot is held
    pub fn is_active(&self, operation: OperationKind, name: &str) -> bool {
        self.active.lock().contains(&(operation, name.to_string()))
    }

    /// Number of held slots
    pub fn len(&self) -> usize {
        self.active.lock().len()
    }

    /// Whether nothing is running
    pub fn is_empty(&self) -> bool {
        self.active.lock().is_empty()
    }
}

/// RAII slot in the [`InFlightRegistry`]
pub struct InFlightGuard {
    registry: Arc<InFlightRegistry>,
    key: Option<Key>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            self.registry.active.lock().remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_rejected_until_released() {
        let registry = InFlightRegistry::new();
        let guard = registry
            .try_acquire(OperationKind::Transfer, "dapp.phpcoin")
            .unwrap();
        assert!(registry.is_active(OperationKind::Transfer, "dapp.phpcoin"));

        let err = registry
            .try_acquire(OperationKind::Transfer, "dapp.phpcoin")
            .err()
            .unwrap();
        assert!(matches!(err, Error::InFlight { .. }));

        drop(guard);
        assert!(registry.is_empty());
        assert!(registry
            .try_acquire(OperationKind::Transfer, "dapp.phpcoin")
            .is_ok());
    }

    #[test]
    fn test_keys_are_independent() {
        let registry = InFlightRegistry::new();
        let _a = registry.try_acquire(OperationKind::Update, "a.phpcoin").unwrap();
        let _b = registry.try_acquire(OperationKind::Transfer, "a.phpcoin").unwrap();
        let _c = registry.try_acquire(OperationKind::Update, "b.phpcoin").unwrap();
        assert_eq!(registry.len(), 3);
    }
}
