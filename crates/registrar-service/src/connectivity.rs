//! Registry connectivity state

use registrar_client::{ApiError, RegistryApi};
use registrar_core::GlobalStats;
use std::fmt;
use tokio::sync::watch;
use tracing::{info, warn};

/// Registry reachability as last observed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiStatus {
    /// Not probed yet
    Checking,
    /// Server answered
    Online,
    /// Transport failure; sticky until reset
    Offline,
}

impl fmt::Display for ApiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiStatus::Checking => write!(f, "checking"),
            ApiStatus::Online => write!(f, "online"),
            ApiStatus::Offline => write!(f, "offline"),
        }
    }
}

/// Session-wide connectivity flag
pub struct Connectivity {
    status: watch::Sender<ApiStatus>,
}

impl Connectivity {
    /// Start in [`ApiStatus::Checking`]
    pub fn new() -> Self {
        let (status, _) = watch::channel(ApiStatus::Checking);
        Self { status }
    }

    /// Current status
    pub fn status(&self) -> ApiStatus {
        *self.status.borrow()
    }

    /// Whether mutating operations must short-circuit
    pub fn is_offline(&self) -> bool {
        self.status() == ApiStatus::Offline
    }

    /// Watch status changes
    pub fn subscribe(&self) -> watch::Receiver<ApiStatus> {
        self.status.subscribe()
    }

    /// Record the outcome of a registry call. Only transport failures mark
    /// the registry offline; once offline, later answers do not clear it.
    pub fn observe<T>(&self, result: &Result<T, ApiError>) {
        match result {
            Err(ApiError::Offline) => {
                if self.status.send_if_modified(|s| {
                    let changed = *s != ApiStatus::Offline;
                    *s = ApiStatus::Offline;
                    changed
                }) {
                    warn!("Registry marked offline");
                }
            }
            _ => {
                if self.status.send_if_modified(|s| {
                    let changed = *s == ApiStatus::Checking;
                    if changed {
                        *s = ApiStatus::Online;
                    }
                    changed
                }) {
                    info!("Registry online");
                }
            }
        }
    }

    /// Probe with the stats call, which is also the bootstrap read
    pub async fn probe(&self, api: &dyn RegistryApi) -> Result<GlobalStats, ApiError> {
        let result = api.stats().await;
        self.observe(&result);
        result
    }

    /// Forget the sticky offline state
    pub fn reset(&self) {
        self.status.send_replace(ApiStatus::Checking);
    }
}

impl Default for Connectivity {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_answer_is_online() {
        let c = Connectivity::new();
        assert_eq!(c.status(), ApiStatus::Checking);
        c.observe::<()>(&Err(ApiError::Rejected("no".to_string())));
        assert_eq!(c.status(), ApiStatus::Online);
    }

    #[test]
    fn test_offline_is_sticky_until_reset() {
        let c = Connectivity::new();
        c.observe::<()>(&Err(ApiError::Offline));
        assert!(c.is_offline());
        c.observe(&Ok(()));
        assert!(c.is_offline());
        c.reset();
        assert_eq!(c.status(), ApiStatus::Checking);
        c.observe(&Ok(()));
        assert_eq!(c.status(), ApiStatus::Online);
    }
}
