//! Account snapshot

use crate::amount::Amount;
use crate::domain::Domain;
use serde::{Deserialize, Serialize};

/// Balance and owned domains for one wallet, as reported by the registry.
/// The only authoritative source of domain ownership.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    /// Spendable balance
    #[serde(default)]
    pub balance: Amount,
    /// Domains the wallet owns
    #[serde(default)]
    pub domains: Vec<Domain>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_account() {
        let json = r#"{"balance": "12.5", "domains": [{"name": "DApp.phpcoin", "owner": "Pa1"}]}"#;
        let info: AccountInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.balance.to_string(), "12.50");
        assert_eq!(info.domains.len(), 1);
        assert!(info.domains[0].is_owned_by("Pa1"));
    }

    #[test]
    fn test_missing_fields_default() {
        let info: AccountInfo = serde_json::from_str("{}").unwrap();
        assert!(info.balance.is_zero());
        assert!(info.domains.is_empty());
    }
}
