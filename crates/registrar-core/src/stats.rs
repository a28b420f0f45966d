//! Registry-wide aggregate counters

use crate::amount::Amount;
use crate::domain::{Domain, DomainStatus};
use serde::{Deserialize, Serialize};

/// Aggregate counters reported by the registry
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStats {
    /// Registered (taken) domains
    #[serde(default)]
    pub total_domains: u64,
    /// Sum of registration prices
    #[serde(default)]
    pub total_funds: Amount,
}

impl GlobalStats {
    /// Recompute the counters from local records. Used only when the
    /// registry aggregate is unavailable; records without a price count as
    /// zero.
    pub fn derive<'a, I>(domains: I) -> Self
    where
        I: IntoIterator<Item = &'a Domain>,
    {
        domains
            .into_iter()
            .filter(|d| d.status == DomainStatus::Taken)
            .fold(GlobalStats::default(), |acc, d| GlobalStats {
                total_domains: acc.total_domains + 1,
                total_funds: acc
                    .total_funds
                    .saturating_add(d.price.unwrap_or_default()),
            })
    }
}
