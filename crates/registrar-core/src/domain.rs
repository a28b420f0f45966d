//! Domain records and name handling

use crate::amount::Amount;
use crate::dns::{DnsRecord, DnsTarget};
use crate::{Error, Result};
use registrar_params::Network;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Maximum length of a fully-qualified name
pub const MAX_NAME_LENGTH: usize = 253;

/// Maximum length of a single label
const MAX_LABEL_LENGTH: usize = 63;

/// Lower-case, trimmed form used as the cache key
pub fn normalize_name(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Normalize a search query and append the network's default extension when
/// the name does not already end in one the registry serves.
pub fn qualify_name(query: &str, network: &Network) -> String {
    let name = normalize_name(query);
    if name.is_empty() || network.has_known_extension(&name) {
        name
    } else {
        format!("{}{}", name, network.default_extension)
    }
}

/// Validate a normalized, fully-qualified name
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidDomainName("name is empty".to_string()));
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(Error::InvalidDomainName(format!(
            "name exceeds {} characters",
            MAX_NAME_LENGTH
        )));
    }

    for label in name.split('.') {
        if label.is_empty() {
            return Err(Error::InvalidDomainName(format!("'{}' has an empty label", name)));
        }
        if label.len() > MAX_LABEL_LENGTH {
            return Err(Error::InvalidDomainName(format!(
                "label '{}' exceeds {} characters",
                label, MAX_LABEL_LENGTH
            )));
        }
        if !label
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
        {
            return Err(Error::InvalidDomainName(format!(
                "label '{}' contains characters other than a-z, 0-9 and '-'",
                label
            )));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(Error::InvalidDomainName(format!(
                "label '{}' starts or ends with '-'",
                label
            )));
        }
    }

    Ok(())
}

/// Registration status of a name
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainStatus {
    /// Free to register
    Available,
    /// Owned by a wallet
    #[default]
    Taken,
    /// Held back by the registry
    Reserved,
    /// Lookup in progress; UI-only, never persisted
    Searching,
}

impl DomainStatus {
    /// Whether records with this status must stay out of durable storage
    pub fn is_transient(&self) -> bool {
        matches!(self, DomainStatus::Searching)
    }
}

impl fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainStatus::Available => write!(f, "available"),
            DomainStatus::Taken => write!(f, "taken"),
            DomainStatus::Reserved => write!(f, "reserved"),
            DomainStatus::Searching => write!(f, "searching"),
        }
    }
}

/// One registrable name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    /// Normalized fully-qualified name
    pub name: String,
    /// Owning wallet address
    #[serde(default)]
    pub owner: Option<String>,
    /// Registration status
    #[serde(default)]
    pub status: DomainStatus,
    /// Registration date
    #[serde(default)]
    pub created: Option<String>,
    /// Quoted or paid price
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_amount"
    )]
    pub price: Option<Amount>,
    /// Registering transaction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    /// Display string for the active DNS target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_site: Option<String>,
    /// DNS record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns: Option<DnsRecord>,
}

/// Prices the registry cannot quote arrive as placeholders such as `"N/A"`
fn lenient_amount<'de, D>(deserializer: D) -> std::result::Result<Option<Amount>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Amount::parse(&s).ok(),
        Some(serde_json::Value::Number(n)) => n.as_f64().and_then(|f| Amount::from_f64(f).ok()),
        _ => None,
    })
}

impl Domain {
    /// Minimal record with the given status
    pub fn new(name: &str, status: DomainStatus) -> Self {
        Self {
            name: normalize_name(name),
            owner: None,
            status,
            created: None,
            price: None,
            transaction_id: None,
            linked_site: None,
            dns: None,
        }
    }

    /// Unowned record quoting a registration price
    pub fn available(name: &str, price: Amount) -> Self {
        Self {
            price: Some(price),
            ..Self::new(name, DomainStatus::Available)
        }
    }

    /// Registry-held record
    pub fn reserved(name: &str) -> Self {
        Self::new(name, DomainStatus::Reserved)
    }

    /// Placeholder shown when the registry is unreachable
    pub fn unreachable(name: &str) -> Self {
        Self::new(name, DomainStatus::Taken)
    }

    /// Whether `address` owns this record
    pub fn is_owned_by(&self, address: &str) -> bool {
        self.owner.as_deref() == Some(address)
    }

    /// Canonical DNS target
    pub fn dns_target(&self) -> DnsTarget {
        self.dns
            .as_ref()
            .map(DnsTarget::from_record)
            .unwrap_or_default()
    }

    /// Rewrite the name into its cache key and the DNS record into its
    /// single-field canonical shape
    pub fn canonicalize(mut self) -> Self {
        self.name = normalize_name(&self.name);
        if let Some(record) = &self.dns {
            let target = DnsTarget::from_record(record);
            self.dns = match target {
                DnsTarget::None => None,
                _ => Some(target.to_record()),
            };
        }
        self
    }
}
