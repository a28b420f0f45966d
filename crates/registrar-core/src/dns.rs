//! DNS targets for registered domains
//!
//! A domain points at exactly one thing at a time: an IP address, an IPFS
//! content id, a redirect URL, or nothing. [`DnsTarget`] is that canonical
//! form; [`DnsRecord`] is the shape on the wire and in local storage, and is
//! only ever written with at most one populated field.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

/// Maximum accepted length of a CID or redirect URL
pub const MAX_TARGET_LENGTH: usize = 2048;

/// DNS record as exchanged with the registry
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// A-record style address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    /// IPFS content id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipfs: Option<String>,
    /// Redirect URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

impl DnsRecord {
    /// No field populated
    pub fn is_empty(&self) -> bool {
        self.populated_fields() == 0
    }

    /// Number of non-empty fields
    pub fn populated_fields(&self) -> usize {
        [&self.ip, &self.ipfs, &self.redirect]
            .iter()
            .filter(|f| f.as_deref().is_some_and(|v| !v.trim().is_empty()))
            .count()
    }
}

/// Canonical DNS target
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum DnsTarget {
    /// No target; clears every field
    #[default]
    None,
    /// A-record
    Ip(IpAddr),
    /// IPFS pointer
    Ipfs(String),
    /// HTTP redirect
    Redirect(String),
}

impl DnsTarget {
    /// Parse an IP target
    pub fn ip(value: &str) -> Result<Self> {
        value
            .trim()
            .parse::<IpAddr>()
            .map(DnsTarget::Ip)
            .map_err(|_| Error::InvalidDns(format!("'{}' is not an IP address", value.trim())))
    }

    /// Parse an IPFS target
    pub fn ipfs(value: &str) -> Result<Self> {
        let cid = value.trim();
        if cid.is_empty() {
            return Err(Error::InvalidDns("IPFS content id is empty".to_string()));
        }
        if cid.len() > MAX_TARGET_LENGTH || !cid.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::InvalidDns(format!("'{}' is not an IPFS content id", cid)));
        }
        Ok(DnsTarget::Ipfs(cid.to_string()))
    }

    /// Parse a redirect target
    pub fn redirect(value: &str) -> Result<Self> {
        let url = value.trim();
        let rest = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .ok_or_else(|| {
                Error::InvalidDns(format!("redirect '{}' must start with http:// or https://", url))
            })?;
        if rest.is_empty() || rest.starts_with('/') || rest.chars().any(char::is_whitespace) {
            return Err(Error::InvalidDns(format!("redirect '{}' has no host", url)));
        }
        if url.len() > MAX_TARGET_LENGTH {
            return Err(Error::InvalidDns("redirect URL is too long".to_string()));
        }
        Ok(DnsTarget::Redirect(url.to_string()))
    }

    /// Read a record, keeping the first usable field in `ip`, `ipfs`,
    /// `redirect` order. Records from older clients may carry several.
    pub fn from_record(record: &DnsRecord) -> Self {
        let present = |f: &Option<String>| {
            f.as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        if let Some(ip) = present(&record.ip) {
            match Self::ip(&ip) {
                Ok(target) => return target,
                Err(e) => tracing::warn!("Ignoring stored ip field: {}", e),
            }
        }
        if let Some(cid) = present(&record.ipfs) {
            match Self::ipfs(&cid) {
                Ok(target) => return target,
                Err(e) => tracing::warn!("Ignoring stored ipfs field: {}", e),
            }
        }
        if let Some(url) = present(&record.redirect) {
            match Self::redirect(&url) {
                Ok(target) => return target,
                Err(e) => tracing::warn!("Ignoring stored redirect field: {}", e),
            }
        }
        DnsTarget::None
    }

    /// Single-field record for this target
    pub fn to_record(&self) -> DnsRecord {
        match self {
            DnsTarget::None => DnsRecord::default(),
            DnsTarget::Ip(ip) => DnsRecord {
                ip: Some(ip.to_string()),
                ..Default::default()
            },
            DnsTarget::Ipfs(cid) => DnsRecord {
                ipfs: Some(cid.clone()),
                ..Default::default()
            },
            DnsTarget::Redirect(url) => DnsRecord {
                redirect: Some(url.clone()),
                ..Default::default()
            },
        }
    }

    /// Display string for the active target
    pub fn linked_site(&self) -> Option<String> {
        match self {
            DnsTarget::None => None,
            DnsTarget::Ip(ip) => Some(format!("http://{}", ip)),
            DnsTarget::Ipfs(cid) => Some(format!("ipfs://{}", cid)),
            DnsTarget::Redirect(url) => Some(url.clone()),
        }
    }

    /// Mode label
    pub fn kind(&self) -> &'static str {
        match self {
            DnsTarget::None => "none",
            DnsTarget::Ip(_) => "ip",
            DnsTarget::Ipfs(_) => "ipfs",
            DnsTarget::Redirect(_) => "redirect",
        }
    }
}

impl fmt::Display for DnsTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DnsTarget::None => write!(f, "none"),
            DnsTarget::Ip(ip) => write!(f, "ip {}", ip),
            DnsTarget::Ipfs(cid) => write!(f, "ipfs {}", cid),
            DnsTarget::Redirect(url) => write!(f, "redirect {}", url),
        }
    }
}
