//! PHPCoin name service core
//!
//! Domain records, DNS targets, coin amounts and pricing, the opaque
//! prepare-phase payload and the signing capability the workflows depend on.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod account;
pub mod amount;
pub mod dns;
pub mod domain;
pub mod error;
pub mod payload;
pub mod pricing;
pub mod signer;
pub mod stats;

pub use account::AccountInfo;
pub use amount::{Amount, COIN, DECIMALS};
pub use dns::{DnsRecord, DnsTarget};
pub use domain::{
    normalize_name, qualify_name, validate_name, Domain, DomainStatus, MAX_NAME_LENGTH,
};
pub use error::{Error, ErrorCategory, Result};
pub use payload::SignablePayload;
pub use pricing::{refund_quote, registration_price, REFUND_PERCENT};
pub use signer::{fixed_message, login_message, PrivateKey, Signer};
pub use stats::GlobalStats;
