//! Error types for the registrar core
//!
//! Validation and local-fault taxonomy shared by the client, storage and
//! service crates.

use std::fmt;

/// Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Registrar core errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed domain name
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    /// Malformed wallet address
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Malformed coin amount
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Amount arithmetic overflowed
    #[error("Amount overflow: {0}")]
    AmountOverflow(String),

    /// Malformed DNS target
    #[error("Invalid DNS record: {0}")]
    InvalidDns(String),

    /// Key derivation or signing failed
    #[error("Signing error: {0}")]
    Signing(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Check if error is a user-facing error (vs internal error)
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidDomainName(_)
                | Error::InvalidAddress(_)
                | Error::InvalidAmount(_)
                | Error::InvalidDns(_)
        )
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Error::InvalidDomainName(_) => {
                "The domain name is invalid. Use letters, digits and hyphens only.".to_string()
            }
            Error::InvalidAddress(_) => {
                "Please enter a valid PHPCoin address (e.g., Pa...).".to_string()
            }
            Error::InvalidDns(detail) => format!("The DNS record is invalid: {}", detail),
            _ => self.to_string(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InvalidDomainName(_) => ErrorCategory::Name,
            Error::InvalidAddress(_) => ErrorCategory::Address,
            Error::InvalidAmount(_) | Error::AmountOverflow(_) => ErrorCategory::Amount,
            Error::InvalidDns(_) => ErrorCategory::Dns,
            Error::Signing(_) => ErrorCategory::Signing,
            Error::Serialization(_) | Error::Other(_) => ErrorCategory::Internal,
        }
    }
}

/// Error categories for classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Domain name errors
    Name,
    /// Address-related errors
    Address,
    /// Amount-related errors
    Amount,
    /// DNS target errors
    Dns,
    /// Key or signature errors
    Signing,
    /// Internal/system errors
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Name => write!(f, "Name"),
            ErrorCategory::Address => write!(f, "Address"),
            ErrorCategory::Amount => write!(f, "Amount"),
            ErrorCategory::Dns => write!(f, "Dns"),
            ErrorCategory::Signing => write!(f, "Signing"),
            ErrorCategory::Internal => write!(f, "Internal"),
        }
    }
}
