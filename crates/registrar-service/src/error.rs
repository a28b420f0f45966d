//! Error types for registrar operations
//!
//! Every failure a workflow can report falls into one [`ErrorKind`]. Local
//! faults from signing, serialization and storage are folded into
//! `ClientException` at the boundary so nothing else reaches the caller.

use crate::inflight::OperationKind;
use registrar_client::ApiError;
use std::fmt;

/// Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Shown when the registry is known to be unreachable
pub const SERVICE_UNAVAILABLE: &str =
    "The service is temporarily unavailable. Please try again later.";

/// Shown when no signing key is available
pub const NOT_AUTHENTICATED: &str = "Private key not found. Please log in again.";

/// Registrar errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Registry unreachable
    #[error("Registry offline")]
    Offline,

    /// No signing key or wallet address in the session
    #[error("Not authenticated")]
    Unauthenticated,

    /// Input rejected before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Registry refused the request
    #[error("Rejected by registry: {0}")]
    RemoteRejected(String),

    /// Unexpected local failure
    #[error("Client error: {0}")]
    ClientException(String),

    /// Same operation on the same name already running
    #[error("{operation} of {name} already in progress")]
    InFlight {
        /// Operation kind
        operation: OperationKind,
        /// Normalized name
        name: String,
    },

    /// Unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Copyable error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Registry unreachable
    Offline,
    /// No key available
    Unauthenticated,
    /// Client-side input check failed
    Validation,
    /// Server-side business error
    RemoteRejected,
    /// Local fault
    ClientException,
    /// Duplicate concurrent submission
    InFlight,
}

impl Error {
    /// Classification for matching and logging
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Offline => ErrorKind::Offline,
            Error::Unauthenticated => ErrorKind::Unauthenticated,
            Error::Validation(_) => ErrorKind::Validation,
            Error::RemoteRejected(_) => ErrorKind::RemoteRejected,
            Error::ClientException(_) | Error::Config(_) => ErrorKind::ClientException,
            Error::InFlight { .. } => ErrorKind::InFlight,
        }
    }

    /// Message suitable for showing to the user
    pub fn user_message(&self) -> String {
        match self {
            Error::Offline => SERVICE_UNAVAILABLE.to_string(),
            Error::Unauthenticated => NOT_AUTHENTICATED.to_string(),
            Error::Validation(msg) | Error::RemoteRejected(msg) => msg.clone(),
            Error::ClientException(_) => {
                "A client-side error occurred. Please try again.".to_string()
            }
            Error::InFlight { operation, name } => {
                format!("A {} of {} is already being processed.", operation, name)
            }
            Error::Config(msg) => format!("Invalid configuration: {}", msg),
        }
    }

    /// Whether the error came from the user's input rather than the system
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Error::Validation(_) | Error::Unauthenticated | Error::InFlight { .. }
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Offline => write!(f, "offline"),
            ErrorKind::Unauthenticated => write!(f, "unauthenticated"),
            ErrorKind::Validation => write!(f, "validation"),
            ErrorKind::RemoteRejected => write!(f, "remote-rejected"),
            ErrorKind::ClientException => write!(f, "client-exception"),
            ErrorKind::InFlight => write!(f, "in-flight"),
        }
    }
}

impl From<ApiError> for Error {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Offline => Error::Offline,
            ApiError::Http { message, .. } => Error::RemoteRejected(message),
            ApiError::Rejected(message) => Error::RemoteRejected(message),
            other @ (ApiError::EmptyResponse | ApiError::Decode(_)) => {
                Error::RemoteRejected(other.to_string())
            }
            ApiError::InvalidConfig(msg) => Error::Config(msg),
        }
    }
}

impl From<registrar_core::Error> for Error {
    fn from(e: registrar_core::Error) -> Self {
        if e.is_user_error() {
            Error::Validation(e.user_message())
        } else {
            Error::ClientException(e.to_string())
        }
    }
}

impl From<registrar_storage::Error> for Error {
    fn from(e: registrar_storage::Error) -> Self {
        Error::ClientException(format!("{}", e))
    }
}
