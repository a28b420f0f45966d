//! Error types

/// Message carried by every transport failure. Callers match on
/// [`ApiError::Offline`], never on this text.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Could not connect to the server.";

/// Fallback when the registry reports failure without a message
pub const GENERIC_API_ERROR: &str = "API returned an error.";

/// Registry client errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Registry unreachable (DNS, connect, TLS, timeout, broken body)
    #[error("Network error. Could not connect to the server.")]
    Offline,

    /// Non-success HTTP status
    #[error("{message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Server-supplied message or a status-coded fallback
        message: String,
    },

    /// Registry answered `success: false`
    #[error("{0}")]
    Rejected(String),

    /// Success without the data the operation needs
    #[error("Registry returned no data")]
    EmptyResponse,

    /// Body was not the expected JSON
    #[error("Invalid registry response: {0}")]
    Decode(String),

    /// Client could not be constructed
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl ApiError {
    /// Whether this is the distinguished connectivity failure
    pub fn is_offline(&self) -> bool {
        matches!(self, ApiError::Offline)
    }

    /// Whether the server answered at all
    pub fn server_answered(&self) -> bool {
        matches!(
            self,
            ApiError::Http { .. } | ApiError::Rejected(_) | ApiError::EmptyResponse | ApiError::Decode(_)
        )
    }

    /// Status-coded fallback for non-success responses without a message
    pub fn status_fallback(status: u16) -> Self {
        ApiError::Http {
            status,
            message: format!("Request failed with status: {}", status),
        }
    }
}

/// Result type
pub type Result<T> = std::result::Result<T, ApiError>;
