//! Response envelope

use crate::error::{ApiError, Result, GENERIC_API_ERROR};
use serde::Deserialize;

/// `{success, data?, error?}` wrapper around every registry response
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    /// Application-level outcome; absent is treated as success
    #[serde(default = "default_success")]
    pub success: bool,
    /// Operation payload
    pub data: Option<T>,
    /// Server message on failure
    #[serde(default)]
    pub error: Option<String>,
}

fn default_success() -> bool {
    true
}

impl<T> Envelope<T> {
    /// Split into payload or [`ApiError::Rejected`]
    pub fn into_result(self) -> Result<Option<T>> {
        if self.success {
            Ok(self.data)
        } else {
            Err(ApiError::Rejected(
                self.error
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(|| GENERIC_API_ERROR.to_string()),
            ))
        }
    }
}

/// Error body of a non-success HTTP response
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    /// Server message
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Best error for a failed status: the server message when the body is
    /// JSON carrying one, otherwise the status-coded fallback
    pub fn into_error(bytes: &[u8], status: u16) -> ApiError {
        match serde_json::from_slice::<ErrorBody>(bytes) {
            Ok(ErrorBody {
                error: Some(message),
            }) if !message.trim().is_empty() => ApiError::Http { status, message },
            _ => ApiError::status_fallback(status),
        }
    }
}

/// Require data for operations that cannot succeed without it
pub fn require<T>(data: Option<T>) -> Result<T> {
    data.ok_or(ApiError::EmptyResponse)
}
