//! Opaque prepare-phase payload
//!
//! The registry builds the transaction to be signed and verifies the
//! signature against the exact bytes it handed out. The payload is therefore
//! kept as the raw JSON text from the response and never decoded.

use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;
use std::fmt;

/// Server-issued signable payload, held verbatim
#[derive(Clone, PartialEq, Eq)]
pub struct SignablePayload(String);

impl SignablePayload {
    /// Take ownership of a raw JSON fragment from a response
    pub fn from_raw(raw: Box<RawValue>) -> Self {
        Self(String::from(Box::<str>::from(raw)))
    }

    /// Wrap JSON text, checking only that it is well-formed
    pub fn from_json_text(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        let raw = RawValue::from_string(text)?;
        Ok(Self::from_raw(raw))
    }

    /// Serialized form to sign and send back
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Bytes handed to the signer
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the payload is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SignablePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SignablePayload")
            .field(&format_args!("{} bytes", self.0.len()))
            .finish()
    }
}

impl Serialize for SignablePayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SignablePayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        Ok(Self::from_raw(raw))
    }
}

impl TryFrom<&str> for SignablePayload {
    type Error = Error;

    fn try_from(text: &str) -> Result<Self> {
        Self::from_json_text(text)
    }
}
