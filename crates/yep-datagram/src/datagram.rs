//! Datagram metadata and the sealed wire object.
//!
//! A datagram is a unit of data bound to a `{type, version}` tag. The tag
//! travels in the clear next to the sealed payload so a receiver can refuse
//! a datagram before attempting to open it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

use crate::error::{DatagramError, Result};

/// Scheme prefix shared by every datagram type.
pub const DATAGRAM_SCHEME: &str = "datagram://";

/// Declared shape of a payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatagramMetadata {
    /// URI-like type, e.g. `datagram://string`.
    #[serde(rename = "type")]
    pub datagram_type: String,
    /// Semver version string.
    pub version: String,
}

impl DatagramMetadata {
    pub fn new(datagram_type: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            datagram_type: datagram_type.into(),
            version: version.into(),
        }
    }

    /// Build a `datagram://<path>` type.
    pub fn typed(path: &str, version: impl Into<String>) -> Self {
        Self::new(format!("{DATAGRAM_SCHEME}{path}"), version)
    }
}

impl fmt::Display for DatagramMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.datagram_type, self.version)
    }
}

/// A sealed datagram.
///
/// `T` records what the payload decodes to. It is not stored, so a datagram
/// can be moved between typed and untyped contexts without copying.
#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
pub struct EncryptedDatagram<T> {
    /// Base64 of the sealed bytes.
    pub payload: String,
    pub metadata: DatagramMetadata,
    #[serde(skip)]
    _data: PhantomData<fn() -> T>,
}

impl<T> EncryptedDatagram<T> {
    pub fn new(payload: String, metadata: DatagramMetadata) -> Self {
        Self {
            payload,
            metadata,
            _data: PhantomData,
        }
    }

    /// Serialize to the JSON wire shape.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| DatagramError::Codec(e.to_string()))
    }

    /// Parse from the JSON wire shape.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| DatagramError::MalformedPayload(e.to_string()))
    }
}

impl<T> Clone for EncryptedDatagram<T> {
    fn clone(&self) -> Self {
        Self::new(self.payload.clone(), self.metadata.clone())
    }
}

impl<T> PartialEq for EncryptedDatagram<T> {
    fn eq(&self, other: &Self) -> bool {
        self.payload == other.payload && self.metadata == other.metadata
    }
}

impl<T> Eq for EncryptedDatagram<T> {}

impl<T> fmt::Debug for EncryptedDatagram<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptedDatagram")
            .field("metadata", &self.metadata)
            .field("payload_len", &self.payload.len())
            .finish()
    }
}
