//! Error types for datagram encoding and sealing.

use thiserror::Error;

/// Errors that can occur while encoding, sealing, or opening a datagram.
#[derive(Debug, Error)]
pub enum DatagramError {
    /// The datagram's declared type or version is not accepted by the codec.
    ///
    /// Raised before any cryptographic operation is attempted.
    #[error(
        "metadata mismatch: codec expects {expected_type} ({version_range}), \
         datagram is {found_type} {found_version}"
    )]
    MetadataMismatch {
        expected_type: String,
        found_type: String,
        found_version: String,
        version_range: String,
    },

    /// Tag verification or key unwrapping failed.
    #[error("authentication failure: {0}")]
    AuthenticationFailure(String),

    /// The payload does not have the expected framing.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// The codec could not serialize or deserialize the data.
    #[error("codec error: {0}")]
    Codec(String),

    /// A key of the wrong type or visibility was handed to a primitive.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// The cipher refused to encrypt.
    #[error("encryption error: {0}")]
    Encryption(String),
}

/// Result type for datagram operations.
pub type Result<T> = std::result::Result<T, DatagramError>;
