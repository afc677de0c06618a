//! Error types for the permission protocol.

use thiserror::Error;
use yep_datagram::DatagramError;

/// Errors that can occur while minting, delegating, or proving a permission.
#[derive(Debug, Error)]
pub enum PermsError {
    /// A datagram could not be sealed or opened.
    #[error(transparent)]
    Datagram(#[from] DatagramError),

    /// A grant was presented for a different permission.
    #[error("grant is for {found:?}, permission is {expected:?}")]
    NameMismatch { expected: String, found: String },

    /// The unlocked permission data has no key for the requested permission.
    #[error("no delegated key for permission {0:?}")]
    UnknownDelegation(String),

    /// Recovered key material does not belong to the permission it claims.
    #[error("key mismatch: {0}")]
    KeyMismatch(String),
}

/// Result type for permission operations.
pub type Result<T> = std::result::Result<T, PermsError>;
