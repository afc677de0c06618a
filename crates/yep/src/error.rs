//! Error types for the YEP facade.

use thiserror::Error;
use yep_datagram::DatagramError;
use yep_perms::PermsError;

/// Errors that can occur during YEP operations.
#[derive(Debug, Error)]
pub enum YepError {
    /// Datagram error.
    #[error("datagram error: {0}")]
    Datagram(#[from] DatagramError),

    /// Permission error.
    #[error("permission error: {0}")]
    Permission(#[from] PermsError),

    /// The proof is larger than this verifier accepts.
    #[error("proof payload of {len} bytes exceeds limit of {max}")]
    ProofTooLarge { len: usize, max: usize },
}

/// Result type for YEP operations.
pub type Result<T> = std::result::Result<T, YepError>;
