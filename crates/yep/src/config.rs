//! Configuration for a [`Yep`](crate::Yep) instance.

use serde::{Deserialize, Serialize};
use yep_datagram::{AeadConfig, CipherSuite};

/// Default cap on the encoded proof payload a verifier will look at.
pub const DEFAULT_MAX_PROOF_LEN: usize = 64 * 1024;

/// Configuration for YEP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct YepConfig {
    /// Cipher suite for every datagram this instance seals.
    pub aead: AeadConfig,
    /// Proofs with a longer base64 payload are rejected without decoding.
    pub max_proof_len: usize,
}

impl Default for YepConfig {
    fn default() -> Self {
        Self {
            aead: AeadConfig::default(),
            max_proof_len: DEFAULT_MAX_PROOF_LEN,
        }
    }
}

impl YepConfig {
    pub fn with_suite(mut self, suite: CipherSuite) -> Self {
        self.aead = self.aead.with_suite(suite);
        self
    }

    pub fn with_max_proof_len(mut self, max_proof_len: usize) -> Self {
        self.max_proof_len = max_proof_len;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = YepConfig::default();
        assert_eq!(config.aead.suite, CipherSuite::ChaCha20Poly1305);
        assert_eq!(config.max_proof_len, 65536);
    }

    #[test]
    fn test_partial_config_from_json() {
        let config: YepConfig = serde_json::from_str(r#"{"aead": {"suite": "aes-256-gcm"}}"#).unwrap();
        assert_eq!(config.aead.suite, CipherSuite::Aes256Gcm);
        assert_eq!(config.max_proof_len, DEFAULT_MAX_PROOF_LEN);
    }

    #[test]
    fn test_builders() {
        let config = YepConfig::default()
            .with_suite(CipherSuite::Aes256Gcm)
            .with_max_proof_len(1024);
        assert_eq!(config.aead.suite, CipherSuite::Aes256Gcm);
        assert_eq!(config.max_proof_len, 1024);
    }
}
