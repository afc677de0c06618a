//! Raw authenticated ciphers.
//!
//! The engine never names a cipher directly. It is handed a [`RawAeadCipher`]
//! and reads nonce and tag lengths from it, so suites can be swapped per
//! engine without touching any shared state.

use aes_gcm::Aes256Gcm;
use chacha20poly1305::{
    aead::{generic_array::GenericArray, Aead, KeyInit},
    ChaCha20Poly1305,
};
use serde::{Deserialize, Serialize};

use crate::crypto::SymmetricKey;
use crate::error::{DatagramError, Result};

/// Nonce length shared by both built-in suites.
pub const NONCE_LEN: usize = 12;

/// Tag length shared by both built-in suites.
pub const TAG_LEN: usize = 16;

/// An authenticated cipher with detached tags.
pub trait RawAeadCipher: Send + Sync {
    fn nonce_len(&self) -> usize;

    fn tag_len(&self) -> usize;

    /// Encrypt, returning `(ciphertext, tag)`.
    fn encrypt(&self, key: &SymmetricKey, nonce: &[u8], plaintext: &[u8]) -> Result<(Vec<u8>, Vec<u8>)>;

    /// Decrypt and authenticate. Never returns partial plaintext.
    fn decrypt(&self, key: &SymmetricKey, nonce: &[u8], tag: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>>;
}

/// Built-in cipher suites.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CipherSuite {
    /// ChaCha20-Poly1305 with a 256-bit key.
    #[default]
    #[serde(rename = "chacha20-poly1305")]
    ChaCha20Poly1305,
    /// AES-256-GCM.
    #[serde(rename = "aes-256-gcm")]
    Aes256Gcm,
}

/// Algorithm configuration for an AEAD engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AeadConfig {
    #[serde(default)]
    pub suite: CipherSuite,
}

impl AeadConfig {
    pub fn with_suite(mut self, suite: CipherSuite) -> Self {
        self.suite = suite;
        self
    }
}

fn nonce_array(nonce: &[u8]) -> Result<[u8; NONCE_LEN]> {
    nonce.try_into().map_err(|_| {
        DatagramError::MalformedPayload(format!(
            "invalid nonce length: expected {}, got {}",
            NONCE_LEN,
            nonce.len()
        ))
    })
}

impl CipherSuite {
    fn seal_combined(&self, key: &SymmetricKey, nonce: &[u8; NONCE_LEN], plaintext: &[u8]) -> Result<Vec<u8>> {
        let sealed = match self {
            CipherSuite::ChaCha20Poly1305 => ChaCha20Poly1305::new_from_slice(key.as_bytes())
                .map_err(|e| DatagramError::Encryption(e.to_string()))?
                .encrypt(GenericArray::from_slice(&nonce[..]), plaintext),
            CipherSuite::Aes256Gcm => Aes256Gcm::new_from_slice(key.as_bytes())
                .map_err(|e| DatagramError::Encryption(e.to_string()))?
                .encrypt(GenericArray::from_slice(&nonce[..]), plaintext),
        };
        sealed.map_err(|e| DatagramError::Encryption(e.to_string()))
    }

    fn open_combined(&self, key: &SymmetricKey, nonce: &[u8; NONCE_LEN], combined: &[u8]) -> Result<Vec<u8>> {
        let opened = match self {
            CipherSuite::ChaCha20Poly1305 => ChaCha20Poly1305::new_from_slice(key.as_bytes())
                .map_err(|e| DatagramError::AuthenticationFailure(e.to_string()))?
                .decrypt(GenericArray::from_slice(&nonce[..]), combined),
            CipherSuite::Aes256Gcm => Aes256Gcm::new_from_slice(key.as_bytes())
                .map_err(|e| DatagramError::AuthenticationFailure(e.to_string()))?
                .decrypt(GenericArray::from_slice(&nonce[..]), combined),
        };
        opened.map_err(|_| DatagramError::AuthenticationFailure(format!("{self:?} tag mismatch")))
    }
}

impl RawAeadCipher for CipherSuite {
    fn nonce_len(&self) -> usize {
        NONCE_LEN
    }

    fn tag_len(&self) -> usize {
        TAG_LEN
    }

    fn encrypt(&self, key: &SymmetricKey, nonce: &[u8], plaintext: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
        let nonce = nonce_array(nonce)?;
        let mut ciphertext = self.seal_combined(key, &nonce, plaintext)?;
        let tag = ciphertext.split_off(ciphertext.len() - TAG_LEN);
        Ok((ciphertext, tag))
    }

    fn decrypt(&self, key: &SymmetricKey, nonce: &[u8], tag: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
        let nonce = nonce_array(nonce)?;
        if tag.len() != TAG_LEN {
            return Err(DatagramError::MalformedPayload(format!(
                "invalid tag length: expected {}, got {}",
                TAG_LEN,
                tag.len()
            )));
        }
        let mut combined = Vec::with_capacity(ciphertext.len() + TAG_LEN);
        combined.extend_from_slice(ciphertext);
        combined.extend_from_slice(tag);
        self.open_combined(key, &nonce, &combined)
    }
}
