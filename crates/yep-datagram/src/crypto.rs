//! Key material for the datagram layer.
//!
//! Wraps X25519 (encryption) and Ed25519 (signing) keys with the tags the
//! permission protocol relies on: visibility, purpose, and an optional subtype.

use ed25519_dalek::SigningKey;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};

use crate::error::{DatagramError, Result};

/// Length of every raw key in this crate.
pub const KEY_LEN: usize = 32;

/// Draw `len` bytes from the thread-local CSPRNG.
///
/// `thread_rng` is reseeded from the OS and never shared between threads,
/// so concurrent callers need no locking.
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut buf);
    buf
}

fn random_key() -> [u8; KEY_LEN] {
    let mut bytes = [0u8; KEY_LEN];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}

/// Whether a key may be shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

/// What a key pair is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    /// X25519 key agreement.
    Encryption,
    /// Ed25519 signatures.
    Signing,
}

/// Role-specific tag carried by protocol keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeySubtype {
    /// The key pair belongs to a permission.
    Permission,
    /// The key pair belongs to a verifying service.
    Service,
}

/// A tagged public key.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey {
    visibility: Visibility,
    #[serde(rename = "type")]
    key_type: KeyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subtype: Option<KeySubtype>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    key: [u8; KEY_LEN],
}

impl PublicKey {
    /// Create an untagged public key from raw bytes.
    pub const fn from_bytes(key_type: KeyType, key: [u8; KEY_LEN]) -> Self {
        Self {
            visibility: Visibility::Public,
            key_type,
            subtype: None,
            name: None,
            key,
        }
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    pub fn subtype(&self) -> Option<KeySubtype> {
        self.subtype
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.key
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.key)
    }

    /// Tag this key with a subtype and an optional name.
    pub fn tagged(mut self, subtype: KeySubtype, name: Option<String>) -> Self {
        self.subtype = Some(subtype);
        self.name = name;
        self
    }

    /// Convert to an x25519-dalek public key, refusing signing keys.
    pub fn to_x25519(&self) -> Result<X25519PublicKey> {
        if self.visibility != Visibility::Public || self.key_type != KeyType::Encryption {
            return Err(DatagramError::InvalidKey(format!(
                "expected a public encryption key, got {:?} {:?}",
                self.visibility, self.key_type
            )));
        }
        Ok(X25519PublicKey::from(self.key))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey")
            .field("type", &self.key_type)
            .field("subtype", &self.subtype)
            .field("name", &self.name)
            .field("key", &&self.to_hex()[..16])
            .finish()
    }
}

/// A tagged private key.
///
/// `Debug` never prints key material.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateKey {
    visibility: Visibility,
    #[serde(rename = "type")]
    key_type: KeyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subtype: Option<KeySubtype>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    key: [u8; KEY_LEN],
}

impl PrivateKey {
    /// Create an untagged private key from raw seed bytes.
    pub const fn from_bytes(key_type: KeyType, key: [u8; KEY_LEN]) -> Self {
        Self {
            visibility: Visibility::Private,
            key_type,
            subtype: None,
            name: None,
            key,
        }
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    pub fn subtype(&self) -> Option<KeySubtype> {
        self.subtype
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Get the raw secret bytes.
    pub const fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.key
    }

    /// Tag this key with a subtype and an optional name.
    pub fn tagged(mut self, subtype: KeySubtype, name: Option<String>) -> Self {
        self.subtype = Some(subtype);
        self.name = name;
        self
    }

    /// Derive the matching public key, carrying over the tags.
    pub fn public_key(&self) -> PublicKey {
        let key = match self.key_type {
            KeyType::Encryption => X25519PublicKey::from(&StaticSecret::from(self.key)).to_bytes(),
            KeyType::Signing => SigningKey::from_bytes(&self.key).verifying_key().to_bytes(),
        };
        PublicKey {
            visibility: Visibility::Public,
            key_type: self.key_type,
            subtype: self.subtype,
            name: self.name.clone(),
            key,
        }
    }

    /// Convert to an x25519-dalek static secret, refusing signing keys.
    pub fn to_x25519(&self) -> Result<StaticSecret> {
        if self.visibility != Visibility::Private || self.key_type != KeyType::Encryption {
            return Err(DatagramError::InvalidKey(format!(
                "expected a private encryption key, got {:?} {:?}",
                self.visibility, self.key_type
            )));
        }
        Ok(StaticSecret::from(self.key))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("type", &self.key_type)
            .field("subtype", &self.subtype)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A public/private key pair with matching tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPair {
    pub public: PublicKey,
    pub private: PrivateKey,
}

impl KeyPair {
    /// Generate a fresh X25519 key pair for sealing.
    pub fn generate_encryption() -> Self {
        Self::from_private(PrivateKey::from_bytes(KeyType::Encryption, random_key()))
    }

    /// Generate a fresh Ed25519 key pair for signing.
    pub fn generate_signing() -> Self {
        let signing_key = SigningKey::generate(&mut rand::thread_rng());
        Self::from_private(PrivateKey::from_bytes(KeyType::Signing, signing_key.to_bytes()))
    }

    /// Generate an encryption key pair tagged for a verifying service.
    pub fn generate_service() -> Self {
        Self::generate_encryption().tagged(KeySubtype::Service, None)
    }

    /// Rebuild a key pair from its private half.
    pub fn from_private(private: PrivateKey) -> Self {
        Self {
            public: private.public_key(),
            private,
        }
    }

    /// Tag both halves.
    pub fn tagged(self, subtype: KeySubtype, name: Option<String>) -> Self {
        Self {
            public: self.public.tagged(subtype, name.clone()),
            private: self.private.tagged(subtype, name),
        }
    }
}

/// A 256-bit symmetric key.
#[derive(Clone, PartialEq, Eq)]
pub struct SymmetricKey([u8; KEY_LEN]);

impl SymmetricKey {
    /// Generate a new random key.
    pub fn generate() -> Self {
        Self(random_key())
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl TryFrom<&[u8]> for SymmetricKey {
    type Error = DatagramError;

    fn try_from(slice: &[u8]) -> Result<Self> {
        let bytes: [u8; KEY_LEN] = slice.try_into().map_err(|_| {
            DatagramError::MalformedPayload(format!(
                "invalid key length: expected {}, got {}",
                KEY_LEN,
                slice.len()
            ))
        })?;
        Ok(Self(bytes))
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SymmetricKey(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encryption_pair_tags() {
        let pair = KeyPair::generate_encryption();

        assert_eq!(pair.public.visibility(), Visibility::Public);
        assert_eq!(pair.private.visibility(), Visibility::Private);
        assert_eq!(pair.public.key_type(), KeyType::Encryption);
        assert_eq!(pair.private.key_type(), KeyType::Encryption);
        assert_eq!(pair.public.subtype(), None);
    }

    #[test]
    fn test_private_key_derives_public() {
        let enc = KeyPair::generate_encryption();
        assert_eq!(enc.private.public_key(), enc.public);

        let sig = KeyPair::generate_signing();
        assert_eq!(sig.public.key_type(), KeyType::Signing);
        assert_eq!(sig.private.public_key(), sig.public);
    }

    #[test]
    fn test_service_pair_is_tagged() {
        let service = KeyPair::generate_service();
        assert_eq!(service.public.subtype(), Some(KeySubtype::Service));
        assert_eq!(service.private.subtype(), Some(KeySubtype::Service));
    }

    #[test]
    fn test_tagging_carries_name_to_derived_public() {
        let pair = KeyPair::generate_encryption()
            .tagged(KeySubtype::Permission, Some("VIEW".to_string()));
        let derived = pair.private.public_key();

        assert_eq!(derived.name(), Some("VIEW"));
        assert_eq!(derived.subtype(), Some(KeySubtype::Permission));
        assert_eq!(derived, pair.public);
    }

    #[test]
    fn test_signing_key_refused_for_x25519() {
        let sig = KeyPair::generate_signing();
        assert!(matches!(sig.public.to_x25519(), Err(DatagramError::InvalidKey(_))));
        assert!(matches!(sig.private.to_x25519(), Err(DatagramError::InvalidKey(_))));
    }

    #[test]
    fn test_private_key_debug_is_redacted() {
        let pair = KeyPair::generate_encryption();
        let debug = format!("{:?}", pair.private);
        assert!(!debug.contains(&hex::encode(pair.private.as_bytes())));

        let key = SymmetricKey::generate();
        assert_eq!(format!("{:?}", key), "SymmetricKey(..)");
    }

    #[test]
    fn test_symmetric_key_from_slice() {
        let key = SymmetricKey::generate();
        let recovered = SymmetricKey::try_from(&key.as_bytes()[..]).unwrap();
        assert_eq!(key, recovered);

        assert!(SymmetricKey::try_from(&[0u8; 31][..]).is_err());
    }

    #[test]
    fn test_fresh_keys_differ() {
        assert_ne!(SymmetricKey::generate(), SymmetricKey::generate());
        assert_ne!(random_bytes(12), random_bytes(12));
    }
}
