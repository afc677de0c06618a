//! # YEP Datagram
//!
//! Typed, versioned datagrams and the AEAD engine that seals them.
//!
//! This crate has no I/O and no global state. Every operation is a pure
//! function of its inputs plus fresh randomness.
//!
//! ## Key Types
//!
//! - [`DatagramMetadata`] - The clear-text `{type, version}` tag
//! - [`EncryptedDatagram`] - A sealed payload plus its metadata
//! - [`DatagramCodec`] - Serialization and version acceptance for one type
//! - [`Aead`] - Symmetric and asymmetric sealing
//!
//! ## Metadata Binding
//!
//! Opening a datagram checks its metadata against the codec before any key
//! is used. The type must match exactly and the version must satisfy the
//! codec's semver range, so a reader pinned to `=0.1.0` refuses `0.1.1`
//! while a reader on `^0.1.0` accepts it.
//!
//! ## Primitives
//!
//! The engine is generic over a [`RawAeadCipher`] and a [`RawAsymmetricSeal`].
//! [`CipherSuite`] provides ChaCha20-Poly1305 and AES-256-GCM. [`X25519Seal`]
//! provides an ephemeral X25519 sealed box.

pub mod aead;
pub mod cipher;
pub mod codec;
pub mod crypto;
pub mod datagram;
pub mod error;
pub mod seal;

pub use aead::Aead;
pub use cipher::{AeadConfig, CipherSuite, RawAeadCipher};
pub use codec::{CborCodec, CodecBinding, DatagramCodec, JsonCodec, NumberCodec, StringCodec, SymmetricKeyCodec};
pub use crypto::{KeyPair, KeySubtype, KeyType, PrivateKey, PublicKey, SymmetricKey, Visibility};
pub use datagram::{DatagramMetadata, EncryptedDatagram, DATAGRAM_SCHEME};
pub use error::{DatagramError, Result};
pub use seal::{RawAsymmetricSeal, X25519Seal};
