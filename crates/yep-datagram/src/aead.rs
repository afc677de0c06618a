//! The AEAD engine.
//!
//! Seals typed data into [`EncryptedDatagram`]s and opens them again,
//! refusing anything whose metadata the codec does not accept.
//!
//! ## Payload layouts
//!
//! Symmetric, base64-encoded:
//!
//! ```text
//! [ nonce ][ ciphertext ][ tag ]
//! ```
//!
//! Asymmetric, base64-encoded as one buffer:
//!
//! ```text
//! [ sealed_key_len: u32 BE ][ sealed_key ][ nonce ][ ciphertext ][ tag ]
//! ```
//!
//! Every seal draws a fresh nonce, and every asymmetric seal draws a fresh
//! ephemeral key. Nothing is cached between calls.

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::cipher::{AeadConfig, CipherSuite, RawAeadCipher};
use crate::codec::{DatagramCodec, SymmetricKeyCodec};
use crate::crypto::{random_bytes, PrivateKey, PublicKey, SymmetricKey};
use crate::datagram::EncryptedDatagram;
use crate::error::{DatagramError, Result};
use crate::seal::{RawAsymmetricSeal, X25519Seal};

const LEN_PREFIX: usize = 4;

/// Symmetric and asymmetric sealing of datagrams.
#[derive(Debug, Clone)]
pub struct Aead<C = CipherSuite, S = X25519Seal> {
    cipher: C,
    seal: S,
}

impl Aead {
    /// Build the default engine for a configuration.
    pub fn new(config: &AeadConfig) -> Self {
        Self {
            cipher: config.suite,
            seal: X25519Seal,
        }
    }
}

impl<C: RawAeadCipher, S: RawAsymmetricSeal> Aead<C, S> {
    /// Build an engine from explicit primitives.
    pub fn with_primitives(cipher: C, seal: S) -> Self {
        Self { cipher, seal }
    }

    pub fn cipher(&self) -> &C {
        &self.cipher
    }

    /// Seal `data` under `key`.
    pub fn encrypt_symmetric<D: DatagramCodec>(
        &self,
        data: &D::Data,
        codec: &D,
        key: &SymmetricKey,
    ) -> Result<EncryptedDatagram<D::Data>> {
        let plaintext = codec.serialize(data)?;
        let frame = self.seal_frame(&plaintext, key)?;
        Ok(EncryptedDatagram::new(STANDARD.encode(frame), codec.metadata().clone()))
    }

    /// Open a datagram sealed with [`Aead::encrypt_symmetric`].
    pub fn decrypt_symmetric<D: DatagramCodec>(
        &self,
        encrypted: &EncryptedDatagram<D::Data>,
        codec: &D,
        key: &SymmetricKey,
    ) -> Result<D::Data> {
        codec.check_metadata(&encrypted.metadata)?;
        let frame = decode_payload(&encrypted.payload)?;
        let plaintext = self.open_frame(&frame, key)?;
        codec.deserialize(&plaintext)
    }

    /// Seal `data` to the holder of `public_key` under a fresh ephemeral key.
    pub fn encrypt_asymmetric<D: DatagramCodec>(
        &self,
        data: &D::Data,
        codec: &D,
        public_key: &PublicKey,
    ) -> Result<EncryptedDatagram<D::Data>> {
        let ephemeral = SymmetricKey::generate();
        let plaintext = codec.serialize(data)?;
        let frame = self.seal_frame(&plaintext, &ephemeral)?;
        let sealed_key = self.seal.seal(public_key, ephemeral.as_bytes())?;

        let sealed_len = u32::try_from(sealed_key.len())
            .map_err(|_| DatagramError::Encryption("sealed key too large".to_string()))?;

        let mut buf = Vec::with_capacity(LEN_PREFIX + sealed_key.len() + frame.len());
        buf.extend_from_slice(&sealed_len.to_be_bytes());
        buf.extend_from_slice(&sealed_key);
        buf.extend_from_slice(&frame);

        Ok(EncryptedDatagram::new(STANDARD.encode(buf), codec.metadata().clone()))
    }

    /// Open a datagram sealed with [`Aead::encrypt_asymmetric`].
    pub fn decrypt_asymmetric<D: DatagramCodec>(
        &self,
        encrypted: &EncryptedDatagram<D::Data>,
        codec: &D,
        private_key: &PrivateKey,
    ) -> Result<D::Data> {
        codec.check_metadata(&encrypted.metadata)?;
        let buf = decode_payload(&encrypted.payload)?;
        let (sealed_key, frame) = split_length_prefixed(&buf)?;

        let key_bytes = self.seal.unseal(private_key, sealed_key)?;
        let key = SymmetricKeyCodec::default().deserialize(&key_bytes)?;

        let plaintext = self.open_frame(frame, &key)?;
        codec.deserialize(&plaintext)
    }

    /// Alias of [`Aead::encrypt_asymmetric`].
    pub fn seal<D: DatagramCodec>(
        &self,
        data: &D::Data,
        codec: &D,
        public_key: &PublicKey,
    ) -> Result<EncryptedDatagram<D::Data>> {
        self.encrypt_asymmetric(data, codec, public_key)
    }

    /// Alias of [`Aead::decrypt_asymmetric`].
    pub fn unseal<D: DatagramCodec>(
        &self,
        encrypted: &EncryptedDatagram<D::Data>,
        codec: &D,
        private_key: &PrivateKey,
    ) -> Result<D::Data> {
        self.decrypt_asymmetric(encrypted, codec, private_key)
    }

    fn seal_frame(&self, plaintext: &[u8], key: &SymmetricKey) -> Result<Vec<u8>> {
        let nonce = random_bytes(self.cipher.nonce_len());
        let (ciphertext, tag) = self.cipher.encrypt(key, &nonce, plaintext)?;

        let mut frame = Vec::with_capacity(nonce.len() + ciphertext.len() + tag.len());
        frame.extend_from_slice(&nonce);
        frame.extend_from_slice(&ciphertext);
        frame.extend_from_slice(&tag);
        Ok(frame)
    }

    fn open_frame(&self, frame: &[u8], key: &SymmetricKey) -> Result<Vec<u8>> {
        let nonce_len = self.cipher.nonce_len();
        let tag_len = self.cipher.tag_len();

        if frame.len() < nonce_len + tag_len {
            return Err(DatagramError::MalformedPayload(format!(
                "payload too short: {} bytes, need at least {}",
                frame.len(),
                nonce_len + tag_len
            )));
        }

        let (nonce, rest) = frame.split_at(nonce_len);
        let (ciphertext, tag) = rest.split_at(rest.len() - tag_len);
        self.cipher.decrypt(key, nonce, tag, ciphertext)
    }
}

fn decode_payload(payload: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(payload)
        .map_err(|e| DatagramError::MalformedPayload(format!("invalid base64: {e}")))
}

fn split_length_prefixed(buf: &[u8]) -> Result<(&[u8], &[u8])> {
    if buf.len() < LEN_PREFIX {
        return Err(DatagramError::MalformedPayload("missing key length prefix".to_string()));
    }
    let (prefix, rest) = buf.split_at(LEN_PREFIX);
    let mut len_bytes = [0u8; LEN_PREFIX];
    len_bytes.copy_from_slice(prefix);
    let sealed_len = u32::from_be_bytes(len_bytes) as usize;

    if sealed_len > rest.len() {
        return Err(DatagramError::MalformedPayload(format!(
            "sealed key length {} overruns payload of {} bytes",
            sealed_len,
            rest.len()
        )));
    }
    Ok(rest.split_at(sealed_len))
}
