//! Sealing short secrets to a public key.
//!
//! [`X25519Seal`] is an ephemeral-static X25519 box: a fresh ephemeral key
//! per call, a wrap key derived with BLAKE3 from the shared secret and both
//! public keys, and ChaCha20-Poly1305 over the plaintext.
//!
//! # Wire Format
//!
//! ```text
//! [ ephemeral_pub: 32 ][ nonce: 12 ][ ciphertext ][ tag: 16 ]
//! ```

use x25519_dalek::{EphemeralSecret, PublicKey as X25519PublicKey};

use crate::cipher::{CipherSuite, RawAeadCipher, NONCE_LEN, TAG_LEN};
use crate::crypto::{random_bytes, PrivateKey, PublicKey, SymmetricKey, KEY_LEN};
use crate::error::{DatagramError, Result};

const SEAL_CONTEXT: &str = "yep-datagram v0 x25519 seal";

/// Smallest valid sealed box (empty plaintext).
pub const SEAL_OVERHEAD: usize = KEY_LEN + NONCE_LEN + TAG_LEN;

/// Public-key sealing of raw bytes.
pub trait RawAsymmetricSeal: Send + Sync {
    fn seal(&self, public_key: &PublicKey, plaintext: &[u8]) -> Result<Vec<u8>>;

    fn unseal(&self, private_key: &PrivateKey, sealed: &[u8]) -> Result<Vec<u8>>;
}

/// X25519 + BLAKE3 + ChaCha20-Poly1305 sealed box.
#[derive(Debug, Clone, Copy, Default)]
pub struct X25519Seal;

fn derive_wrap_key(shared: &[u8; 32], ephemeral: &X25519PublicKey, recipient: &X25519PublicKey) -> SymmetricKey {
    let mut hasher = blake3::Hasher::new_derive_key(SEAL_CONTEXT);
    hasher.update(shared);
    hasher.update(ephemeral.as_bytes());
    hasher.update(recipient.as_bytes());
    SymmetricKey::from_bytes(*hasher.finalize().as_bytes())
}

impl RawAsymmetricSeal for X25519Seal {
    fn seal(&self, public_key: &PublicKey, plaintext: &[u8]) -> Result<Vec<u8>> {
        let recipient = public_key.to_x25519()?;

        // Consumed by the agreement, so it cannot be reused.
        let ephemeral = EphemeralSecret::random_from_rng(rand::thread_rng());
        let ephemeral_public = X25519PublicKey::from(&ephemeral);
        let shared = ephemeral.diffie_hellman(&recipient);

        let wrap_key = derive_wrap_key(shared.as_bytes(), &ephemeral_public, &recipient);
        let nonce = random_bytes(NONCE_LEN);
        let (ciphertext, tag) = CipherSuite::ChaCha20Poly1305.encrypt(&wrap_key, &nonce, plaintext)?;

        let mut out = Vec::with_capacity(SEAL_OVERHEAD + ciphertext.len());
        out.extend_from_slice(ephemeral_public.as_bytes());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&ciphertext);
        out.extend_from_slice(&tag);
        Ok(out)
    }

    fn unseal(&self, private_key: &PrivateKey, sealed: &[u8]) -> Result<Vec<u8>> {
        let secret = private_key.to_x25519()?;

        if sealed.len() < SEAL_OVERHEAD {
            return Err(DatagramError::MalformedPayload(format!(
                "sealed box too short: {} bytes, need at least {}",
                sealed.len(),
                SEAL_OVERHEAD
            )));
        }

        let (ephemeral_bytes, rest) = sealed.split_at(KEY_LEN);
        let (nonce, rest) = rest.split_at(NONCE_LEN);
        let (ciphertext, tag) = rest.split_at(rest.len() - TAG_LEN);

        let mut ephemeral = [0u8; KEY_LEN];
        ephemeral.copy_from_slice(ephemeral_bytes);
        let ephemeral_public = X25519PublicKey::from(ephemeral);
        let recipient = X25519PublicKey::from(&secret);

        let shared = secret.diffie_hellman(&ephemeral_public);
        let wrap_key = derive_wrap_key(shared.as_bytes(), &ephemeral_public, &recipient);

        CipherSuite::ChaCha20Poly1305
            .decrypt(&wrap_key, nonce, tag, ciphertext)
            .map_err(|_| DatagramError::AuthenticationFailure("unable to unseal key".to_string()))
    }
}
