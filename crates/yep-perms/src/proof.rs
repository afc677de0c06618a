//! Proofs of possession and their stateless verification.
//!
//! A proof is a grant addressed to a verifying service and then sealed to
//! that service. The service needs nothing but its own private key and the
//! public [`Permission`] to check it: it opens the proof, opens the grant's
//! secret, and uses the secret to open the permission's private data. Only
//! the secret of that exact permission instance gets through all three.
//!
//! Every call draws a fresh ephemeral key and fresh nonces, so two proofs
//! built from identical inputs never share bytes.

use serde::{Deserialize, Serialize};

use yep_datagram::{Aead, EncryptedDatagram, PrivateKey, PublicKey, RawAeadCipher, RawAsymmetricSeal};

use crate::codec::grant_codec;
use crate::error::{PermsError, Result};
use crate::grant::PermissionGrant;
use crate::permission::Permission;

/// A grant sealed for one verifying service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Proof(EncryptedDatagram<PermissionGrant>);

impl Proof {
    /// Build a proof that the holder of `grant` holds `permission`.
    ///
    /// The signing key is accepted for forward compatibility and not used.
    pub fn create<C: RawAeadCipher, S: RawAsymmetricSeal>(
        aead: &Aead<C, S>,
        permission: &Permission,
        grant: &PermissionGrant,
        holder_private_key: &PrivateKey,
        _holder_signing_key: &PrivateKey,
        service_public_key: &PublicKey,
    ) -> Result<Self> {
        if grant.name != permission.name {
            return Err(PermsError::NameMismatch {
                expected: permission.name.to_string(),
                found: grant.name.to_string(),
            });
        }
        let service_grant = grant.delegate(aead, holder_private_key, service_public_key)?;
        Self::seal(aead, &service_grant, service_public_key)
    }

    /// Seal a grant that is already addressed to the service.
    pub(crate) fn seal<C: RawAeadCipher, S: RawAsymmetricSeal>(
        aead: &Aead<C, S>,
        service_grant: &PermissionGrant,
        service_public_key: &PublicKey,
    ) -> Result<Self> {
        let sealed = aead.encrypt_asymmetric(service_grant, &grant_codec(), service_public_key)?;
        Ok(Self(sealed))
    }

    /// Check this proof against `permission`, reporting why it fails.
    ///
    /// The holder's public keys are accepted for forward compatibility and
    /// not used.
    pub fn check<C: RawAeadCipher, S: RawAsymmetricSeal>(
        &self,
        aead: &Aead<C, S>,
        permission: &Permission,
        _holder_public_key: &PublicKey,
        _holder_signing_public_key: &PublicKey,
        service_private_key: &PrivateKey,
    ) -> Result<()> {
        let grant = aead.decrypt_asymmetric(&self.0, &grant_codec(), service_private_key)?;
        permission.unlock(aead, &grant, service_private_key)?;
        Ok(())
    }

    /// Verify this proof against `permission`.
    ///
    /// Never fails: anything that goes wrong is a `false`.
    pub fn verify<C: RawAeadCipher, S: RawAsymmetricSeal>(
        &self,
        aead: &Aead<C, S>,
        permission: &Permission,
        holder_public_key: &PublicKey,
        holder_signing_public_key: &PublicKey,
        service_private_key: &PrivateKey,
    ) -> bool {
        match self.check(
            aead,
            permission,
            holder_public_key,
            holder_signing_public_key,
            service_private_key,
        ) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(permission = %permission.name, error = %e, "proof rejected");
                false
            }
        }
    }

    pub fn as_datagram(&self) -> &EncryptedDatagram<PermissionGrant> {
        &self.0
    }

    pub fn into_datagram(self) -> EncryptedDatagram<PermissionGrant> {
        self.0
    }

    /// Size of the encoded payload.
    pub fn payload_len(&self) -> usize {
        self.0.payload.len()
    }
}

impl From<EncryptedDatagram<PermissionGrant>> for Proof {
    fn from(datagram: EncryptedDatagram<PermissionGrant>) -> Self {
        Self(datagram)
    }
}
