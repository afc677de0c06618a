//! Transferable grants.
//!
//! A grant is the permission secret sealed to one holder's public key.
//! Delegating re-seals the same secret for someone else; the permission
//! itself is never touched and its issuer is never contacted.

use serde::{Deserialize, Serialize};

use yep_datagram::{
    Aead, EncryptedDatagram, PrivateKey, PublicKey, RawAeadCipher, RawAsymmetricSeal, SymmetricKey,
};

use crate::codec::secret_codec;
use crate::error::Result;
use crate::permission::PermissionName;

/// An unlock token for the permission called `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
    pub name: PermissionName,
    /// The permission secret, sealed to the holder.
    pub grant_key: EncryptedDatagram<SymmetricKey>,
}

impl PermissionGrant {
    /// Seal `secret` to `recipient` as a grant for `name`.
    pub(crate) fn issue<C: RawAeadCipher, S: RawAsymmetricSeal>(
        aead: &Aead<C, S>,
        name: PermissionName,
        secret: &SymmetricKey,
        recipient: &PublicKey,
    ) -> Result<Self> {
        let grant_key = aead.encrypt_asymmetric(secret, &secret_codec(), recipient)?;
        Ok(Self { name, grant_key })
    }

    /// Recover the permission secret with the holder's private key.
    pub fn open_secret<C: RawAeadCipher, S: RawAsymmetricSeal>(
        &self,
        aead: &Aead<C, S>,
        holder_private_key: &PrivateKey,
    ) -> Result<SymmetricKey> {
        Ok(aead.decrypt_asymmetric(&self.grant_key, &secret_codec(), holder_private_key)?)
    }

    /// Hand this grant to the holder of `their_public_key`.
    ///
    /// The new grant carries the same name and the same secret. The
    /// delegator keeps a working grant.
    pub fn delegate<C: RawAeadCipher, S: RawAsymmetricSeal>(
        &self,
        aead: &Aead<C, S>,
        my_private_key: &PrivateKey,
        their_public_key: &PublicKey,
    ) -> Result<Self> {
        let secret = self.open_secret(aead, my_private_key)?;
        tracing::debug!(permission = %self.name, "re-sealing grant");
        Self::issue(aead, self.name.clone(), &secret, their_public_key)
    }
}
