//! The YEP service object.
//!
//! [`Yep`] binds one AEAD engine and one configuration to the protocol
//! operations so callers do not thread the engine through every call.

use yep_datagram::{Aead, CipherSuite, PrivateKey, PublicKey, RawAeadCipher, RawAsymmetricSeal, X25519Seal};
use yep_perms::{
    create_proof_for, Delegations, NewPermission, Permission, PermissionData, PermissionGrant,
    PermissionName, Proof,
};

use crate::config::YepConfig;
use crate::error::{Result, YepError};

/// Permission protocol bound to an engine and configuration.
#[derive(Debug, Clone)]
pub struct Yep<C = CipherSuite, S = X25519Seal> {
    aead: Aead<C, S>,
    config: YepConfig,
}

impl Yep {
    /// Create an instance using the cipher suite named in `config`.
    pub fn new(config: YepConfig) -> Self {
        Self {
            aead: Aead::new(&config.aead),
            config,
        }
    }
}

impl Default for Yep {
    fn default() -> Self {
        Self::new(YepConfig::default())
    }
}

impl<C: RawAeadCipher, S: RawAsymmetricSeal> Yep<C, S> {
    /// Create an instance over explicit primitives.
    ///
    /// `config.aead` is ignored; the given cipher is used instead.
    pub fn with_primitives(config: YepConfig, cipher: C, seal: S) -> Self {
        Self {
            aead: Aead::with_primitives(cipher, seal),
            config,
        }
    }

    pub fn config(&self) -> &YepConfig {
        &self.config
    }

    pub fn aead(&self) -> &Aead<C, S> {
        &self.aead
    }

    /// Mint a permission owned by `owner_public_key`.
    pub fn new_permission(
        &self,
        name: impl Into<PermissionName>,
        delegated: Delegations,
        owner_public_key: &PublicKey,
    ) -> Result<NewPermission> {
        let created = Permission::create(&self.aead, name, delegated, owner_public_key)?;
        tracing::debug!(permission = %created.permission.name, "new permission");
        Ok(created)
    }

    /// Re-seal `my_grant` for the holder of `their_public_key`.
    pub fn create_grant(
        &self,
        my_private_key: &PrivateKey,
        my_grant: &PermissionGrant,
        their_public_key: &PublicKey,
    ) -> Result<PermissionGrant> {
        Ok(my_grant.delegate(&self.aead, my_private_key, their_public_key)?)
    }

    /// Build a proof of `permission` for the service at `service_public_key`.
    pub fn create_proof(
        &self,
        permission: &Permission,
        grant: &PermissionGrant,
        holder_private_key: &PrivateKey,
        holder_signing_key: &PrivateKey,
        service_public_key: &PublicKey,
    ) -> Result<Proof> {
        let proof = Proof::create(
            &self.aead,
            permission,
            grant,
            holder_private_key,
            holder_signing_key,
            service_public_key,
        )?;
        tracing::debug!(permission = %permission.name, len = proof.payload_len(), "created proof");
        Ok(proof)
    }

    /// Build a proof of `target` through a broader permission that includes it.
    pub fn create_proof_for(
        &self,
        target: &PermissionName,
        broader: &Permission,
        broader_grant: &PermissionGrant,
        holder_private_key: &PrivateKey,
        holder_signing_key: &PrivateKey,
        service_public_key: &PublicKey,
    ) -> Result<Proof> {
        Ok(create_proof_for(
            &self.aead,
            target,
            broader,
            broader_grant,
            holder_private_key,
            holder_signing_key,
            service_public_key,
        )?)
    }

    /// Open a permission's private data with a grant.
    pub fn unlock_permission(
        &self,
        permission: &Permission,
        grant: &PermissionGrant,
        holder_private_key: &PrivateKey,
    ) -> Result<PermissionData> {
        Ok(permission.unlock(&self.aead, grant, holder_private_key)?)
    }

    /// Check a proof and report why it fails.
    pub fn check_proof(
        &self,
        permission: &Permission,
        proof: &Proof,
        holder_public_key: &PublicKey,
        holder_signing_public_key: &PublicKey,
        service_private_key: &PrivateKey,
    ) -> Result<()> {
        let len = proof.payload_len();
        if len > self.config.max_proof_len {
            return Err(YepError::ProofTooLarge {
                len,
                max: self.config.max_proof_len,
            });
        }
        proof.check(
            &self.aead,
            permission,
            holder_public_key,
            holder_signing_public_key,
            service_private_key,
        )?;
        Ok(())
    }

    /// Verify a proof. Never fails; every problem is a `false`.
    pub fn verify_proof(
        &self,
        permission: &Permission,
        proof: &Proof,
        holder_public_key: &PublicKey,
        holder_signing_public_key: &PublicKey,
        service_private_key: &PrivateKey,
    ) -> bool {
        match self.check_proof(
            permission,
            proof,
            holder_public_key,
            holder_signing_public_key,
            service_private_key,
        ) {
            Ok(()) => true,
            Err(YepError::ProofTooLarge { len, max }) => {
                tracing::warn!(permission = %permission.name, len, max, "oversized proof");
                false
            }
            Err(e) => {
                tracing::debug!(permission = %permission.name, error = %e, "proof rejected");
                false
            }
        }
    }
}
