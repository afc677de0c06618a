//! Proofs for narrower permissions held through a broader one.
//!
//! A broader permission (say `EDIT`) can include narrower ones (`VIEW`) by
//! carrying their private keys in its private data. Whoever holds a grant
//! for `EDIT` can unlock those keys, re-derive the `VIEW` secret, and prove
//! `VIEW` to a service without ever holding a `VIEW` grant.
//!
//! Only direct inclusions are followed. Reaching a permission two levels
//! down needs the middle permission's public handle, which a broader
//! permission does not carry.

use yep_datagram::{Aead, PrivateKey, PublicKey, RawAeadCipher, RawAsymmetricSeal};

use crate::error::{PermsError, Result};
use crate::grant::PermissionGrant;
use crate::permission::{derive_secret, Permission, PermissionName};
use crate::proof::Proof;

/// Build a proof for `target` from a grant for a broader permission that includes it.
///
/// The resulting proof verifies against the narrower [`Permission`] exactly
/// like one built from a direct grant. No new secret is minted.
pub fn create_proof_for<C: RawAeadCipher, S: RawAsymmetricSeal>(
    aead: &Aead<C, S>,
    target: &PermissionName,
    broader: &Permission,
    broader_grant: &PermissionGrant,
    holder_private_key: &PrivateKey,
    _holder_signing_key: &PrivateKey,
    service_public_key: &PublicKey,
) -> Result<Proof> {
    let data = broader.unlock(aead, broader_grant, holder_private_key)?;

    let narrower_key = data
        .data
        .get(target)
        .ok_or_else(|| PermsError::UnknownDelegation(target.to_string()))?;

    let secret = derive_secret(target, narrower_key);
    let service_grant = PermissionGrant::issue(aead, target.clone(), &secret, service_public_key)?;

    tracing::debug!(permission = %target, via = %broader.name, "proof through included permission");
    Proof::seal(aead, &service_grant, service_public_key)
}
