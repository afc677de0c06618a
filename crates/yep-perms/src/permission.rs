//! Named permissions and their sealed capability data.
//!
//! A permission is a public handle: a name, a public key, and private data
//! sealed under the permission secret. Whoever can recover the secret from
//! a grant can open the private data and recover the permission's private
//! key, together with the private keys of any permissions it includes.
//!
//! The secret is derived from the permission's private key, so the key and
//! the secret always travel together:
//!
//! ```text
//! secret = BLAKE3-derive_key(CONTEXT, u64_le(len(name)) || name || private_key)
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use yep_datagram::{
    Aead, EncryptedDatagram, KeyPair, KeySubtype, PrivateKey, PublicKey, RawAeadCipher,
    RawAsymmetricSeal, SymmetricKey,
};

use crate::codec::permission_data_codec;
use crate::error::{PermsError, Result};
use crate::grant::PermissionGrant;

const SECRET_CONTEXT: &str = "yep-perms v0 permission secret";

/// Name of a permission, e.g. `VIEW`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionName(String);

impl PermissionName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PermissionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PermissionName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for PermissionName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Private keys of included permissions, keyed by their names.
pub type Delegations = BTreeMap<PermissionName, PrivateKey>;

/// The plaintext behind [`Permission::private_data`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionData {
    /// The permission's own private key, tagged with its name.
    pub private_key: PrivateKey,
    /// Private keys of narrower permissions this one includes.
    pub data: Delegations,
}

/// A named capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub name: PermissionName,
    pub public_key: PublicKey,
    pub private_data: EncryptedDatagram<PermissionData>,
}

/// Everything produced when a permission is minted.
#[derive(Debug, Clone)]
pub struct NewPermission {
    /// The public handle, safe to hand to services.
    pub permission: Permission,
    /// The owner's grant.
    pub grant: PermissionGrant,
    /// The permission's own key pair.
    pub keys: KeyPair,
}

impl NewPermission {
    /// The `(name, private key)` entry to include this permission in a broader one.
    pub fn delegation(&self) -> (PermissionName, PrivateKey) {
        (self.permission.name.clone(), self.keys.private.clone())
    }
}

/// Derive the permission secret for `name` from its private key.
pub fn derive_secret(name: &PermissionName, private_key: &PrivateKey) -> SymmetricKey {
    let mut hasher = blake3::Hasher::new_derive_key(SECRET_CONTEXT);
    hasher.update(&(name.as_str().len() as u64).to_le_bytes());
    hasher.update(name.as_str().as_bytes());
    hasher.update(private_key.as_bytes());
    SymmetricKey::from_bytes(*hasher.finalize().as_bytes())
}

impl Permission {
    /// Mint a permission owned by `owner_public_key`.
    ///
    /// Each entry of `delegated` must be a private key tagged with the name
    /// it is filed under, as returned by [`NewPermission::delegation`].
    pub fn create<C: RawAeadCipher, S: RawAsymmetricSeal>(
        aead: &Aead<C, S>,
        name: impl Into<PermissionName>,
        delegated: Delegations,
        owner_public_key: &PublicKey,
    ) -> Result<NewPermission> {
        let name = name.into();

        for (included, key) in &delegated {
            if key.name() != Some(included.as_str()) {
                return Err(PermsError::KeyMismatch(format!(
                    "delegated key filed as {included:?} is tagged {:?}",
                    key.name()
                )));
            }
        }

        let keys = KeyPair::generate_encryption().tagged(KeySubtype::Permission, Some(name.to_string()));
        let secret = derive_secret(&name, &keys.private);

        let data = PermissionData {
            private_key: keys.private.clone(),
            data: delegated,
        };
        let private_data = aead.encrypt_symmetric(&data, &permission_data_codec(&name), &secret)?;
        let grant = PermissionGrant::issue(aead, name.clone(), &secret, owner_public_key)?;

        tracing::debug!(permission = %name, included = data.data.len(), "minted permission");

        Ok(NewPermission {
            permission: Permission {
                name,
                public_key: keys.public.clone(),
                private_data,
            },
            grant,
            keys,
        })
    }

    /// Open the private data with a grant for this permission.
    pub fn unlock<C: RawAeadCipher, S: RawAsymmetricSeal>(
        &self,
        aead: &Aead<C, S>,
        grant: &PermissionGrant,
        holder_private_key: &PrivateKey,
    ) -> Result<PermissionData> {
        if grant.name != self.name {
            return Err(PermsError::NameMismatch {
                expected: self.name.to_string(),
                found: grant.name.to_string(),
            });
        }
        let secret = grant.open_secret(aead, holder_private_key)?;
        self.unlock_with_secret(aead, &secret)
    }

    /// Open the private data with the permission secret and check that the
    /// recovered key really is this permission's key.
    pub(crate) fn unlock_with_secret<C: RawAeadCipher, S: RawAsymmetricSeal>(
        &self,
        aead: &Aead<C, S>,
        secret: &SymmetricKey,
    ) -> Result<PermissionData> {
        let data = aead.decrypt_symmetric(&self.private_data, &permission_data_codec(&self.name), secret)?;

        if data.private_key.public_key() != self.public_key {
            return Err(PermsError::KeyMismatch(format!(
                "private data of {} does not match its public key",
                self.name
            )));
        }
        if data.private_key.name() != Some(self.name.as_str()) {
            return Err(PermsError::KeyMismatch(format!(
                "private key of {} is tagged {:?}",
                self.name,
                data.private_key.name()
            )));
        }
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yep_datagram::{AeadConfig, DatagramError, KeyType, Visibility};

    fn aead() -> Aead {
        Aead::new(&AeadConfig::default())
    }

    #[test]
    fn test_create_permission() {
        let aead = aead();
        let owner = KeyPair::generate_encryption();
        let created = Permission::create(&aead, "VIEW", Delegations::new(), &owner.public).unwrap();

        let permission = &created.permission;
        assert_eq!(permission.name.as_str(), "VIEW");
        assert_eq!(permission.public_key.name(), Some("VIEW"));
        assert_eq!(permission.public_key.subtype(), Some(KeySubtype::Permission));
        assert_eq!(permission.public_key.visibility(), Visibility::Public);
        assert_eq!(permission.public_key.key_type(), KeyType::Encryption);
        assert_eq!(permission.private_data.metadata.datagram_type, "datagram://permission_VIEW");
        assert_eq!(created.grant.name, permission.name);
        assert_eq!(created.keys.public, permission.public_key);
    }

    #[test]
    fn test_owner_can_unlock() {
        let aead = aead();
        let owner = KeyPair::generate_encryption();
        let created = Permission::create(&aead, "VIEW", Delegations::new(), &owner.public).unwrap();

        let data = created.permission.unlock(&aead, &created.grant, &owner.private).unwrap();
        assert_eq!(data.private_key, created.keys.private);
        assert!(data.data.is_empty());
    }

    #[test]
    fn test_stranger_cannot_unlock() {
        let aead = aead();
        let owner = KeyPair::generate_encryption();
        let stranger = KeyPair::generate_encryption();
        let created = Permission::create(&aead, "VIEW", Delegations::new(), &owner.public).unwrap();

        let result = created.permission.unlock(&aead, &created.grant, &stranger.private);
        assert!(matches!(
            result,
            Err(PermsError::Datagram(DatagramError::AuthenticationFailure(_)))
        ));
    }

    #[test]
    fn test_grant_for_other_instance_rejected() {
        let aead = aead();
        let owner = KeyPair::generate_encryption();
        let first = Permission::create(&aead, "VIEW", Delegations::new(), &owner.public).unwrap();
        let second = Permission::create(&aead, "VIEW", Delegations::new(), &owner.public).unwrap();

        let result = first.permission.unlock(&aead, &second.grant, &owner.private);
        assert!(matches!(
            result,
            Err(PermsError::Datagram(DatagramError::AuthenticationFailure(_)))
        ));
    }

    #[test]
    fn test_grant_name_checked() {
        let aead = aead();
        let owner = KeyPair::generate_encryption();
        let view = Permission::create(&aead, "VIEW", Delegations::new(), &owner.public).unwrap();
        let edit = Permission::create(&aead, "EDIT", Delegations::new(), &owner.public).unwrap();

        let result = view.permission.unlock(&aead, &edit.grant, &owner.private);
        assert!(matches!(result, Err(PermsError::NameMismatch { .. })));
    }

    #[test]
    fn test_delegations_stored() {
        let aead = aead();
        let owner = KeyPair::generate_encryption();
        let view = Permission::create(&aead, "VIEW", Delegations::new(), &owner.public).unwrap();
        let edit = Permission::create(&aead, "EDIT", Delegations::from([view.delegation()]), &owner.public).unwrap();

        let data = edit.permission.unlock(&aead, &edit.grant, &owner.private).unwrap();
        assert_eq!(data.data.get(&PermissionName::from("VIEW")), Some(&view.keys.private));
    }

    #[test]
    fn test_mislabeled_delegation_rejected() {
        let aead = aead();
        let owner = KeyPair::generate_encryption();
        let view = Permission::create(&aead, "VIEW", Delegations::new(), &owner.public).unwrap();

        let delegated = Delegations::from([(PermissionName::from("ADMIN"), view.keys.private.clone())]);
        let result = Permission::create(&aead, "EDIT", delegated, &owner.public);
        assert!(matches!(result, Err(PermsError::KeyMismatch(_))));
    }

    #[test]
    fn test_signing_owner_key_refused() {
        let aead = aead();
        let owner = KeyPair::generate_signing();
        let result = Permission::create(&aead, "VIEW", Delegations::new(), &owner.public);
        assert!(matches!(result, Err(PermsError::Datagram(DatagramError::InvalidKey(_)))));
    }

    #[test]
    fn test_secret_derivation_is_name_bound() {
        let keys = KeyPair::generate_encryption();
        let view = derive_secret(&PermissionName::from("VIEW"), &keys.private);
        let edit = derive_secret(&PermissionName::from("EDIT"), &keys.private);

        assert_ne!(view, edit);
        assert_eq!(view, derive_secret(&PermissionName::from("VIEW"), &keys.private));
    }

    #[test]
    fn test_permission_wire_shape() {
        let aead = aead();
        let owner = KeyPair::generate_encryption();
        let created = Permission::create(&aead, "VIEW", Delegations::new(), &owner.public).unwrap();

        let value = serde_json::to_value(&created.permission).unwrap();
        assert_eq!(value["name"], "VIEW");
        assert_eq!(value["public_key"]["subtype"], "permission");
        assert_eq!(value["private_data"]["metadata"]["type"], "datagram://permission_VIEW");

        let back: Permission = serde_json::from_value(value).unwrap();
        assert_eq!(back, created.permission);
    }
}
