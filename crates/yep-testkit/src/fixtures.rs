//! Test fixtures and helpers.
//!
//! Common setup code for protocol tests.

use std::collections::BTreeMap;

use yep::{Yep, YepConfig};
use yep_datagram::{KeyPair, KeyType, PrivateKey};
use yep_perms::{NewPermission, Permission, PermissionGrant, Proof};

/// A party holding an encryption key pair and a signing key pair.
#[derive(Debug, Clone)]
pub struct Principal {
    pub encryption: KeyPair,
    pub signing: KeyPair,
}

impl Principal {
    /// Create a principal with random keys.
    pub fn new() -> Self {
        Self {
            encryption: KeyPair::generate_encryption(),
            signing: KeyPair::generate_signing(),
        }
    }

    /// Create with deterministic keys from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        let mut signing_seed = seed;
        signing_seed[31] ^= 0xff;
        Self {
            encryption: KeyPair::from_private(PrivateKey::from_bytes(KeyType::Encryption, seed)),
            signing: KeyPair::from_private(PrivateKey::from_bytes(KeyType::Signing, signing_seed)),
        }
    }
}

impl Default for Principal {
    fn default() -> Self {
        Self::new()
    }
}

/// A `Yep` instance, an owner, and a verifying service.
pub struct TestFixture {
    pub yep: Yep,
    pub owner: Principal,
    pub service: KeyPair,
}

impl TestFixture {
    /// Create a new test fixture with the default configuration.
    pub fn new() -> Self {
        Self::with_config(YepConfig::default())
    }

    pub fn with_config(config: YepConfig) -> Self {
        Self {
            yep: Yep::new(config),
            owner: Principal::new(),
            service: KeyPair::generate_service(),
        }
    }

    /// Mint a permission owned by the fixture owner.
    pub fn permission(&self, name: &str) -> NewPermission {
        self.including(name, &[])
    }

    /// Mint a permission owned by the fixture owner that includes `narrower`.
    pub fn including(&self, name: &str, narrower: &[&NewPermission]) -> NewPermission {
        let delegated: BTreeMap<_, _> = narrower.iter().map(|p| p.delegation()).collect();
        self.yep
            .new_permission(name, delegated, &self.owner.encryption.public)
            .expect("permission creation failed")
    }

    /// Build a proof from `holder` for the fixture service.
    pub fn proof(&self, holder: &Principal, permission: &Permission, grant: &PermissionGrant) -> Proof {
        self.yep
            .create_proof(
                permission,
                grant,
                &holder.encryption.private,
                &holder.signing.private,
                &self.service.public,
            )
            .expect("proof creation failed")
    }

    /// Verify a proof from `holder` at the fixture service.
    pub fn verify(&self, holder: &Principal, permission: &Permission, proof: &Proof) -> bool {
        self.yep.verify_proof(
            permission,
            proof,
            &holder.encryption.public,
            &holder.signing.public,
            &self.service.private,
        )
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create multiple principals for multi-party tests.
///
/// Seeds are distinct for up to `u32::MAX` principals.
pub fn multi_party_principals(count: usize) -> Vec<Principal> {
    debug_assert!(count <= u32::MAX as usize);
    (0..count)
        .map(|i| {
            // Byte 0 is partly cleared by X25519 clamping.
            let mut seed = [0u8; 32];
            seed[1..5].copy_from_slice(&(i as u32).to_le_bytes());
            seed[5] = 1;
            Principal::with_seed(seed)
        })
        .collect()
}

/// Install a `tracing` subscriber that writes through the test harness.
///
/// Honors `RUST_LOG`. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_holds_new_permission() {
        let fixture = TestFixture::new();
        let view = fixture.permission("VIEW");

        let proof = fixture.proof(&fixture.owner, &view.permission, &view.grant);
        assert!(fixture.verify(&fixture.owner, &view.permission, &proof));
    }

    #[test]
    fn test_seeded_principal_is_deterministic() {
        let a = Principal::with_seed([7u8; 32]);
        let b = Principal::with_seed([7u8; 32]);

        assert_eq!(a.encryption.public, b.encryption.public);
        assert_eq!(a.signing.public, b.signing.public);
        assert_ne!(a.encryption.public.as_bytes(), a.signing.public.as_bytes());
    }

    #[test]
    fn test_multi_party() {
        let parties = multi_party_principals(3);

        // Each party has unique keys
        let pks: Vec<_> = parties.iter().map(|p| p.encryption.public.clone()).collect();
        assert_ne!(pks[0], pks[1]);
        assert_ne!(pks[1], pks[2]);
        assert_ne!(pks[0], pks[2]);
    }

    #[test]
    fn test_multi_party_past_one_byte() {
        let parties = multi_party_principals(300);

        let unique: std::collections::HashSet<_> =
            parties.iter().map(|p| p.encryption.public.clone()).collect();
        assert_eq!(unique.len(), 300);
    }
}
