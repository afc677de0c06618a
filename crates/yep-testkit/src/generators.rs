//! Proptest generators for property-based testing.

use proptest::prelude::*;

use yep_datagram::{CipherSuite, KeyPair, KeyType, PrivateKey, SymmetricKey};
use yep_perms::PermissionName;

use crate::fixtures::Principal;

/// Generate an encryption key pair from a random seed.
pub fn encryption_keypair() -> impl Strategy<Value = KeyPair> {
    any::<[u8; 32]>().prop_map(|seed| KeyPair::from_private(PrivateKey::from_bytes(KeyType::Encryption, seed)))
}

/// Generate a principal from a random seed.
pub fn principal() -> impl Strategy<Value = Principal> {
    any::<[u8; 32]>().prop_map(Principal::with_seed)
}

/// Generate a symmetric key.
pub fn symmetric_key() -> impl Strategy<Value = SymmetricKey> {
    any::<[u8; 32]>().prop_map(SymmetricKey::from_bytes)
}

/// Generate a cipher suite.
pub fn cipher_suite() -> impl Strategy<Value = CipherSuite> {
    prop_oneof![Just(CipherSuite::ChaCha20Poly1305), Just(CipherSuite::Aes256Gcm)]
}

/// Generate a permission name.
pub fn permission_name() -> impl Strategy<Value = PermissionName> {
    "[A-Z][A-Z_]{0,15}".prop_map(PermissionName::from)
}

/// Generate a pair of distinct permission names.
pub fn distinct_names() -> impl Strategy<Value = (PermissionName, PermissionName)> {
    (permission_name(), permission_name()).prop_filter("names must differ", |(a, b)| a != b)
}

/// Parameters for a single-permission protocol run.
#[derive(Debug, Clone)]
pub struct ScenarioParams {
    pub name: PermissionName,
    pub owner: Principal,
    pub delegate: Principal,
    pub suite: CipherSuite,
}

impl Arbitrary for ScenarioParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (permission_name(), any::<[u8; 32]>(), any::<[u8; 32]>(), cipher_suite())
            .prop_filter("principals must differ", |(_, a, b, _)| a != b)
            .prop_map(|(name, owner, delegate, suite)| ScenarioParams {
                name,
                owner: Principal::with_seed(owner),
                delegate: Principal::with_seed(delegate),
                suite,
            })
            .boxed()
    }
}
