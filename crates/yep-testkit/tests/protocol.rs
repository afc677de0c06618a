//! End-to-end protocol scenarios.
//!
//! Each test drives the public `Yep` API the way a deployment would: an
//! owner mints permissions, holders pass grants around, and a service that
//! keeps no state checks proofs.

use yep::datagram::{CipherSuite, EncryptedDatagram, KeyPair};
use yep::perms::{PermissionName, Proof};
use yep::{Delegations, YepConfig};
use yep_testkit::{init_tracing, multi_party_principals, Principal, TestFixture};

#[test]
fn test_basic_view_permission() {
    init_tracing();
    let fixture = TestFixture::new();
    let view = fixture.permission("VIEW");

    let proof = fixture.proof(&fixture.owner, &view.permission, &view.grant);
    assert!(fixture.verify(&fixture.owner, &view.permission, &proof));
}

#[test]
fn test_delegation_to_bob() {
    init_tracing();
    let fixture = TestFixture::new();
    let bob = Principal::new();
    let view = fixture.permission("VIEW");

    let bobs_grant = fixture
        .yep
        .create_grant(&fixture.owner.encryption.private, &view.grant, &bob.encryption.public)
        .unwrap();
    assert_eq!(bobs_grant.name, view.permission.name);

    let proof = fixture.proof(&bob, &view.permission, &bobs_grant);
    assert!(fixture.verify(&bob, &view.permission, &proof));

    // The permission is untouched and the owner's grant keeps working.
    let proof = fixture.proof(&fixture.owner, &view.permission, &view.grant);
    assert!(fixture.verify(&fixture.owner, &view.permission, &proof));
}

#[test]
fn test_delegation_chain_across_parties() {
    init_tracing();
    let fixture = TestFixture::new();
    let parties = multi_party_principals(4);
    let view = fixture.permission("VIEW");

    let mut holder = fixture.owner.clone();
    let mut grant = view.grant.clone();
    for next in &parties {
        grant = fixture
            .yep
            .create_grant(&holder.encryption.private, &grant, &next.encryption.public)
            .unwrap();
        holder = next.clone();
    }

    let proof = fixture.proof(&holder, &view.permission, &grant);
    assert!(fixture.verify(&holder, &view.permission, &proof));
}

#[test]
fn test_stranger_cannot_delegate() {
    let fixture = TestFixture::new();
    let mallory = Principal::new();
    let view = fixture.permission("VIEW");

    let result = fixture
        .yep
        .create_grant(&mallory.encryption.private, &view.grant, &mallory.encryption.public);
    assert!(result.is_err());

    let result = fixture.yep.create_proof(
        &view.permission,
        &view.grant,
        &mallory.encryption.private,
        &mallory.signing.private,
        &fixture.service.public,
    );
    assert!(result.is_err());
}

#[test]
fn test_proofs_are_unique() {
    let fixture = TestFixture::new();
    let view = fixture.permission("VIEW");

    let first = fixture.proof(&fixture.owner, &view.permission, &view.grant);
    let second = fixture.proof(&fixture.owner, &view.permission, &view.grant);

    assert_ne!(first.as_datagram().payload, second.as_datagram().payload);
    assert!(fixture.verify(&fixture.owner, &view.permission, &first));
    assert!(fixture.verify(&fixture.owner, &view.permission, &second));
}

#[test]
fn test_distinct_instances_are_not_interchangeable() {
    init_tracing();
    let fixture = TestFixture::new();
    let view = fixture.permission("VIEW");
    let other_view = fixture.permission("VIEW");

    let proof = fixture.proof(&fixture.owner, &other_view.permission, &other_view.grant);

    assert!(fixture.verify(&fixture.owner, &other_view.permission, &proof));
    assert!(!fixture.verify(&fixture.owner, &view.permission, &proof));
}

#[test]
fn test_domain_separation() {
    let fixture = TestFixture::new();
    let view = fixture.permission("VIEW");
    let edit = fixture.permission("EDIT");

    let edit_proof = fixture.proof(&fixture.owner, &edit.permission, &edit.grant);
    let view_proof = fixture.proof(&fixture.owner, &view.permission, &view.grant);

    assert!(!fixture.verify(&fixture.owner, &view.permission, &edit_proof));
    assert!(!fixture.verify(&fixture.owner, &edit.permission, &view_proof));
}

#[test]
fn test_wrong_service_rejects() {
    let fixture = TestFixture::new();
    let other = TestFixture::new();
    let view = fixture.permission("VIEW");

    let proof = fixture.proof(&fixture.owner, &view.permission, &view.grant);
    assert!(!other.verify(&fixture.owner, &view.permission, &proof));
}

#[test]
fn test_hierarchical_edit_proves_view() {
    init_tracing();
    let fixture = TestFixture::new();
    let bob = Principal::new();
    let view = fixture.permission("VIEW");
    let edit = fixture.including("EDIT", &[&view]);

    // Bob only ever receives an EDIT grant.
    let bobs_edit = fixture
        .yep
        .create_grant(&fixture.owner.encryption.private, &edit.grant, &bob.encryption.public)
        .unwrap();

    let proof = fixture
        .yep
        .create_proof_for(
            &view.permission.name,
            &edit.permission,
            &bobs_edit,
            &bob.encryption.private,
            &bob.signing.private,
            &fixture.service.public,
        )
        .unwrap();

    assert!(fixture.verify(&bob, &view.permission, &proof));
    assert!(!fixture.verify(&bob, &edit.permission, &proof));

    let edit_proof = fixture.proof(&bob, &edit.permission, &bobs_edit);
    assert!(fixture.verify(&bob, &edit.permission, &edit_proof));
}

#[test]
fn test_view_does_not_prove_edit() {
    let fixture = TestFixture::new();
    let view = fixture.permission("VIEW");
    let edit = fixture.including("EDIT", &[&view]);

    let result = fixture.yep.create_proof_for(
        &edit.permission.name,
        &view.permission,
        &view.grant,
        &fixture.owner.encryption.private,
        &fixture.owner.signing.private,
        &fixture.service.public,
    );
    assert!(result.is_err());
}

#[test]
fn test_unlock_reveals_included_keys() {
    let fixture = TestFixture::new();
    let view = fixture.permission("VIEW");
    let comment = fixture.permission("COMMENT");
    let edit = fixture.including("EDIT", &[&view, &comment]);

    let data = fixture
        .yep
        .unlock_permission(&edit.permission, &edit.grant, &fixture.owner.encryption.private)
        .unwrap();

    assert_eq!(data.private_key, edit.keys.private);
    assert_eq!(data.data.len(), 2);
    assert_eq!(data.data.get(&PermissionName::from("COMMENT")), Some(&comment.keys.private));
}

#[test]
fn test_malformed_proofs_return_false() {
    init_tracing();
    let fixture = TestFixture::new();
    let view = fixture.permission("VIEW");
    let good = fixture.proof(&fixture.owner, &view.permission, &view.grant);
    let metadata = good.as_datagram().metadata.clone();

    let mut truncated = good.as_datagram().payload.clone();
    truncated.truncate(truncated.len() / 2);

    let mut flipped = good.as_datagram().payload.clone().into_bytes();
    let mid = flipped.len() / 2;
    flipped[mid] = if flipped[mid] == b'A' { b'B' } else { b'A' };
    let flipped = String::from_utf8(flipped).unwrap();

    let mut wrong_version = metadata.clone();
    wrong_version.version = "9.0.0".to_string();

    let cases = [
        Proof::from(EncryptedDatagram::new(String::new(), metadata.clone())),
        Proof::from(EncryptedDatagram::new("not base64 at all".to_string(), metadata.clone())),
        Proof::from(EncryptedDatagram::new(truncated, metadata.clone())),
        Proof::from(EncryptedDatagram::new(flipped, metadata.clone())),
        Proof::from(EncryptedDatagram::new(good.as_datagram().payload.clone(), wrong_version)),
    ];

    for proof in &cases {
        assert!(!fixture.verify(&fixture.owner, &view.permission, proof));
    }
}

#[test]
fn test_proof_survives_json_transport() {
    let fixture = TestFixture::new();
    let view = fixture.permission("VIEW");
    let proof = fixture.proof(&fixture.owner, &view.permission, &view.grant);

    let permission_json = serde_json::to_string(&view.permission).unwrap();
    let proof_json = proof.as_datagram().to_json().unwrap();

    let permission = serde_json::from_str(&permission_json).unwrap();
    let proof = Proof::from(EncryptedDatagram::from_json(&proof_json).unwrap());
    assert!(fixture.verify(&fixture.owner, &permission, &proof));
}

#[test]
fn test_aes_suite_end_to_end() {
    let fixture = TestFixture::with_config(YepConfig::default().with_suite(CipherSuite::Aes256Gcm));
    let bob = Principal::new();
    let view = fixture.permission("VIEW");

    let grant = fixture
        .yep
        .create_grant(&fixture.owner.encryption.private, &view.grant, &bob.encryption.public)
        .unwrap();
    let proof = fixture.proof(&bob, &view.permission, &grant);
    assert!(fixture.verify(&bob, &view.permission, &proof));

    // A ChaCha verifier cannot read an AES proof.
    let chacha = TestFixture {
        yep: yep::Yep::default(),
        owner: fixture.owner.clone(),
        service: fixture.service.clone(),
    };
    assert!(!chacha.verify(&bob, &view.permission, &proof));
}

#[test]
fn test_signing_key_cannot_own_permission() {
    let fixture = TestFixture::new();
    let signer = KeyPair::generate_signing();

    let result = fixture.yep.new_permission("VIEW", Delegations::new(), &signer.public);
    assert!(result.is_err());
}
