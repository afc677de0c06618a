//! # YEP
//!
//! Capability permissions with transferable grants and stateless proofs.
//!
//! ## Overview
//!
//! - **Permissions**: Named capabilities minted once by an owner
//! - **Grants**: The permission secret sealed to a holder; passed on without the issuer
//! - **Proofs**: A grant re-addressed to a verifying service
//! - **Inclusion**: A broader permission proving the narrower ones it carries
//!
//! A verifying service keeps no grant database. It checks a proof with its
//! own private key and the public [`Permission`] handle, and gets a `bool`.
//!
//! ## Usage
//!
//! ```rust
//! use yep::{Delegations, KeyPair, Yep, YepConfig};
//!
//! let yep = Yep::new(YepConfig::default());
//!
//! let alice = KeyPair::generate_encryption();
//! let alice_signing = KeyPair::generate_signing();
//! let service = KeyPair::generate_service();
//!
//! let view = yep.new_permission("VIEW", Delegations::new(), &alice.public).unwrap();
//! let proof = yep
//!     .create_proof(&view.permission, &view.grant, &alice.private, &alice_signing.private, &service.public)
//!     .unwrap();
//!
//! assert!(yep.verify_proof(&view.permission, &proof, &alice.public, &alice_signing.public, &service.private));
//! ```
//!
//! ## Re-exports
//!
//! - `yep::datagram` - Datagram codecs and the AEAD engine
//! - `yep::perms` - Permissions, grants, and proofs

pub mod config;
pub mod error;
pub mod protocol;

// Re-export component crates
pub use yep_datagram as datagram;
pub use yep_perms as perms;

pub use config::{YepConfig, DEFAULT_MAX_PROOF_LEN};
pub use error::{Result, YepError};
pub use protocol::Yep;

// Re-export commonly used types
pub use yep_datagram::{AeadConfig, CipherSuite, EncryptedDatagram, KeyPair, PrivateKey, PublicKey};
pub use yep_perms::{Delegations, NewPermission, Permission, PermissionData, PermissionGrant, PermissionName, Proof};
