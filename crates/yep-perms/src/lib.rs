//! # YEP Permissions
//!
//! Named permissions, transferable grants, and proofs a service can check
//! without keeping any record of who was granted what.
//!
//! ## Overview
//!
//! A permission is minted once and never changes. Access to it is carried
//! entirely by grants: each grant is the permission secret sealed to one
//! holder. Holders pass grants on without involving the issuer, and prove
//! possession by re-addressing their grant to a verifying service.
//!
//! ## Key Concepts
//!
//! - **Permission**: A name, a public key, and private data sealed under the permission secret
//! - **Grant**: The permission secret sealed to a holder's public key
//! - **Delegation**: Re-sealing the same secret for another holder
//! - **Proof**: A grant addressed and sealed to a verifying service
//! - **Inclusion**: A broader permission carrying the private keys of narrower ones
//!
//! ## Verification
//!
//! [`Proof::verify`] returns a plain `bool` and never fails. A proof is
//! accepted only if its grant unlocks the exact permission instance it is
//! checked against; two permissions that share a name are unrelated.
//!
//! ## Limitations
//!
//! There is no revocation and no key rotation. Anyone who has ever held a
//! grant can keep delegating it.

pub mod codec;
pub mod compose;
pub mod error;
pub mod grant;
pub mod permission;
pub mod proof;

pub use compose::create_proof_for;
pub use error::{PermsError, Result};
pub use grant::PermissionGrant;
pub use permission::{derive_secret, Delegations, NewPermission, Permission, PermissionData, PermissionName};
pub use proof::Proof;
