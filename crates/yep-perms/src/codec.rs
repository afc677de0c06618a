//! Codecs for the datagrams the protocol seals.
//!
//! Permission data is typed per permission name, so a secret for `VIEW`
//! cannot be used to open data declared as `EDIT` even before the tag check.

use semver::Version;
use yep_datagram::{CborCodec, CodecBinding, SymmetricKeyCodec, DATAGRAM_SCHEME};

use crate::grant::PermissionGrant;
use crate::permission::{PermissionData, PermissionName};

/// Version written by every protocol codec. Readers accept `^0.1.0`.
pub const PROTOCOL_VERSION: Version = Version::new(0, 1, 0);

/// Datagram type of a permission grant.
pub const GRANT_TYPE: &str = "permission_grant";

/// Codec for the private data of the permission called `name`.
pub fn permission_data_codec(name: &PermissionName) -> CborCodec<PermissionData> {
    CborCodec::new(CodecBinding::caret(
        format!("{DATAGRAM_SCHEME}permission_{name}"),
        PROTOCOL_VERSION,
    ))
}

/// Codec for grants sealed into proofs.
pub fn grant_codec() -> CborCodec<PermissionGrant> {
    CborCodec::new(CodecBinding::caret(
        format!("{DATAGRAM_SCHEME}{GRANT_TYPE}"),
        PROTOCOL_VERSION,
    ))
}

/// Codec for the permission secret carried in a grant.
pub fn secret_codec() -> SymmetricKeyCodec {
    SymmetricKeyCodec::default()
}
