//! Datagram codecs.
//!
//! A codec pairs a Rust type with the metadata it is sealed under and the
//! range of versions it accepts when opening. Checking happens against the
//! clear-text metadata, before any key is touched.

use semver::{Comparator, Op, Version, VersionReq};
use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;

use crate::crypto::SymmetricKey;
use crate::datagram::DatagramMetadata;
use crate::error::{DatagramError, Result};

/// The metadata a codec writes and the versions it reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecBinding {
    metadata: DatagramMetadata,
    version_range: VersionReq,
}

impl CodecBinding {
    pub fn new(datagram_type: impl Into<String>, version: &Version, version_range: VersionReq) -> Self {
        Self {
            metadata: DatagramMetadata::new(datagram_type, version.to_string()),
            version_range,
        }
    }

    /// Accept any version compatible with `version` (`^version`).
    pub fn caret(datagram_type: impl Into<String>, version: Version) -> Self {
        let range = single_comparator(Op::Caret, &version);
        Self::new(datagram_type, &version, range)
    }

    /// Accept `version` and nothing else (`=version`).
    pub fn exact(datagram_type: impl Into<String>, version: Version) -> Self {
        let range = single_comparator(Op::Exact, &version);
        Self::new(datagram_type, &version, range)
    }

    /// Build from textual version and range, e.g. `("0.1.0", "^0.1.0")`.
    pub fn parse(datagram_type: impl Into<String>, version: &str, version_range: &str) -> Result<Self> {
        let version = Version::parse(version)
            .map_err(|e| DatagramError::Codec(format!("invalid version {version:?}: {e}")))?;
        let range = VersionReq::parse(version_range)
            .map_err(|e| DatagramError::Codec(format!("invalid range {version_range:?}: {e}")))?;
        Ok(Self::new(datagram_type, &version, range))
    }

    pub fn metadata(&self) -> &DatagramMetadata {
        &self.metadata
    }

    pub fn version_range(&self) -> &VersionReq {
        &self.version_range
    }

    /// Check that a datagram's metadata can be decoded by this binding.
    ///
    /// The type must match exactly. The version must parse as semver and
    /// satisfy the range.
    pub fn check(&self, found: &DatagramMetadata) -> Result<()> {
        let compatible = found.datagram_type == self.metadata.datagram_type
            && Version::parse(&found.version)
                .map(|v| self.version_range.matches(&v))
                .unwrap_or(false);

        if compatible {
            Ok(())
        } else {
            Err(DatagramError::MetadataMismatch {
                expected_type: self.metadata.datagram_type.clone(),
                found_type: found.datagram_type.clone(),
                found_version: found.version.clone(),
                version_range: self.version_range.to_string(),
            })
        }
    }
}

fn single_comparator(op: Op, version: &Version) -> VersionReq {
    VersionReq {
        comparators: vec![Comparator {
            op,
            major: version.major,
            minor: Some(version.minor),
            patch: Some(version.patch),
            pre: version.pre.clone(),
        }],
    }
}

/// Serialize/deserialize contract for one data type.
pub trait DatagramCodec {
    /// The type this codec carries.
    type Data;

    fn binding(&self) -> &CodecBinding;

    fn serialize(&self, data: &Self::Data) -> Result<Vec<u8>>;

    fn deserialize(&self, bytes: &[u8]) -> Result<Self::Data>;

    fn metadata(&self) -> &DatagramMetadata {
        self.binding().metadata()
    }

    fn version_range(&self) -> &VersionReq {
        self.binding().version_range()
    }

    fn check_metadata(&self, found: &DatagramMetadata) -> Result<()> {
        self.binding().check(found)
    }
}

fn v0_1_0() -> Version {
    Version::new(0, 1, 0)
}

/// UTF-8 strings, `datagram://string`.
#[derive(Debug, Clone)]
pub struct StringCodec {
    binding: CodecBinding,
}

impl StringCodec {
    pub fn with_binding(binding: CodecBinding) -> Self {
        Self { binding }
    }
}

impl Default for StringCodec {
    fn default() -> Self {
        Self::with_binding(CodecBinding::caret("datagram://string", v0_1_0()))
    }
}

impl DatagramCodec for StringCodec {
    type Data = String;

    fn binding(&self) -> &CodecBinding {
        &self.binding
    }

    fn serialize(&self, data: &String) -> Result<Vec<u8>> {
        Ok(data.as_bytes().to_vec())
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<String> {
        String::from_utf8(bytes.to_vec()).map_err(|e| DatagramError::Codec(e.to_string()))
    }
}

/// Numbers as decimal text, `datagram://number`.
#[derive(Debug, Clone)]
pub struct NumberCodec {
    binding: CodecBinding,
}

impl Default for NumberCodec {
    fn default() -> Self {
        Self {
            binding: CodecBinding::caret("datagram://number", v0_1_0()),
        }
    }
}

impl DatagramCodec for NumberCodec {
    type Data = f64;

    fn binding(&self) -> &CodecBinding {
        &self.binding
    }

    fn serialize(&self, data: &f64) -> Result<Vec<u8>> {
        Ok(data.to_string().into_bytes())
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<f64> {
        std::str::from_utf8(bytes)
            .map_err(|e| DatagramError::Codec(e.to_string()))?
            .parse()
            .map_err(|e: std::num::ParseFloatError| DatagramError::Codec(e.to_string()))
    }
}

/// Raw 32-byte symmetric keys, `datagram://symmetric`.
#[derive(Debug, Clone)]
pub struct SymmetricKeyCodec {
    binding: CodecBinding,
}

impl Default for SymmetricKeyCodec {
    fn default() -> Self {
        Self {
            binding: CodecBinding::caret("datagram://symmetric", v0_1_0()),
        }
    }
}

impl DatagramCodec for SymmetricKeyCodec {
    type Data = SymmetricKey;

    fn binding(&self) -> &CodecBinding {
        &self.binding
    }

    fn serialize(&self, data: &SymmetricKey) -> Result<Vec<u8>> {
        Ok(data.as_bytes().to_vec())
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<SymmetricKey> {
        SymmetricKey::try_from(bytes)
    }
}

/// Any serde type as JSON.
#[derive(Debug, Clone)]
pub struct JsonCodec<T> {
    binding: CodecBinding,
    _data: PhantomData<fn() -> T>,
}

impl<T> JsonCodec<T> {
    pub fn new(binding: CodecBinding) -> Self {
        Self {
            binding,
            _data: PhantomData,
        }
    }
}

impl<T: Serialize + DeserializeOwned> DatagramCodec for JsonCodec<T> {
    type Data = T;

    fn binding(&self) -> &CodecBinding {
        &self.binding
    }

    fn serialize(&self, data: &T) -> Result<Vec<u8>> {
        serde_json::to_vec(data).map_err(|e| DatagramError::Codec(e.to_string()))
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<T> {
        serde_json::from_slice(bytes).map_err(|e| DatagramError::Codec(e.to_string()))
    }
}

/// Any serde type as CBOR.
#[derive(Debug, Clone)]
pub struct CborCodec<T> {
    binding: CodecBinding,
    _data: PhantomData<fn() -> T>,
}

impl<T> CborCodec<T> {
    pub fn new(binding: CodecBinding) -> Self {
        Self {
            binding,
            _data: PhantomData,
        }
    }
}

impl<T: Serialize + DeserializeOwned> DatagramCodec for CborCodec<T> {
    type Data = T;

    fn binding(&self) -> &CodecBinding {
        &self.binding
    }

    fn serialize(&self, data: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(data, &mut buf).map_err(|e| DatagramError::Codec(e.to_string()))?;
        Ok(buf)
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<T> {
        ciborium::from_reader(bytes).map_err(|e| DatagramError::Codec(e.to_string()))
    }
}
