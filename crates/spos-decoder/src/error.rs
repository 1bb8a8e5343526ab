use spos_types::SpecError;
use spos_wire::WireError;

/// Errors raised while decoding a message against a compiled spec.
///
/// Decoding validates in stages: integrity (CRC trailer), framing
/// (version prefix), then block values. The CRC check runs first —
/// nothing of a corrupt message is interpreted.
///
/// ```text
///   DecodeError
///   ├── CrcMismatch            ← trailer does not match the content
///   ├── VersionMismatch        ← prefix differs from the spec version
///   ├── ValueOutOfRange        ← decoded number has no JSON representation
///   ├── Wire(WireError)        ← truncated message, bad literal digits
///   ├── Spec(SpecError)        ← version dispatch found no matching spec
///   └── Specs(SpecsVersionError) ← inconsistent spec pool
/// ```
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("crc-8 mismatch: computed {expected:#04x}, trailer carries {found:#04x}")]
    CrcMismatch { expected: u8, found: u8 },

    #[error("version prefix is {found}, spec expects {expected}")]
    VersionMismatch { expected: u64, found: u64 },

    #[error("decoded value for key {key:?} is not representable")]
    ValueOutOfRange { key: String },

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error(transparent)]
    Specs(#[from] SpecsVersionError),
}

/// Consistency failures of a version-dispatch spec pool.
///
/// `decode_from_specs` requires every spec in the pool to share a name
/// and an identical version prefix layout, with pairwise distinct
/// versions — otherwise the peeked prefix is meaningless.
#[derive(Debug, thiserror::Error)]
pub enum SpecsVersionError {
    #[error("the spec pool is empty")]
    EmptyPool,

    #[error("spec {name:?} does not encode a version prefix")]
    VersionNotEncoded { name: String },

    #[error("spec pool mixes names {first:?} and {other:?}")]
    MixedNames { first: String, other: String },

    #[error("spec pool mixes version prefix widths {first} and {other}")]
    MixedVersionBits { first: usize, other: usize },

    #[error("spec pool declares version {version} twice")]
    DuplicateVersion { version: u64 },
}
