/// Errors raised while compiling a raw payload spec into its typed form.
///
/// Validation is strict: every block type has a closed set of allowed
/// keys, and anything unrecognised is rejected rather than ignored. Each
/// variant carries the spec path where the problem sits (`body[2].blocks`,
/// `meta.header[0]`, …) so a broken spec file is findable without a
/// debugger.
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    /// The spec text was not parseable JSON at all.
    #[error("payload spec is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A value had the wrong JSON type (or an out-of-domain value).
    #[error("{at}: expected {expected}")]
    WrongType { at: String, expected: &'static str },

    /// A required key was absent.
    #[error("{at}: missing required key {key:?}")]
    MissingKey { at: String, key: &'static str },

    /// A key outside the block type's allowed set.
    #[error("{at}: unrecognised key {key:?}")]
    UnknownKey { at: String, key: String },

    /// The `type` tag named no known block type.
    #[error("{at}: unknown block type {found:?}")]
    UnknownBlockType { at: String, found: String },

    /// A closed-set option (`mode`, `approximation`) had an unknown value.
    #[error("{at}: unknown value {found:?}, expected {expected}")]
    UnknownValue {
        at: String,
        found: String,
        expected: &'static str,
    },

    /// A bit width outside the type's representable range.
    #[error("{at}: bits must be between 1 and {max}, got {bits}")]
    BitsOutOfRange { at: String, bits: u64, max: u64 },

    /// `meta.encode_version` was set without `meta.version_bits`.
    #[error("meta.encode_version is set but meta.version_bits is missing")]
    MissingVersionBits,

    /// `meta.version_bits` was given without `meta.encode_version`.
    #[error("meta.version_bits requires meta.encode_version = true")]
    StrayVersionBits,

    /// The spec version does not fit in the declared version prefix.
    #[error("version {version} does not fit in {bits} version bits")]
    VersionOverflow { version: u64, bits: usize },

    /// A `steps` array that is not strictly ascending.
    #[error("{at}: steps must be strictly ascending")]
    NonAscendingSteps { at: String },

    /// `steps_names` with the wrong entry count (must be steps + 1).
    #[error("{at}: steps_names must have {expected} entries, got {found}")]
    StepsNamesLength {
        at: String,
        expected: usize,
        found: usize,
    },

    /// A repeated entry in `categories`.
    #[error("{at}: duplicate category {value:?}")]
    DuplicateCategory { at: String, value: String },

    /// Two blocks in one blocklist sharing a key or alias.
    #[error("{at}: duplicate block key {key:?}")]
    DuplicateKey { at: String, key: String },

    /// A `custom_alphabeth` index outside the 6-bit range.
    #[error("{at}: custom_alphabeth index {index} is outside 0..=63")]
    AlphabetIndex { at: String, index: u64 },

    /// A `custom_alphabeth` entry that is not a single character.
    #[error("{at}: custom_alphabeth entries must be single characters, got {found:?}")]
    AlphabetChar { at: String, found: String },

    /// A float block whose `upper` bound does not exceed `lower`.
    #[error("{at}: float upper bound must be greater than lower bound")]
    EmptyRange { at: String },

    /// Version-dispatched decoding found no spec for the wire version.
    #[error("no payload spec in the pool has version {version}")]
    UnknownVersion { version: u64 },
}
