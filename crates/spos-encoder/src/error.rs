use spos_wire::WireError;

/// Errors raised while encoding payload data against a compiled spec.
///
/// Saturation is *not* here: out-of-range integers and floats clamp by
/// design. These are the hard failures — values that cannot be coerced
/// into a block's input domain at all, or that exceed a non-saturating
/// limit (dynamic array capacity, unknown category with no catch-all).
///
/// ```text
///   EncodeError
///   ├── MissingValue     ← key absent and block has no static value
///   ├── WrongType        ← value not coercible to the block's domain
///   ├── NonFinite        ← NaN/∞ into a float block
///   ├── UnknownCategory  ← no match and no `error` catch-all
///   ├── ArrayTooLong     ← dynamic array over capacity
///   ├── ArrayLength      ← fixed array with the wrong element count
///   └── Wire(WireError)  ← malformed binary literal, width misuse
/// ```
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("no value for key {key:?} and the block declares no static value")]
    MissingValue { key: String },

    #[error("value for key {key:?} is not {expected}")]
    WrongType { key: String, expected: &'static str },

    #[error("value for key {key:?} is not a finite number")]
    NonFinite { key: String },

    #[error("value {value:?} for key {key:?} is not a known category")]
    UnknownCategory { key: String, value: String },

    #[error("array {key:?} has {len} elements, capacity is {max}")]
    ArrayTooLong { key: String, max: usize, len: usize },

    #[error("fixed array {key:?} has {len} elements, expected exactly {expected}")]
    ArrayLength {
        key: String,
        expected: usize,
        len: usize,
    },

    #[error(transparent)]
    Wire(#[from] WireError),
}
