/// Errors raised by the bit-level layer.
///
/// Everything here is about raw bit streams and their external
/// representations — nothing schema-aware. Higher layers wrap these
/// (`EncodeError`, `DecodeError`) rather than re-reporting them.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The reader ran out of bits before a field could be completed.
    #[error("truncated message: needed {needed} bits, {available} remaining")]
    TruncatedMessage { needed: usize, available: usize },

    /// A message literal did not start with `0b` or `0x`.
    #[error("unknown message prefix in {found:?}: expected \"0b\" or \"0x\"")]
    UnknownPrefix { found: String },

    /// A message literal contained a character outside its digit set.
    ///
    /// `pos` is the character offset from the start of the literal,
    /// prefix included.
    #[error("invalid digit {ch:?} at position {pos}")]
    InvalidDigit { ch: char, pos: usize },

    /// A single bit group wider than 64 bits was requested.
    ///
    /// Integer-valued bit groups ride in a `u64`; arbitrary-width data
    /// takes the raw [`BitString`](crate::BitString) path instead.
    #[error("bit group of {width} bits exceeds the 64-bit limit")]
    WidthOverflow { width: usize },

    /// An output format name other than `bin`, `hex` or `bytes`.
    #[error("unknown message format {found:?}: expected bin, hex or bytes")]
    UnknownFormat { found: String },
}
