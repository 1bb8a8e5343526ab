use std::collections::BTreeMap;

use serde_json::Value;

/// Wire width of one string-block character.
pub const STRING_CHAR_BITS: usize = 6;

/// Saturation behaviour for integer blocks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IntegerMode {
    /// Out-of-range values clamp to the nearest representable endpoint.
    #[default]
    Truncate,
    /// Values reduce modulo `2^bits` (Euclidean, always non-negative).
    Remainder,
}

/// Quantisation rounding for float blocks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Approximation {
    /// Nearest level, ties to even.
    #[default]
    Round,
    Floor,
    Ceil,
}

/// One validated schema element: a slice of the bit stream plus how to
/// resolve its value.
///
/// `key` is the dot-path into the payload object; `alias` renames the
/// output on decode; `value` is the static override (used unconditionally
/// on encode, surfaced as-is for header blocks with no type). The typed
/// parameters live in [`BlockKind`] — codecs dispatch on the tag, never
/// on key presence.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub key: String,
    pub alias: Option<String>,
    pub value: Option<Value>,
    pub kind: BlockKind,
}

/// The block type catalogue.
///
/// Each variant owns its parameters after validation, defaults already
/// substituted, so the codecs never re-derive anything from raw JSON.
///
/// ```text
/// ┌────────────┬──────────────────────────────────────────────┐
/// │ Variant    │ Wire width (bits)                            │
/// ├────────────┼──────────────────────────────────────────────┤
/// │ Static     │ 0 (spec-side value only)                     │
/// │ Boolean    │ 1                                            │
/// │ Binary     │ bits                                         │
/// │ Integer    │ bits                                         │
/// │ Float      │ bits                                         │
/// │ Pad        │ bits (all zero)                              │
/// │ Str        │ 6 · length                                   │
/// │ Steps      │ ⌈log₂(buckets + 1)⌉, buckets = steps + 1     │
/// │ Categories │ ⌈log₂(categories + 2)⌉                       │
/// │ Array      │ fixed: length · item                         │
/// │            │ dynamic: ⌈log₂(length + 1)⌉ + count · item   │
/// │ Object     │ sum of the blocklist                         │
/// └────────────┴──────────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum BlockKind {
    /// Header-only block with a spec-side value and no wire bits.
    Static,
    Boolean,
    Binary {
        bits: usize,
    },
    Integer {
        bits: usize,
        offset: i64,
        mode: IntegerMode,
    },
    Float {
        bits: usize,
        lower: f64,
        upper: f64,
        approximation: Approximation,
    },
    Pad {
        bits: usize,
    },
    Str {
        length: usize,
        alphabet: Option<BTreeMap<u8, char>>,
    },
    Steps {
        /// Strictly ascending thresholds.
        steps: Vec<f64>,
        /// One name per bucket (`steps.len() + 1` entries), synthesised
        /// during validation when the spec gives none.
        names: Vec<String>,
    },
    Categories {
        categories: Vec<String>,
        /// Catch-all name for unknown values; without it an unknown
        /// value is an encode error.
        error: Option<String>,
    },
    Array {
        /// Maximum (dynamic) or exact (fixed) element count.
        length: usize,
        fixed: bool,
        item: Box<Block>,
    },
    Object {
        blocklist: Vec<Block>,
    },
}

/// Smallest width able to carry `codes` distinct values.
///
/// | codes | width |
/// |-------|-------|
/// | 2     | 1     |
/// | 4     | 2     |
/// | 5     | 3     |
/// | 6     | 3     |
#[must_use]
pub fn code_width(codes: usize) -> usize {
    let codes = codes.max(2);
    (usize::BITS - (codes - 1).leading_zeros()) as usize
}

impl Block {
    /// Name this block decodes under: the alias when present, else the key.
    #[must_use]
    pub fn output_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.key)
    }

    /// Wire width in bits, or `None` when it depends on the value
    /// (dynamic arrays and anything containing one).
    #[must_use]
    pub fn width(&self) -> Option<usize> {
        match &self.kind {
            BlockKind::Static => Some(0),
            BlockKind::Boolean => Some(1),
            BlockKind::Binary { bits }
            | BlockKind::Integer { bits, .. }
            | BlockKind::Float { bits, .. }
            | BlockKind::Pad { bits } => Some(*bits),
            BlockKind::Str { length, .. } => Some(STRING_CHAR_BITS * length),
            BlockKind::Steps { names, .. } => Some(code_width(names.len() + 1)),
            BlockKind::Categories { categories, .. } => Some(code_width(categories.len() + 2)),
            BlockKind::Array {
                length,
                fixed: true,
                item,
            } => item.width().map(|w| w * length),
            BlockKind::Array { .. } => None,
            BlockKind::Object { blocklist } => blocklist.iter().map(Block::width).sum(),
        }
    }
}

impl BlockKind {
    /// The spec-facing type tag.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Boolean => "boolean",
            Self::Binary { .. } => "binary",
            Self::Integer { .. } => "integer",
            Self::Float { .. } => "float",
            Self::Pad { .. } => "pad",
            Self::Str { .. } => "string",
            Self::Steps { .. } => "steps",
            Self::Categories { .. } => "categories",
            Self::Array { .. } => "array",
            Self::Object { .. } => "object",
        }
    }
}
