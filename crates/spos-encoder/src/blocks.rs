//! Per-type value → bits codecs.
//!
//! Each function coerces one dynamic value into its block's input domain
//! and appends the block's bit group to the writer. Out-of-range numerics
//! saturate (that is documented behaviour, not an error); uncoercible
//! values and over-capacity inputs fail with [`EncodeError`].

use std::collections::BTreeMap;

use serde_json::Value;
use spos_types::block::STRING_CHAR_BITS;
use spos_types::{Approximation, IntegerMode, alphabet, code_width};
use spos_wire::{BitString, BitWriter, Message};

use crate::error::EncodeError;

/// Zero filler: `bits` zero bits, no value consulted.
pub fn pad(writer: &mut BitWriter, bits: usize) {
    let mut zeros = BitString::new();
    for _ in 0..bits {
        zeros.push(false);
    }
    writer.push_raw(&zeros);
}

/// Truthy coercion: JSON booleans directly, integers by `!= 0`.
pub fn boolean(writer: &mut BitWriter, value: &Value, key: &str) -> Result<(), EncodeError> {
    let bit = if let Some(b) = value.as_bool() {
        b
    } else if let Some(n) = value.as_i64() {
        n != 0
    } else if let Some(n) = value.as_u64() {
        n != 0
    } else {
        return Err(EncodeError::WrongType {
            key: key.to_string(),
            expected: "a boolean or an integer",
        });
    };
    writer.push(u64::from(bit), 1)?;
    Ok(())
}

/// `"0b…"` / `"0x…"` literal into exactly `bits` bits.
///
/// Hex digits expand to 4 bits each before the width rules apply.
/// Overlong input drops low-order bits; short input is left-padded
/// with zeros.
pub fn binary(
    writer: &mut BitWriter,
    bits: usize,
    value: &Value,
    key: &str,
) -> Result<(), EncodeError> {
    let text = value.as_str().ok_or_else(|| EncodeError::WrongType {
        key: key.to_string(),
        expected: "a \"0b\" or \"0x\" literal string",
    })?;
    let raw = Message::from_literal(text)?.bits()?;

    if raw.len() >= bits {
        // Keep the high-order bits: truncation drops from the low end.
        writer.push_raw(&raw.prefix(bits));
    } else {
        let mut padded = BitString::new();
        for _ in 0..bits - raw.len() {
            padded.push(false);
        }
        writer.push_raw(&padded);
        writer.push_raw(&raw);
    }
    Ok(())
}

/// Offset-shifted unsigned integer of `bits` width.
///
/// Arithmetic runs in `i128` so a 64-bit width with a non-zero offset
/// cannot overflow. `Truncate` saturates into `[0, 2^bits - 1]`;
/// `Remainder` reduces modulo `2^bits`, Euclidean.
pub fn integer(
    writer: &mut BitWriter,
    bits: usize,
    offset: i64,
    mode: IntegerMode,
    value: &Value,
    key: &str,
) -> Result<(), EncodeError> {
    let n = if let Some(n) = value.as_i64() {
        i128::from(n)
    } else if let Some(n) = value.as_u64() {
        i128::from(n)
    } else {
        return Err(EncodeError::WrongType {
            key: key.to_string(),
            expected: "an integer",
        });
    };

    let shifted = n - i128::from(offset);
    let modulus = 1i128 << bits;
    let encoded = match mode {
        IntegerMode::Truncate => shifted.clamp(0, modulus - 1),
        IntegerMode::Remainder => shifted.rem_euclid(modulus),
    };
    #[allow(clippy::cast_sign_loss)]
    writer.push(encoded as u64, bits)?;
    Ok(())
}

/// Linear quantisation over `[lower, upper]` with a power-of-two step.
///
/// With `s = 2^(bits-1)` levels per unit range, the level index is
/// `approx((x - lower)/(upper - lower) · s)`, saturated into `[0, s]`,
/// so both endpoints are exactly representable. `Round` ties go to even.
pub fn float(
    writer: &mut BitWriter,
    bits: usize,
    lower: f64,
    upper: f64,
    approximation: Approximation,
    value: &Value,
    key: &str,
) -> Result<(), EncodeError> {
    let x = value.as_f64().ok_or_else(|| EncodeError::WrongType {
        key: key.to_string(),
        expected: "a number",
    })?;
    if !x.is_finite() {
        return Err(EncodeError::NonFinite {
            key: key.to_string(),
        });
    }

    #[allow(clippy::cast_precision_loss)]
    let scale = (1u64 << (bits - 1)) as f64;
    let level = (x - lower) / (upper - lower) * scale;
    let level = match approximation {
        Approximation::Round => level.round_ties_even(),
        Approximation::Floor => level.floor(),
        Approximation::Ceil => level.ceil(),
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    writer.push(level.clamp(0.0, scale) as u64, bits)?;
    Ok(())
}

/// Six bits per character through the (possibly customised) base-64
/// table. Overlong input is right-trimmed; short input right-pads with
/// the `'/'` index.
pub fn string(
    writer: &mut BitWriter,
    length: usize,
    custom: Option<&BTreeMap<u8, char>>,
    value: &Value,
    key: &str,
) -> Result<(), EncodeError> {
    let text = value.as_str().ok_or_else(|| EncodeError::WrongType {
        key: key.to_string(),
        expected: "a string",
    })?;
    let table = alphabet::table(custom);
    let mut chars = text.chars();
    for _ in 0..length {
        let index = match chars.next() {
            Some(ch) => alphabet::index_of(ch, &table),
            None => alphabet::UNMAPPED,
        };
        writer.push(index, STRING_CHAR_BITS)?;
    }
    Ok(())
}

/// Bucket index: the number of thresholds at or below the value, so
/// bucket `i` covers `[steps[i-1], steps[i])` with open ends outward.
pub fn steps(
    writer: &mut BitWriter,
    thresholds: &[f64],
    names: &[String],
    value: &Value,
    key: &str,
) -> Result<(), EncodeError> {
    let x = value.as_f64().ok_or_else(|| EncodeError::WrongType {
        key: key.to_string(),
        expected: "a number",
    })?;
    let bucket = thresholds.iter().filter(|threshold| x >= **threshold).count();
    writer.push(bucket as u64, code_width(names.len() + 1))?;
    Ok(())
}

/// Category index, or the reserved catch-all code when the value is
/// unknown and the block declares an `error` name.
pub fn categories(
    writer: &mut BitWriter,
    categories: &[String],
    error: Option<&str>,
    value: &Value,
    key: &str,
) -> Result<(), EncodeError> {
    let text = value.as_str().ok_or_else(|| EncodeError::WrongType {
        key: key.to_string(),
        expected: "a string",
    })?;
    let index = match categories.iter().position(|c| c == text) {
        Some(index) => index,
        None if error.is_some() => categories.len(),
        None => {
            return Err(EncodeError::UnknownCategory {
                key: key.to_string(),
                value: text.to_string(),
            });
        }
    };
    writer.push(index as u64, code_width(categories.len() + 2))?;
    Ok(())
}
