//! Per-type bits → value codecs, the exact inverses of the encoder's
//! block functions for every representable value.
//!
//! Codes that a well-formed encoder never emits (reserved steps and
//! category slots) decode to the literal `"error"` rather than failing —
//! the message frame is intact, only the value is unrepresentable.

use serde_json::{Map, Value};
use spos_types::block::{Block, BlockKind, STRING_CHAR_BITS};
use spos_types::{alphabet, code_width};
use spos_wire::{BitReader, Message, MessageFormat};

use crate::error::DecodeError;

/// Decode one value-bearing block from the reader.
///
/// # Errors
///
/// [`DecodeError::Wire`] on truncation, [`DecodeError::ValueOutOfRange`]
/// when a decoded number has no JSON representation.
pub fn decode_value(reader: &mut BitReader<'_>, block: &Block) -> Result<Value, DecodeError> {
    match &block.kind {
        // Handled by the assembler; nothing to produce here.
        BlockKind::Static | BlockKind::Pad { .. } => Ok(Value::Null),

        BlockKind::Boolean => Ok(Value::Bool(reader.read(1)? == 1)),

        BlockKind::Binary { bits } => {
            let raw = reader.read_raw(*bits)?;
            Ok(Value::String(
                Message::render(&raw, MessageFormat::Bin).to_string(),
            ))
        }

        BlockKind::Integer { bits, offset, .. } => {
            let raw = reader.read(*bits)?;
            number_from_i128(i128::from(raw) + i128::from(*offset), &block.key)
        }

        BlockKind::Float {
            bits, lower, upper, ..
        } => {
            #[allow(clippy::cast_precision_loss)]
            let scale = (1u64 << (bits - 1)) as f64;
            #[allow(clippy::cast_precision_loss)]
            let index = reader.read(*bits)? as f64;
            let x = lower + index / scale * (upper - lower);
            let number =
                serde_json::Number::from_f64(x).ok_or_else(|| DecodeError::ValueOutOfRange {
                    key: block.key.clone(),
                })?;
            Ok(Value::Number(number))
        }

        BlockKind::Str { length, alphabet } => {
            let table = alphabet::table(alphabet.as_ref());
            let mut text = String::with_capacity(*length);
            for _ in 0..*length {
                let index = reader.read(STRING_CHAR_BITS)? as usize;
                text.push(table[index]);
            }
            Ok(Value::String(text))
        }

        BlockKind::Steps { names, .. } => {
            let width = code_width(names.len() + 1);
            let index = reader.read(width)? as usize;
            let name = names.get(index).map_or("error", String::as_str);
            Ok(Value::String(name.to_string()))
        }

        BlockKind::Categories { categories, error } => {
            let width = code_width(categories.len() + 2);
            let index = reader.read(width)? as usize;
            let name = if index < categories.len() {
                categories[index].clone()
            } else if index == categories.len() {
                // The encoder's catch-all code.
                error.clone().unwrap_or_else(|| "error".to_string())
            } else {
                "error".to_string()
            };
            Ok(Value::String(name))
        }

        BlockKind::Array {
            length,
            fixed,
            item,
        } => {
            let count = if *fixed {
                *length
            } else {
                let prefix = code_width(*length + 1);
                reader.read(prefix)? as usize
            };
            let mut elements = Vec::with_capacity(count.min(*length));
            for _ in 0..count {
                elements.push(decode_value(reader, item)?);
            }
            Ok(Value::Array(elements))
        }

        BlockKind::Object { blocklist } => {
            let mut object = Value::Object(Map::new());
            for inner in blocklist {
                match &inner.kind {
                    BlockKind::Pad { bits } => reader.skip(*bits)?,
                    _ => {
                        let value = decode_value(reader, inner)?;
                        spos_types::keypath::set(&mut object, inner.output_key(), value);
                    }
                }
            }
            Ok(object)
        }
    }
}

fn number_from_i128(n: i128, key: &str) -> Result<Value, DecodeError> {
    if let Ok(v) = i64::try_from(n) {
        return Ok(Value::from(v));
    }
    if let Ok(v) = u64::try_from(n) {
        return Ok(Value::from(v));
    }
    Err(DecodeError::ValueOutOfRange {
        key: key.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use spos_types::PayloadSpec;
    use spos_wire::BitString;

    fn bits_of(digits: &str) -> BitString {
        let mut bits = BitString::new();
        for ch in digits.chars() {
            bits.push(ch == '1');
        }
        bits
    }

    fn only_block(raw: Value) -> Block {
        let spec = PayloadSpec::from_json(&json!({
            "name": "t", "version": 1, "body": [raw],
        }))
        .unwrap();
        spec.body.into_iter().next().unwrap()
    }

    #[test]
    fn binary_decodes_to_full_width_literal() {
        let block = only_block(json!({"type": "binary", "key": "b", "bits": 6}));
        let bits = bits_of("000101");
        let mut r = BitReader::new(&bits);
        assert_eq!(decode_value(&mut r, &block).unwrap(), json!("0b000101"));
    }

    #[test]
    fn integer_adds_offset_back() {
        let block = only_block(json!({"type": "integer", "key": "i", "bits": 4, "offset": 100}));
        let bits = bits_of("0011");
        let mut r = BitReader::new(&bits);
        assert_eq!(decode_value(&mut r, &block).unwrap(), json!(103));
    }

    #[test]
    fn float_inverts_the_quantisation() {
        let block = only_block(json!({"type": "float", "key": "f", "bits": 6}));
        let bits = bits_of("010011");
        let mut r = BitReader::new(&bits);
        assert_eq!(decode_value(&mut r, &block).unwrap(), json!(0.59375));
    }

    #[test]
    fn string_decodes_through_the_table() {
        let block = only_block(json!({"type": "string", "key": "s", "length": 4}));
        let bits = bits_of("000000011010101011111111");
        let mut r = BitReader::new(&bits);
        // indexes 0, 26, 43, 63 → 'A', 'a', 'r', '/'
        assert_eq!(decode_value(&mut r, &block).unwrap(), json!("Aar/"));
    }

    #[test]
    fn steps_reserved_code_decodes_to_error() {
        let block = only_block(json!({
            "type": "steps", "key": "s",
            "steps": [0.1, 0.6, 0.95],
            "steps_names": ["critical", "low", "discharging", "charged"],
        }));
        let bits = bits_of("001111");
        let mut r = BitReader::new(&bits);
        assert_eq!(decode_value(&mut r, &block).unwrap(), json!("low"));
        // Remaining codes (here 7) are past the bucket list.
        assert_eq!(decode_value(&mut r, &block).unwrap(), json!("error"));
    }

    #[test]
    fn categories_decode_including_catch_all() {
        let block = only_block(json!({
            "type": "categories", "key": "c",
            "categories": ["red", "green", "blue", "iridescent"],
            "error": "unknown",
        }));
        let bits = bits_of("001100101");
        let mut r = BitReader::new(&bits);
        assert_eq!(decode_value(&mut r, &block).unwrap(), json!("green"));
        assert_eq!(decode_value(&mut r, &block).unwrap(), json!("unknown"));
        assert_eq!(decode_value(&mut r, &block).unwrap(), json!("error"));
    }

    #[test]
    fn fixed_array_reads_no_prefix() {
        let block = only_block(json!({
            "type": "array", "key": "xs", "length": 2, "fixed": true,
            "blocks": {"type": "boolean"},
        }));
        let bits = bits_of("10");
        let mut r = BitReader::new(&bits);
        assert_eq!(decode_value(&mut r, &block).unwrap(), json!([true, false]));
    }
}
