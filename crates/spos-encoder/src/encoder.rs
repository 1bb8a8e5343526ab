use serde_json::Value;
use spos_types::block::{Block, BlockKind};
use spos_types::{PayloadSpec, keypath};
use spos_wire::{BitString, BitWriter, Message, MessageFormat, crc8};

use crate::blocks;
use crate::error::EncodeError;

/// Encode payload data against a compiled spec, rendered in the
/// requested external representation.
///
/// The message is assembled in wire order:
///
/// ```text
/// ┌───────────────────┬──────────────────────────────────────────┐
/// │ [version_bits]    │ version prefix (when meta requests one)  │
/// │ [header bits]     │ non-static header blocks, declared order │
/// │ [body bits]       │ body blocks, declared order              │
/// │ [pad + 8 bits]    │ CRC-8 trailer (when meta requests one),  │
/// │                   │ over the byte-padded preceding bits      │
/// └───────────────────┴──────────────────────────────────────────┘
/// ```
///
/// # Errors
///
/// Any [`EncodeError`]: missing keys, uncoercible values, over-capacity
/// arrays, unknown categories without a catch-all.
pub fn encode(
    data: &Value,
    spec: &PayloadSpec,
    format: MessageFormat,
) -> Result<Message, EncodeError> {
    Ok(Message::render(&encode_bits(data, spec)?, format))
}

/// Encode to the internal bit stream (no external representation).
///
/// # Errors
///
/// As [`encode`].
pub fn encode_bits(data: &Value, spec: &PayloadSpec) -> Result<BitString, EncodeError> {
    let mut writer = BitWriter::new();

    if let Some(bits) = spec.meta.version_bits {
        writer.push(spec.version, bits)?;
    }
    for block in spec.meta.header.iter().chain(&spec.body) {
        encode_block(&mut writer, block, data)?;
    }
    if spec.meta.crc8 {
        writer.pad_to_byte();
        let crc = crc8::checksum_bits(writer.bits());
        writer.push(u64::from(crc), 8)?;
    }

    Ok(writer.finish())
}

/// Encode one declared block: resolve its value, then emit its bits.
///
/// Static blocks emit nothing (their value is spec-side only) and pad
/// blocks emit zeros without consulting the payload at all.
fn encode_block(writer: &mut BitWriter, block: &Block, data: &Value) -> Result<(), EncodeError> {
    match &block.kind {
        BlockKind::Static => Ok(()),
        BlockKind::Pad { bits } => {
            blocks::pad(writer, *bits);
            Ok(())
        }
        _ => {
            let value = resolve(block, data)?;
            encode_value(writer, block, value, &block.key)
        }
    }
}

/// The value a block encodes: its static override when present,
/// otherwise the payload entry at its key.
fn resolve<'a>(block: &'a Block, data: &'a Value) -> Result<&'a Value, EncodeError> {
    if let Some(value) = &block.value {
        return Ok(value);
    }
    keypath::get(data, &block.key).ok_or_else(|| EncodeError::MissingValue {
        key: block.key.clone(),
    })
}

/// Emit the bits for one value. `key` is the payload path used in error
/// context — array elements report under their array's key.
fn encode_value(
    writer: &mut BitWriter,
    block: &Block,
    value: &Value,
    key: &str,
) -> Result<(), EncodeError> {
    match &block.kind {
        // Handled by encode_block; an array item of these kinds emits nothing.
        BlockKind::Static => Ok(()),
        BlockKind::Pad { bits } => {
            blocks::pad(writer, *bits);
            Ok(())
        }

        BlockKind::Boolean => blocks::boolean(writer, value, key),
        BlockKind::Binary { bits } => blocks::binary(writer, *bits, value, key),
        BlockKind::Integer { bits, offset, mode } => {
            blocks::integer(writer, *bits, *offset, *mode, value, key)
        }
        BlockKind::Float {
            bits,
            lower,
            upper,
            approximation,
        } => blocks::float(writer, *bits, *lower, *upper, *approximation, value, key),
        BlockKind::Str { length, alphabet } => {
            blocks::string(writer, *length, alphabet.as_ref(), value, key)
        }
        BlockKind::Steps { steps, names } => blocks::steps(writer, steps, names, value, key),
        BlockKind::Categories { categories, error } => {
            blocks::categories(writer, categories, error.as_deref(), value, key)
        }

        BlockKind::Array {
            length,
            fixed,
            item,
        } => {
            let elements = value.as_array().ok_or_else(|| EncodeError::WrongType {
                key: key.to_string(),
                expected: "an array",
            })?;
            if *fixed {
                if elements.len() != *length {
                    return Err(EncodeError::ArrayLength {
                        key: key.to_string(),
                        expected: *length,
                        len: elements.len(),
                    });
                }
            } else {
                if elements.len() > *length {
                    return Err(EncodeError::ArrayTooLong {
                        key: key.to_string(),
                        max: *length,
                        len: elements.len(),
                    });
                }
                let prefix = spos_types::code_width(*length + 1);
                writer.push(elements.len() as u64, prefix)?;
            }
            for element in elements {
                encode_value(writer, item, element, key)?;
            }
            Ok(())
        }

        BlockKind::Object { blocklist } => {
            if !value.is_object() {
                return Err(EncodeError::WrongType {
                    key: key.to_string(),
                    expected: "an object",
                });
            }
            for inner in blocklist {
                encode_block(writer, inner, value)?;
            }
            Ok(())
        }
    }
}
