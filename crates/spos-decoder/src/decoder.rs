use serde_json::{Map, Value};
use spos_types::block::{Block, BlockKind};
use spos_types::{PayloadSpec, keypath};
use spos_wire::{BitReader, BitString, Message, crc8};

use crate::blocks;
use crate::error::DecodeError;

/// The result of decoding a message.
///
/// `body` is the reconstructed payload object, keys in declaration order
/// (aliases applied). `meta` carries the spec identity plus every header
/// block's value, also in declaration order:
///
/// ```text
/// ┌─────────────────────────────────────────────────┐
/// │ Decoded                                         │
/// │   meta: { name, version, <header values…> }     │
/// │   body: { <body values…> }                      │
/// └─────────────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Decoded {
    pub body: Value,
    pub meta: Value,
}

/// Decode a message in any external representation against a spec.
///
/// # Errors
///
/// Any [`DecodeError`] — CRC mismatch, version mismatch, truncation,
/// malformed literal.
pub fn decode(message: &Message, spec: &PayloadSpec) -> Result<Decoded, DecodeError> {
    decode_bits(&message.bits()?, spec)
}

/// Decode an already-normalised bit stream.
///
/// Decoding proceeds in three stages:
///
///   1. **Integrity**: when the spec carries a CRC-8 trailer, the final
///      8 bits are checked against the byte-padded content *before*
///      anything is interpreted. A mismatch aborts with no partial
///      output.
///   2. **Framing**: the version prefix (when present) must equal the
///      spec's version.
///   3. **Blocks**: header then body blocks consume bits in declaration
///      order. Static header blocks consume nothing and surface their
///      spec-side value in `meta`.
///
/// # Errors
///
/// As [`decode`].
pub fn decode_bits(bits: &BitString, spec: &PayloadSpec) -> Result<Decoded, DecodeError> {
    let content;
    let bits = if spec.meta.crc8 {
        content = verify_crc(bits)?;
        &content
    } else {
        bits
    };

    let mut reader = BitReader::new(bits);
    if let Some(version_bits) = spec.meta.version_bits {
        let found = reader.read(version_bits)?;
        if found != spec.version {
            return Err(DecodeError::VersionMismatch {
                expected: spec.version,
                found,
            });
        }
    }

    // Direct inserts: spec names are opaque strings, not dot-paths.
    let mut identity = Map::new();
    identity.insert("name".to_string(), Value::String(spec.name.clone()));
    identity.insert("version".to_string(), Value::from(spec.version));
    let mut meta = Value::Object(identity);
    for block in &spec.meta.header {
        decode_block(&mut reader, block, &mut meta)?;
    }

    let mut body = Value::Object(Map::new());
    for block in &spec.body {
        decode_block(&mut reader, block, &mut body)?;
    }

    Ok(Decoded { body, meta })
}

/// Split off and verify the 8-bit CRC trailer, returning the content
/// region the rest of the decode runs over.
fn verify_crc(bits: &BitString) -> Result<BitString, DecodeError> {
    if bits.len() < 8 {
        return Err(spos_wire::WireError::TruncatedMessage {
            needed: 8,
            available: bits.len(),
        }
        .into());
    }
    let content = bits.prefix(bits.len() - 8);

    let mut trailer = BitReader::new(bits);
    trailer.skip(content.len())?;
    #[allow(clippy::cast_possible_truncation)]
    let found = trailer.read(8)? as u8;

    let expected = crc8::checksum_bits(&content);
    if found != expected {
        return Err(DecodeError::CrcMismatch { expected, found });
    }
    Ok(content)
}

/// Decode one declared block into `out` under its output key.
fn decode_block(
    reader: &mut BitReader<'_>,
    block: &Block,
    out: &mut Value,
) -> Result<(), DecodeError> {
    match &block.kind {
        BlockKind::Static => {
            let value = block.value.clone().unwrap_or(Value::Null);
            keypath::set(out, block.output_key(), value);
            Ok(())
        }
        BlockKind::Pad { bits } => {
            reader.skip(*bits)?;
            Ok(())
        }
        _ => {
            let value = blocks::decode_value(reader, block)?;
            keypath::set(out, block.output_key(), value);
            Ok(())
        }
    }
}
