#![warn(clippy::pedantic)]

//! Random payload generation.
//!
//! `random_payloads` produces a valid random input for a spec together
//! with its encoding — the quickest way to exercise a freshly written
//! spec end-to-end, and the backing for the CLI's `-r`/`-I` modes. The
//! caller supplies the [`Rng`] so tests can seed for reproducibility.

use rand::{Rng, RngExt};
use serde_json::{Map, Value};
use spos_encoder::EncodeError;
use spos_types::block::{Block, BlockKind};
use spos_types::{PayloadSpec, keypath};
use spos_wire::{Message, MessageFormat};

/// Generate a valid random payload and its encoded message.
///
/// # Errors
///
/// [`EncodeError`] if the generated payload fails to encode — with a
/// compiled spec that indicates a bug, not bad luck.
pub fn random_payloads<R: Rng + ?Sized>(
    spec: &PayloadSpec,
    format: MessageFormat,
    rng: &mut R,
) -> Result<(Message, Value), EncodeError> {
    let data = random_payload_data(spec, rng);
    let message = spos_encoder::encode(&data, spec, format)?;
    Ok((message, data))
}

/// Generate just the payload object: one entry per value-bearing block
/// (header and body), skipping statics, pads, and blocks with a spec-side
/// value override.
pub fn random_payload_data<R: Rng + ?Sized>(spec: &PayloadSpec, rng: &mut R) -> Value {
    let mut data = Value::Object(Map::new());
    for block in spec.meta.header.iter().chain(&spec.body) {
        fill(block, &mut data, rng);
    }
    data
}

fn fill<R: Rng + ?Sized>(block: &Block, out: &mut Value, rng: &mut R) {
    if block.value.is_some() {
        // Overridden at encode time; payload data would be ignored.
        return;
    }
    if matches!(block.kind, BlockKind::Static | BlockKind::Pad { .. }) {
        return;
    }
    let value = random_value(&block.kind, rng);
    keypath::set(out, &block.key, value);
}

fn random_value<R: Rng + ?Sized>(kind: &BlockKind, rng: &mut R) -> Value {
    match kind {
        BlockKind::Static | BlockKind::Pad { .. } => Value::Null,

        BlockKind::Boolean => Value::Bool(rng.random_bool(0.5)),

        BlockKind::Binary { bits } => {
            let mut literal = String::with_capacity(2 + bits);
            literal.push_str("0b");
            for _ in 0..*bits {
                literal.push(if rng.random_bool(0.5) { '1' } else { '0' });
            }
            Value::String(literal)
        }

        BlockKind::Integer { bits, offset, .. } => {
            let max = if *bits == 64 {
                u64::MAX
            } else {
                (1u64 << bits) - 1
            };
            let raw = i128::from(rng.random_range(0..=max)) + i128::from(*offset);
            i64::try_from(raw)
                .map(Value::from)
                .or_else(|_| u64::try_from(raw).map(Value::from))
                .unwrap_or_else(|_| Value::from(*offset))
        }

        BlockKind::Float { lower, upper, .. } => {
            Value::from(lower + rng.random::<f64>() * (upper - lower))
        }

        BlockKind::Str { length, alphabet } => {
            let table = spos_types::alphabet::table(alphabet.as_ref());
            let text: String = (0..*length)
                .map(|_| table[rng.random_range(0..table.len())])
                .collect();
            Value::String(text)
        }

        BlockKind::Steps { steps, .. } => {
            // Straddle the whole bucket range, outermost buckets included.
            let lower = steps[0] - 1.0;
            let upper = steps[steps.len() - 1] + 1.0;
            Value::from(lower + rng.random::<f64>() * (upper - lower))
        }

        BlockKind::Categories { categories, .. } => {
            Value::String(categories[rng.random_range(0..categories.len())].clone())
        }

        BlockKind::Array {
            length,
            fixed,
            item,
        } => {
            let count = if *fixed {
                *length
            } else {
                rng.random_range(0..=*length)
            };
            Value::Array((0..count).map(|_| random_value(&item.kind, rng)).collect())
        }

        BlockKind::Object { blocklist } => {
            let mut object = Value::Object(Map::new());
            for inner in blocklist {
                fill(inner, &mut object, rng);
            }
            object
        }
    }
}
