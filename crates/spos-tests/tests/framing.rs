//! Frame-level properties: width determinism, CRC soundness, and
//! version routing.

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;
use spos_decoder::{DecodeError, decode, decode_from_specs};
use spos_encoder::encode;
use spos_tests::fixtures;
use spos_types::{PayloadSpec, SpecError, code_width};
use spos_wire::{Message, MessageFormat};

// ── Width determinism ─────────────────────────────────────────────────────────

#[test]
fn fixed_specs_encode_to_their_declared_width() {
    let spec = fixtures::sensor_spec();
    let declared = spec.fixed_width().expect("sensor spec is fixed-width");

    // Any valid payload must produce exactly the declared width.
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..50 {
        let (message, _) = spos_gen::random_payloads(&spec, MessageFormat::Bin, &mut rng).unwrap();
        assert_eq!(message.bits().unwrap().len(), declared);
    }
    let message = encode(&fixtures::sensor_data(), &spec, MessageFormat::Bin).unwrap();
    assert_eq!(message.bits().unwrap().len(), declared);
}

#[test]
fn dynamic_array_width_follows_the_count() {
    let spec = PayloadSpec::from_json(&json!({
        "name": "list", "version": 1,
        "body": [{"type": "array", "key": "xs", "length": 6,
                  "blocks": {"type": "integer", "bits": 5}}],
    }))
    .unwrap();
    assert_eq!(spec.fixed_width(), None);

    let prefix = code_width(6 + 1);
    for count in 0..=6 {
        let xs: Vec<u64> = (0..count).collect();
        let message = encode(&json!({"xs": xs}), &spec, MessageFormat::Bin).unwrap();
        assert_eq!(
            message.bits().unwrap().len(),
            prefix + 5 * count as usize,
            "count {count}"
        );
    }
}

// ── CRC soundness ─────────────────────────────────────────────────────────────

#[test]
fn every_single_bit_flip_is_caught() {
    let spec = fixtures::sensor_spec();
    let message = encode(&fixtures::sensor_data(), &spec, MessageFormat::Bin).unwrap();
    let clean = message.bits().unwrap();
    assert!(decode(&message, &spec).is_ok());

    for position in 0..clean.len() {
        let mut corrupt = clean.clone();
        corrupt.flip(position);
        let err = decode(&Message::render(&corrupt, MessageFormat::Bin), &spec).unwrap_err();
        assert!(
            matches!(err, DecodeError::CrcMismatch { .. }),
            "flip at bit {position} gave {err:?}"
        );
    }
}

#[test]
fn crc_failure_precedes_version_checking() {
    // Corrupt the version prefix itself: the CRC must reject the message
    // before the prefix is ever compared.
    let spec = fixtures::telemetry_pool().remove(2);
    let message = encode(
        &json!({"reading": 100, "calibrated": true}),
        &spec,
        MessageFormat::Bin,
    )
    .unwrap();
    let mut corrupt = message.bits().unwrap();
    corrupt.flip(0);
    let err = decode(&Message::render(&corrupt, MessageFormat::Bin), &spec).unwrap_err();
    assert!(matches!(err, DecodeError::CrcMismatch { .. }));
}

// ── Version routing ───────────────────────────────────────────────────────────

#[test]
fn pool_decoding_matches_direct_decoding() {
    let pool = fixtures::telemetry_pool();
    let payloads = [
        json!({"reading": 200}),
        json!({"reading": 3000}),
        json!({"reading": 3000, "calibrated": false}),
    ];

    for (spec, data) in pool.iter().zip(&payloads) {
        let message = encode(data, spec, MessageFormat::Bin).unwrap();
        let via_pool = decode_from_specs(&message, &pool).unwrap();
        let direct = decode(&message, spec).unwrap();
        assert_eq!(via_pool, direct, "version {}", spec.version);
        assert_eq!(via_pool.meta["version"], json!(spec.version));
    }
}

#[test]
fn unrouteable_version_is_a_payload_spec_error() {
    let pool = fixtures::telemetry_pool();
    let outsider = PayloadSpec::from_json(&json!({
        "name": "telemetry", "version": 9,
        "meta": {"encode_version": true, "version_bits": 4},
        "body": [{"type": "integer", "key": "reading", "bits": 8}],
    }))
    .unwrap();
    let message = encode(&json!({"reading": 1}), &outsider, MessageFormat::Bin).unwrap();

    let err = decode_from_specs(&message, &pool).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::Spec(SpecError::UnknownVersion { version: 9 })
    ));
}
