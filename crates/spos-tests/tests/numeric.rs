//! Numeric laws: float quantisation error bounds and integer saturation.

use serde_json::json;
use spos_decoder::decode;
use spos_encoder::encode;
use spos_types::PayloadSpec;
use spos_wire::MessageFormat;

fn float_spec(bits: u32, lower: f64, upper: f64, approximation: &str) -> PayloadSpec {
    PayloadSpec::from_json(&json!({
        "name": "f", "version": 1,
        "body": [{"type": "float", "key": "x", "bits": bits,
                  "lower": lower, "upper": upper,
                  "approximation": approximation}],
    }))
    .unwrap()
}

fn quantise(x: f64, spec: &PayloadSpec) -> f64 {
    let message = encode(&json!({"x": x}), spec, MessageFormat::Bin).unwrap();
    decode(&message, spec).unwrap().body["x"].as_f64().unwrap()
}

// ── Float quantisation law ────────────────────────────────────────────────────

#[test]
fn round_error_is_bounded_by_the_level_spacing() {
    let (lower, upper) = (-1.0, 3.0);
    for bits in 1..=12u32 {
        let spec = float_spec(bits, lower, upper, "round");
        let bound = (upper - lower) / ((2f64.powi(bits as i32)) - 1.0);
        for i in 0..=100 {
            let x = lower + (upper - lower) * f64::from(i) / 100.0;
            let error = (quantise(x, &spec) - x).abs();
            assert!(
                error <= bound + 1e-12,
                "bits={bits} x={x}: error {error} exceeds {bound}"
            );
        }
    }
}

#[test]
fn floor_and_ceil_fix_the_error_sign() {
    let (lower, upper) = (0.0, 10.0);
    for bits in 2..=8u32 {
        let floor_spec = float_spec(bits, lower, upper, "floor");
        let ceil_spec = float_spec(bits, lower, upper, "ceil");
        for i in 0..=50 {
            let x = lower + (upper - lower) * f64::from(i) / 50.0;
            assert!(quantise(x, &floor_spec) <= x + 1e-12, "floor bits={bits} x={x}");
            assert!(quantise(x, &ceil_spec) >= x - 1e-12, "ceil bits={bits} x={x}");
        }
    }
}

#[test]
fn endpoints_are_exactly_representable() {
    for approximation in ["round", "floor", "ceil"] {
        let spec = float_spec(6, -2.5, 7.5, approximation);
        assert_eq!(quantise(-2.5, &spec), -2.5, "{approximation}");
        assert_eq!(quantise(7.5, &spec), 7.5, "{approximation}");
    }
}

#[test]
fn out_of_range_floats_saturate_to_the_endpoints() {
    let spec = float_spec(6, 0.0, 1.0, "round");
    assert_eq!(quantise(-5.0, &spec), 0.0);
    assert_eq!(quantise(42.0, &spec), 1.0);
}

// ── Integer saturation ────────────────────────────────────────────────────────

#[test]
fn truncate_saturates_at_both_ends() {
    let spec = PayloadSpec::from_json(&json!({
        "name": "i", "version": 1,
        "body": [{"type": "integer", "key": "n", "bits": 6, "offset": 100}],
    }))
    .unwrap();
    let read = |value: i64| {
        let message = encode(&json!({"n": value}), &spec, MessageFormat::Bin).unwrap();
        decode(&message, &spec).unwrap().body["n"].as_i64().unwrap()
    };

    // Range is [offset, offset + 2^bits - 1] = [100, 163].
    assert_eq!(read(99), 100);
    assert_eq!(read(-4), 100);
    assert_eq!(read(100), 100);
    assert_eq!(read(163), 163);
    assert_eq!(read(164), 163);
    assert_eq!(read(100_000), 163);
}

#[test]
fn remainder_wraps_instead_of_saturating() {
    let spec = PayloadSpec::from_json(&json!({
        "name": "i", "version": 1,
        "body": [{"type": "integer", "key": "n", "bits": 4, "mode": "remainder"}],
    }))
    .unwrap();
    let read = |value: i64| {
        let message = encode(&json!({"n": value}), &spec, MessageFormat::Bin).unwrap();
        decode(&message, &spec).unwrap().body["n"].as_i64().unwrap()
    };

    assert_eq!(read(16), 0);
    assert_eq!(read(300), 12);
    assert_eq!(read(-3), 13);
}

#[test]
fn full_width_integers_survive() {
    let spec = PayloadSpec::from_json(&json!({
        "name": "i", "version": 1,
        "body": [{"type": "integer", "key": "n", "bits": 64}],
    }))
    .unwrap();
    let data = json!({"n": u64::MAX});
    let message = encode(&data, &spec, MessageFormat::Bin).unwrap();
    let decoded = decode(&message, &spec).unwrap();
    assert_eq!(decoded.body["n"].as_u64(), Some(u64::MAX));
}
