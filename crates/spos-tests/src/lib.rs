#![warn(clippy::pedantic)]

//! Shared fixtures for the integration tests and benchmarks.

pub mod fixtures {
    use serde_json::{Value, json};
    use spos_types::PayloadSpec;

    /// The front-page example spec: a constant, a plain integer, and a
    /// quantised float.
    #[must_use]
    pub fn readme_spec() -> PayloadSpec {
        PayloadSpec::from_json(&json!({
            "name": "example payload",
            "version": 1,
            "body": [
                {"type": "integer", "key": "constant_data", "value": 2, "bits": 2},
                {"type": "integer", "key": "int_data", "bits": 6},
                {"type": "float", "key": "float_data", "bits": 6},
            ],
        }))
        .expect("fixture spec is valid")
    }

    /// Payload data matching [`readme_spec`].
    #[must_use]
    pub fn readme_data() -> Value {
        json!({"int_data": 13, "float_data": 0.6})
    }

    /// A fixed-width spec touching every block type except dynamic
    /// arrays, with a version prefix, a mixed header, and a CRC trailer.
    #[must_use]
    pub fn sensor_spec() -> PayloadSpec {
        PayloadSpec::from_json(&json!({
            "name": "sensor",
            "version": 2,
            "meta": {
                "encode_version": true,
                "version_bits": 4,
                "crc8": true,
                "header": [
                    {"key": "unit", "value": "celsius"},
                    {"type": "integer", "key": "sensor_id", "bits": 4},
                ],
            },
            "body": [
                {"type": "boolean", "key": "active"},
                {"type": "integer", "key": "count", "bits": 7, "offset": -10},
                {"type": "float", "key": "charge", "bits": 6},
                {"type": "binary", "key": "mask", "bits": 5},
                {"type": "string", "key": "tag", "length": 4},
                {"type": "steps", "key": "battery", "steps": [0.1, 0.6, 0.95],
                 "steps_names": ["critical", "low", "discharging", "charged"]},
                {"type": "categories", "key": "colour",
                 "categories": ["red", "green", "blue", "iridescent"],
                 "error": "unknown"},
                {"type": "array", "key": "samples", "length": 3, "fixed": true,
                 "blocks": {"type": "integer", "bits": 5}},
                {"type": "object", "key": "gps", "blocklist": [
                    {"type": "float", "key": "lat", "bits": 8, "lower": -90, "upper": 90},
                    {"type": "float", "key": "lon", "bits": 8, "lower": -180, "upper": 180},
                ]},
                {"type": "pad", "key": "reserved", "bits": 3},
            ],
        }))
        .expect("fixture spec is valid")
    }

    /// Payload data matching [`sensor_spec`].
    #[must_use]
    pub fn sensor_data() -> Value {
        json!({
            "sensor_id": 5,
            "active": true,
            "count": 42,
            "charge": 0.5,
            "mask": "0b10110",
            "tag": "Ab3",
            "battery": 0.7,
            "colour": "blue",
            "samples": [1, 2, 3],
            "gps": {"lat": 45.0, "lon": -90.0},
        })
    }

    /// A pool of version-dispatched specs sharing one name and prefix
    /// layout.
    #[must_use]
    pub fn telemetry_pool() -> Vec<PayloadSpec> {
        [
            json!({
                "name": "telemetry", "version": 0,
                "meta": {"encode_version": true, "version_bits": 4},
                "body": [{"type": "integer", "key": "reading", "bits": 8}],
            }),
            json!({
                "name": "telemetry", "version": 1,
                "meta": {"encode_version": true, "version_bits": 4},
                "body": [{"type": "integer", "key": "reading", "bits": 12}],
            }),
            json!({
                "name": "telemetry", "version": 2,
                "meta": {"encode_version": true, "version_bits": 4, "crc8": true},
                "body": [
                    {"type": "integer", "key": "reading", "bits": 12},
                    {"type": "boolean", "key": "calibrated"},
                ],
            }),
        ]
        .iter()
        .map(|raw| PayloadSpec::from_json(raw).expect("fixture spec is valid"))
        .collect()
    }
}
