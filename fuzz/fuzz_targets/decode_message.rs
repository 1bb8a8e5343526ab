#![no_main]

use std::sync::LazyLock;

use libfuzzer_sys::fuzz_target;
use spos_types::PayloadSpec;
use spos_wire::Message;

// A spec touching every block type, CRC and version prefix included.
static SPEC: LazyLock<PayloadSpec> = LazyLock::new(|| {
    PayloadSpec::from_json(&serde_json::json!({
        "name": "fuzz", "version": 3,
        "meta": {
            "encode_version": true, "version_bits": 2, "crc8": true,
            "header": [{"type": "integer", "key": "id", "bits": 4}],
        },
        "body": [
            {"type": "boolean", "key": "on"},
            {"type": "integer", "key": "n", "bits": 11, "offset": -4},
            {"type": "float", "key": "x", "bits": 9},
            {"type": "binary", "key": "raw", "bits": 13},
            {"type": "string", "key": "s", "length": 3},
            {"type": "steps", "key": "lvl", "steps": [0.5]},
            {"type": "categories", "key": "c", "categories": ["a", "b", "c"]},
            {"type": "array", "key": "xs", "length": 7,
             "blocks": {"type": "integer", "bits": 3}},
            {"type": "pad", "key": "end", "bits": 5},
        ],
    }))
    .expect("fuzz spec is valid")
});

// Decoding arbitrary bytes may fail, but must never panic.
fuzz_target!(|data: &[u8]| {
    let _ = spos_decoder::decode(&Message::Bytes(data.to_vec()), &*SPEC);
});
