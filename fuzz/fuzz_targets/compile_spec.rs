#![no_main]

use libfuzzer_sys::fuzz_target;
use spos_types::PayloadSpec;

// Spec compilation rejects garbage with SpecError, never a panic.
fuzz_target!(|data: &[u8]| {
    if let Ok(raw) = serde_json::from_slice::<serde_json::Value>(data) {
        let _ = PayloadSpec::from_json(&raw);
    }
});
