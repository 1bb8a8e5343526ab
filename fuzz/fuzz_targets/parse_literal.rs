#![no_main]

use libfuzzer_sys::fuzz_target;
use spos_wire::Message;

// Literal parsing and normalisation must never panic, whatever the text.
fuzz_target!(|text: &str| {
    if let Ok(message) = Message::from_literal(text) {
        let _ = message.bits();
    }
});
