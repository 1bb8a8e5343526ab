//! Implementation of `-d` (decode) mode.
//!
//! Reads a message from `-i`/stdin (a `0b`/`0x` literal, or raw bytes
//! with `-f bytes`) and writes the decoded payload as pretty JSON. One
//! `-p` spec decodes directly; several dispatch on the version prefix.
//! With `-m` the output wraps both parts: `{"meta": …, "body": …}`.

use anyhow::Result;
use serde_json::json;
use spos_decoder::Decoded;

use crate::{Cli, io};

pub fn run(cli: &Cli) -> Result<()> {
    let format = io::parse_format(&cli.format)?;
    let specs = io::load_specs(&cli.payload_specs)?;
    let message = io::read_message(cli.input.as_deref(), format)?;

    let Decoded { body, meta } = match specs.as_slice() {
        [spec] => spos_decoder::decode(&message, spec)?,
        pool => spos_decoder::decode_from_specs(&message, pool)?,
    };

    if cli.stats || cli.verbose {
        let bits = message.bits()?;
        eprintln!("meta: {meta}");
        eprintln!("message: {} bits ({} bytes)", bits.len(), bits.as_bytes().len());
    }

    let output = if cli.meta {
        json!({"meta": meta, "body": body})
    } else {
        body
    };
    io::write_text(cli.output.as_deref(), &serde_json::to_string_pretty(&output)?)
}
