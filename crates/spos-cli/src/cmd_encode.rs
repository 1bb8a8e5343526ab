//! Implementation of the default (encode) mode.
//!
//! Reads JSON payload data from `-i`/stdin, encodes it against the single
//! `-p` spec, and writes the message to `-o`/stdout in the `-f` format.

use anyhow::{Context, Result, bail};
use serde_json::Value;

use crate::{Cli, io};

pub fn run(cli: &Cli) -> Result<()> {
    let format = io::parse_format(&cli.format)?;
    let specs = io::load_specs(&cli.payload_specs)?;
    let [spec] = specs.as_slice() else {
        bail!("encoding uses exactly one payload spec, got {}", specs.len());
    };

    let text = io::read_text(cli.input.as_deref())?;
    let data: Value = serde_json::from_str(&text).context("payload data is not valid JSON")?;

    let message = spos_encoder::encode(&data, spec, format)?;

    if cli.stats || cli.verbose {
        let bits = message.bits()?;
        eprintln!("spec: {} v{}", spec.name, spec.version);
        eprintln!("message: {} bits ({} bytes)", bits.len(), bits.as_bytes().len());
    }
    io::write_message(cli.output.as_deref(), &message)
}
