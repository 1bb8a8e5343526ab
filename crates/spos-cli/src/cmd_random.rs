//! Implementation of `-r` / `-I` (random generation) modes.
//!
//! `-r` prints a random valid message for the spec; `-I` prints the
//! matching payload data as JSON instead. Useful for smoke-testing a
//! freshly written spec before any real sender exists.

use anyhow::{Result, bail};

use crate::{Cli, io};

pub fn run(cli: &Cli) -> Result<()> {
    let format = io::parse_format(&cli.format)?;
    let specs = io::load_specs(&cli.payload_specs)?;
    let [spec] = specs.as_slice() else {
        bail!(
            "random generation uses exactly one payload spec, got {}",
            specs.len()
        );
    };

    let mut rng = rand::rng();
    let (message, data) = spos_gen::random_payloads(spec, format, &mut rng)?;

    if cli.stats || cli.verbose {
        let bits = message.bits()?;
        eprintln!("spec: {} v{}", spec.name, spec.version);
        eprintln!("message: {} bits ({} bytes)", bits.len(), bits.as_bytes().len());
    }

    if cli.random_input {
        io::write_text(cli.output.as_deref(), &serde_json::to_string_pretty(&data)?)
    } else {
        io::write_message(cli.output.as_deref(), &message)
    }
}
