//! Shared file/stdin/stdout plumbing for the command implementations.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use spos_types::PayloadSpec;
use spos_wire::{Message, MessageFormat};

/// Load and compile every `-p` spec file.
pub fn load_specs(paths: &[PathBuf]) -> Result<Vec<PayloadSpec>> {
    paths
        .iter()
        .map(|path| {
            let text = fs::read_to_string(path)
                .with_context(|| format!("cannot read {}", path.display()))?;
            text.parse::<PayloadSpec>()
                .with_context(|| format!("invalid payload spec {}", path.display()))
        })
        .collect()
}

/// Read the input as text (`-i` file or stdin).
pub fn read_text(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
        }
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("cannot read stdin")?;
            Ok(text)
        }
    }
}

/// Read the input as raw bytes (`-f bytes` messages).
pub fn read_bytes(input: Option<&Path>) -> Result<Vec<u8>> {
    match input {
        Some(path) => fs::read(path).with_context(|| format!("cannot read {}", path.display())),
        None => {
            let mut bytes = Vec::new();
            std::io::stdin()
                .read_to_end(&mut bytes)
                .context("cannot read stdin")?;
            Ok(bytes)
        }
    }
}

/// Read a message in the given format: a `0b`/`0x` literal for the text
/// formats, raw bytes otherwise.
pub fn read_message(input: Option<&Path>, format: MessageFormat) -> Result<Message> {
    match format {
        MessageFormat::Bytes => Ok(Message::Bytes(read_bytes(input)?)),
        MessageFormat::Bin | MessageFormat::Hex => {
            Ok(Message::from_literal(&read_text(input)?)?)
        }
    }
}

/// Write a text line to `-o` or stdout.
pub fn write_text(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => fs::write(path, format!("{text}\n"))
            .with_context(|| format!("cannot write {}", path.display())),
        None => {
            println!("{text}");
            Ok(())
        }
    }
}

/// Write a message: raw bytes for the bytes format, a literal line
/// otherwise.
pub fn write_message(output: Option<&Path>, message: &Message) -> Result<()> {
    match message {
        Message::Bytes(bytes) => match output {
            Some(path) => {
                fs::write(path, bytes).with_context(|| format!("cannot write {}", path.display()))
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(bytes).context("cannot write stdout")?;
                stdout.flush().context("cannot flush stdout")
            }
        },
        text => write_text(output, &text.to_string()),
    }
}

/// Parse the `-f` option.
pub fn parse_format(format: &str) -> Result<MessageFormat> {
    Ok(format.parse::<MessageFormat>()?)
}
