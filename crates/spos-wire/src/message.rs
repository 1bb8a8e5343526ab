use std::fmt;
use std::str::FromStr;

use crate::bitbuf::BitString;
use crate::error::WireError;

/// The three external message representations.
///
/// ```text
/// ┌───────┬───────────────────────┬──────────────────────────────┐
/// │ Name  │ Shape                 │ Padding                      │
/// ├───────┼───────────────────────┼──────────────────────────────┤
/// │ bin   │ "0b" + '0'/'1' digits │ none (bit-exact)             │
/// │ hex   │ "0x" + hex digits     │ right zeros to a nibble      │
/// │ bytes │ raw byte sequence     │ right zeros to a byte        │
/// └───────┴───────────────────────┴──────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageFormat {
    Bin,
    Hex,
    Bytes,
}

impl FromStr for MessageFormat {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bin" => Ok(Self::Bin),
            "hex" => Ok(Self::Hex),
            "bytes" => Ok(Self::Bytes),
            other => Err(WireError::UnknownFormat {
                found: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for MessageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bin => "bin",
            Self::Hex => "hex",
            Self::Bytes => "bytes",
        })
    }
}

/// An encoded message in one of the external representations.
///
/// A `Message` is what crosses the process boundary: the encoder renders
/// one from its internal [`BitString`], the decoder normalises one back.
/// Text representations keep their prefix (`0b…` / `0x…`) — the prefix is
/// part of the literal.
///
/// The padding applied by `hex` and `bytes` is harmless on decode: the
/// spec tells the decoder exactly how many bits to consume, so trailing
/// zero bits are never misread as payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Message {
    Bin(String),
    Hex(String),
    Bytes(Vec<u8>),
}

impl Message {
    /// Render a bit string in the requested representation.
    #[must_use]
    pub fn render(bits: &BitString, format: MessageFormat) -> Self {
        match format {
            MessageFormat::Bin => {
                let mut out = String::with_capacity(2 + bits.len());
                out.push_str("0b");
                for i in 0..bits.len() {
                    out.push(if bits.get(i) == Some(true) { '1' } else { '0' });
                }
                Self::Bin(out)
            }
            MessageFormat::Hex => {
                let n_nibbles = bits.len().div_ceil(4);
                let mut out = String::with_capacity(2 + n_nibbles);
                out.push_str("0x");
                for nibble in 0..n_nibbles {
                    let mut v = 0usize;
                    for bit in 0..4 {
                        let set = bits.get(nibble * 4 + bit) == Some(true);
                        v = (v << 1) | usize::from(set);
                    }
                    out.push(b"0123456789abcdef"[v] as char);
                }
                Self::Hex(out)
            }
            MessageFormat::Bytes => Self::Bytes(bits.as_bytes().to_vec()),
        }
    }

    /// Parse a text literal by its prefix.
    ///
    /// Surrounding whitespace is trimmed first, so literals read from a
    /// file or a pipe survive their trailing newline.
    ///
    /// # Errors
    ///
    /// [`WireError::UnknownPrefix`] if the literal starts with neither
    /// `0b` nor `0x`.
    pub fn from_literal(text: &str) -> Result<Self, WireError> {
        let text = text.trim();
        if text.starts_with("0b") {
            Ok(Self::Bin(text.to_string()))
        } else if text.starts_with("0x") {
            Ok(Self::Hex(text.to_string()))
        } else {
            Err(WireError::UnknownPrefix {
                found: text.chars().take(16).collect(),
            })
        }
    }

    /// Which representation this message uses.
    #[must_use]
    pub fn format(&self) -> MessageFormat {
        match self {
            Self::Bin(_) => MessageFormat::Bin,
            Self::Hex(_) => MessageFormat::Hex,
            Self::Bytes(_) => MessageFormat::Bytes,
        }
    }

    /// Normalise to the internal bit stream.
    ///
    /// # Errors
    ///
    /// [`WireError::InvalidDigit`] for characters outside the
    /// representation's digit set.
    pub fn bits(&self) -> Result<BitString, WireError> {
        match self {
            Self::Bin(text) => {
                let mut bits = BitString::new();
                for (pos, ch) in text.char_indices().skip(2) {
                    match ch {
                        '0' => bits.push(false),
                        '1' => bits.push(true),
                        _ => return Err(WireError::InvalidDigit { ch, pos }),
                    }
                }
                Ok(bits)
            }
            Self::Hex(text) => {
                let mut bits = BitString::new();
                for (pos, ch) in text.char_indices().skip(2) {
                    let Some(v) = ch.to_digit(16) else {
                        return Err(WireError::InvalidDigit { ch, pos });
                    };
                    for bit in (0..4).rev() {
                        bits.push((v >> bit) & 1 == 1);
                    }
                }
                Ok(bits)
            }
            Self::Bytes(bytes) => Ok(BitString::from_bytes(bytes.clone())),
        }
    }
}

impl fmt::Display for Message {
    /// Text form: the literal itself for `bin`/`hex`, a hex literal for
    /// raw bytes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bin(text) | Self::Hex(text) => f.write_str(text),
            Self::Bytes(bytes) => {
                f.write_str("0x")?;
                for b in bytes {
                    write!(f, "{b:02x}")?;
                }
                Ok(())
            }
        }
    }
}
