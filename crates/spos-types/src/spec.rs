use std::str::FromStr;

use serde_json::Value;

use crate::block::Block;
use crate::error::SpecError;
use crate::validate;

/// Compiled `meta` options.
///
/// `version_bits` being `Some` *is* `encode_version = true` — the raw
/// spec's requirement that the two appear together is carried by the
/// type rather than re-checked at every use site.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Meta {
    /// Width of the leading version prefix, when one is transmitted.
    pub version_bits: Option<usize>,
    /// Append a CRC-8 trailer over the byte-padded message.
    pub crc8: bool,
    /// Blocks prepended to the body. Static blocks (value, no type)
    /// contribute no wire bits but surface in decoded meta.
    pub header: Vec<Block>,
}

impl Meta {
    /// Whether the wire format begins with a version prefix.
    #[must_use]
    pub fn encode_version(&self) -> bool {
        self.version_bits.is_some()
    }
}

/// A compiled payload specification.
///
/// Identity is `(name, version)`. A spec is compiled once from its JSON
/// description via [`from_json`](Self::from_json) (or `str::parse`) and
/// is immutable afterwards — encode and decode calls share it freely.
#[derive(Clone, Debug, PartialEq)]
pub struct PayloadSpec {
    pub name: String,
    pub version: u64,
    pub meta: Meta,
    pub body: Vec<Block>,
}

impl PayloadSpec {
    /// Compile a raw JSON spec description.
    ///
    /// # Errors
    ///
    /// Any [`SpecError`]: unknown keys, missing keys, bad value types,
    /// inconsistent meta options, malformed block parameters.
    pub fn from_json(raw: &Value) -> Result<Self, SpecError> {
        validate::payload_spec(raw)
    }

    /// Total message width in bits, when it is independent of the data.
    ///
    /// Folds in the version prefix, header and body blocks, and the CRC
    /// trailer (with its zero-padding up to a byte boundary). `None` when
    /// any block is a dynamic array — their width depends on the value.
    #[must_use]
    pub fn fixed_width(&self) -> Option<usize> {
        let mut total = self.meta.version_bits.unwrap_or(0);
        for block in self.meta.header.iter().chain(&self.body) {
            total += block.width()?;
        }
        if self.meta.crc8 {
            total = total.div_ceil(8) * 8 + 8;
        }
        Some(total)
    }
}

impl FromStr for PayloadSpec {
    type Err = SpecError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let raw: Value = serde_json::from_str(text)?;
        Self::from_json(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fixed_width_folds_prefix_and_crc() {
        let spec = PayloadSpec::from_json(&json!({
            "name": "ping",
            "version": 1,
            "meta": {"encode_version": true, "version_bits": 4, "crc8": true},
            "body": [],
        }))
        .unwrap();
        // 4 prefix bits, padded to one byte, plus 8 CRC bits
        assert_eq!(spec.fixed_width(), Some(16));
    }

    #[test]
    fn fixed_width_none_for_dynamic_arrays() {
        let spec = PayloadSpec::from_json(&json!({
            "name": "list",
            "version": 1,
            "body": [
                {"type": "array", "key": "xs", "length": 4,
                 "blocks": {"type": "integer", "bits": 4}},
            ],
        }))
        .unwrap();
        assert_eq!(spec.fixed_width(), None);
    }

    #[test]
    fn parses_from_text() {
        let spec: PayloadSpec = r#"{
            "name": "t", "version": 3,
            "body": [{"type": "boolean", "key": "on"}]
        }"#
        .parse()
        .unwrap();
        assert_eq!(spec.name, "t");
        assert_eq!(spec.version, 3);
        assert_eq!(spec.fixed_width(), Some(1));
    }
}
