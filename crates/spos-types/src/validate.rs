//! Strict compilation of raw JSON spec descriptions into typed specs.
//!
//! Every block type has a closed set of allowed keys; anything else is
//! rejected with the offending spec path. Defaults are substituted here,
//! nested blocks are validated recursively, and the output is the typed
//! tree the codecs dispatch on — no raw JSON survives past this module.

use std::collections::{BTreeMap, HashSet};

use serde_json::{Map, Value};

use crate::block::{Approximation, Block, BlockKind, IntegerMode};
use crate::error::SpecError;
use crate::spec::{Meta, PayloadSpec};

/// Widest bit group that rides in a `u64` (integer, float, version prefix).
const MAX_GROUP_BITS: u64 = 64;

/// Where a block sits in the spec, which changes what it may declare.
#[derive(Clone, Copy, PartialEq)]
enum Context {
    /// `meta.header` entry: a key is required, statics are allowed.
    Header,
    /// `body` entry (or object blocklist): a key is required.
    Body,
    /// Array item: no key, alias or value — the element is the value.
    Item,
}

/// Compile and validate a full payload spec.
pub fn payload_spec(raw: &Value) -> Result<PayloadSpec, SpecError> {
    let root = object(raw, "payload spec")?;
    known_keys(root, "payload spec", &["name", "version", "meta", "body"])?;

    let name = string(require(root, "payload spec", "name")?, "payload spec.name")?;
    let version = uint(
        require(root, "payload spec", "version")?,
        "payload spec.version",
    )?;
    let meta = match root.get("meta") {
        Some(raw_meta) => meta(raw_meta)?,
        None => Meta::default(),
    };
    let body = blocklist(require(root, "payload spec", "body")?, "body", Context::Body)?;

    if let Some(bits) = meta.version_bits {
        if bits < MAX_GROUP_BITS as usize && version >> bits != 0 {
            return Err(SpecError::VersionOverflow { version, bits });
        }
    }

    Ok(PayloadSpec {
        name,
        version,
        meta,
        body,
    })
}

fn meta(raw: &Value) -> Result<Meta, SpecError> {
    let map = object(raw, "meta")?;
    known_keys(
        map,
        "meta",
        &["encode_version", "version_bits", "crc8", "header"],
    )?;

    let encode_version = match map.get("encode_version") {
        Some(v) => boolean(v, "meta.encode_version")?,
        None => false,
    };
    let version_bits = match map.get("version_bits") {
        Some(v) => Some(group_bits(v, "meta.version_bits")?),
        None => None,
    };
    // The two options are required together, in both directions.
    if encode_version && version_bits.is_none() {
        return Err(SpecError::MissingVersionBits);
    }
    if !encode_version && version_bits.is_some() {
        return Err(SpecError::StrayVersionBits);
    }

    let crc8 = match map.get("crc8") {
        Some(v) => boolean(v, "meta.crc8")?,
        None => false,
    };
    let header = match map.get("header") {
        Some(v) => blocklist(v, "meta.header", Context::Header)?,
        None => Vec::new(),
    };

    Ok(Meta {
        version_bits,
        crc8,
        header,
    })
}

fn blocklist(raw: &Value, at: &str, context: Context) -> Result<Vec<Block>, SpecError> {
    let entries = array(raw, at)?;
    let mut blocks = Vec::with_capacity(entries.len());
    let mut names: HashSet<&str> = HashSet::new();

    for (i, entry) in entries.iter().enumerate() {
        blocks.push(block(entry, &format!("{at}[{i}]"), context)?);
    }
    // Keys and aliases share one namespace within a blocklist.
    for (i, b) in blocks.iter().enumerate() {
        for name in [Some(b.key.as_str()), b.alias.as_deref()].into_iter().flatten() {
            if !names.insert(name) {
                return Err(SpecError::DuplicateKey {
                    at: format!("{at}[{i}]"),
                    key: name.to_string(),
                });
            }
        }
    }
    Ok(blocks)
}

fn block(raw: &Value, at: &str, context: Context) -> Result<Block, SpecError> {
    let map = object(raw, at)?;

    let Some(type_tag) = map.get("type") else {
        // No type: only valid as a static header block carrying a value.
        if context == Context::Header && map.contains_key("value") {
            known_keys(map, at, &["key", "value", "alias"])?;
            return Ok(Block {
                key: string(require(map, at, "key")?, &format!("{at}.key"))?,
                alias: opt_string(map, at, "alias")?,
                value: map.get("value").cloned(),
                kind: BlockKind::Static,
            });
        }
        return Err(SpecError::MissingKey {
            at: at.to_string(),
            key: "type",
        });
    };
    let type_name = string(type_tag, &format!("{at}.type"))?;

    // Parameters allowed beyond the common set, per type.
    let params: &[&str] = match type_name.as_str() {
        "boolean" => &[],
        "binary" | "pad" => &["bits"],
        "integer" => &["bits", "offset", "mode"],
        "float" => &["bits", "lower", "upper", "approximation"],
        "string" => &["length", "custom_alphabeth"],
        "steps" => &["steps", "steps_names"],
        "categories" => &["categories", "error"],
        "array" => &["length", "blocks", "fixed"],
        "object" => &["blocklist"],
        other => {
            return Err(SpecError::UnknownBlockType {
                at: at.to_string(),
                found: other.to_string(),
            });
        }
    };
    let common: &[&str] = match (context, type_name.as_str()) {
        (Context::Item, _) => &["type"],
        // Pad transmits nothing and decodes to nothing: no override, no rename.
        (_, "pad") => &["type", "key"],
        _ => &["type", "key", "alias", "value"],
    };
    let allowed: Vec<&str> = common.iter().chain(params).copied().collect();
    known_keys(map, at, &allowed)?;

    let key = if context == Context::Item {
        String::new()
    } else {
        string(require(map, at, "key")?, &format!("{at}.key"))?
    };
    let alias = opt_string(map, at, "alias")?;
    let value = map.get("value").cloned();

    let kind = match type_name.as_str() {
        "boolean" => BlockKind::Boolean,
        "binary" => BlockKind::Binary {
            bits: positive(require(map, at, "bits")?, &format!("{at}.bits"))?,
        },
        "pad" => BlockKind::Pad {
            bits: positive(require(map, at, "bits")?, &format!("{at}.bits"))?,
        },
        "integer" => integer(map, at)?,
        "float" => float(map, at)?,
        "string" => string_block(map, at)?,
        "steps" => steps(map, at)?,
        "categories" => categories(map, at)?,
        "array" => BlockKind::Array {
            length: positive(require(map, at, "length")?, &format!("{at}.length"))?,
            fixed: match map.get("fixed") {
                Some(v) => boolean(v, &format!("{at}.fixed"))?,
                None => false,
            },
            item: Box::new(block(
                require(map, at, "blocks")?,
                &format!("{at}.blocks"),
                Context::Item,
            )?),
        },
        "object" => BlockKind::Object {
            blocklist: blocklist(
                require(map, at, "blocklist")?,
                &format!("{at}.blocklist"),
                Context::Body,
            )?,
        },
        _ => unreachable!("type tag already matched against the catalogue"),
    };

    Ok(Block {
        key,
        alias,
        value,
        kind,
    })
}

fn integer(map: &Map<String, Value>, at: &str) -> Result<BlockKind, SpecError> {
    let bits = group_bits(require(map, at, "bits")?, &format!("{at}.bits"))?;
    let offset = match map.get("offset") {
        Some(v) => int(v, &format!("{at}.offset"))?,
        None => 0,
    };
    let mode = match map.get("mode") {
        None => IntegerMode::default(),
        Some(v) => match string(v, &format!("{at}.mode"))?.as_str() {
            "truncate" => IntegerMode::Truncate,
            "remainder" => IntegerMode::Remainder,
            other => {
                return Err(SpecError::UnknownValue {
                    at: format!("{at}.mode"),
                    found: other.to_string(),
                    expected: "\"truncate\" or \"remainder\"",
                });
            }
        },
    };
    Ok(BlockKind::Integer { bits, offset, mode })
}

fn float(map: &Map<String, Value>, at: &str) -> Result<BlockKind, SpecError> {
    let bits = group_bits(require(map, at, "bits")?, &format!("{at}.bits"))?;
    let lower = match map.get("lower") {
        Some(v) => number(v, &format!("{at}.lower"))?,
        None => 0.0,
    };
    let upper = match map.get("upper") {
        Some(v) => number(v, &format!("{at}.upper"))?,
        None => 1.0,
    };
    if !(upper > lower) {
        return Err(SpecError::EmptyRange { at: at.to_string() });
    }
    let approximation = match map.get("approximation") {
        None => Approximation::default(),
        Some(v) => match string(v, &format!("{at}.approximation"))?.as_str() {
            "round" => Approximation::Round,
            "floor" => Approximation::Floor,
            "ceil" => Approximation::Ceil,
            other => {
                return Err(SpecError::UnknownValue {
                    at: format!("{at}.approximation"),
                    found: other.to_string(),
                    expected: "\"round\", \"floor\" or \"ceil\"",
                });
            }
        },
    };
    Ok(BlockKind::Float {
        bits,
        lower,
        upper,
        approximation,
    })
}

fn string_block(map: &Map<String, Value>, at: &str) -> Result<BlockKind, SpecError> {
    let length = positive(require(map, at, "length")?, &format!("{at}.length"))?;
    let alphabet = match map.get("custom_alphabeth") {
        None => None,
        Some(raw) => {
            let entries = object(raw, &format!("{at}.custom_alphabeth"))?;
            let mut alphabet = BTreeMap::new();
            for (index_text, replacement) in entries {
                let entry_at = format!("{at}.custom_alphabeth[{index_text:?}]");
                let Ok(index) = index_text.parse::<u64>() else {
                    return Err(SpecError::WrongType {
                        at: entry_at,
                        expected: "a numeric index key",
                    });
                };
                if index >= 64 {
                    return Err(SpecError::AlphabetIndex { at: entry_at, index });
                }
                let replacement = string(replacement, &entry_at)?;
                let mut chars = replacement.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => {
                        alphabet.insert(index as u8, ch);
                    }
                    _ => {
                        return Err(SpecError::AlphabetChar {
                            at: entry_at,
                            found: replacement,
                        });
                    }
                }
            }
            Some(alphabet)
        }
    };
    Ok(BlockKind::Str { length, alphabet })
}

fn steps(map: &Map<String, Value>, at: &str) -> Result<BlockKind, SpecError> {
    let steps_at = format!("{at}.steps");
    let raw_steps = array(require(map, at, "steps")?, &steps_at)?;
    if raw_steps.is_empty() {
        return Err(SpecError::WrongType {
            at: steps_at,
            expected: "a non-empty array of numbers",
        });
    }
    let mut steps = Vec::with_capacity(raw_steps.len());
    for (i, v) in raw_steps.iter().enumerate() {
        steps.push(number(v, &format!("{steps_at}[{i}]"))?);
    }
    if !steps.windows(2).all(|w| w[0] < w[1]) {
        return Err(SpecError::NonAscendingSteps { at: steps_at });
    }

    let names = match map.get("steps_names") {
        Some(raw_names) => {
            let names_at = format!("{at}.steps_names");
            let raw_names = array(raw_names, &names_at)?;
            if raw_names.len() != steps.len() + 1 {
                return Err(SpecError::StepsNamesLength {
                    at: names_at,
                    expected: steps.len() + 1,
                    found: raw_names.len(),
                });
            }
            raw_names
                .iter()
                .enumerate()
                .map(|(i, v)| string(v, &format!("{names_at}[{i}]")))
                .collect::<Result<Vec<_>, _>>()?
        }
        None => synthesise_step_names(&steps),
    };

    Ok(BlockKind::Steps { steps, names })
}

/// Default bucket names: `x<s0`, `s0<=x<s1`, …, `x>=sn`.
fn synthesise_step_names(steps: &[f64]) -> Vec<String> {
    let mut names = Vec::with_capacity(steps.len() + 1);
    names.push(format!("x<{}", steps[0]));
    for pair in steps.windows(2) {
        names.push(format!("{}<=x<{}", pair[0], pair[1]));
    }
    names.push(format!("x>={}", steps[steps.len() - 1]));
    names
}

fn categories(map: &Map<String, Value>, at: &str) -> Result<BlockKind, SpecError> {
    let cats_at = format!("{at}.categories");
    let raw_cats = array(require(map, at, "categories")?, &cats_at)?;
    if raw_cats.is_empty() {
        return Err(SpecError::WrongType {
            at: cats_at,
            expected: "a non-empty array of strings",
        });
    }
    let mut seen = HashSet::new();
    let mut categories = Vec::with_capacity(raw_cats.len());
    for (i, v) in raw_cats.iter().enumerate() {
        let category = string(v, &format!("{cats_at}[{i}]"))?;
        if !seen.insert(category.clone()) {
            return Err(SpecError::DuplicateCategory {
                at: cats_at,
                value: category,
            });
        }
        categories.push(category);
    }
    let error = match map.get("error") {
        Some(v) => Some(string(v, &format!("{at}.error"))?),
        None => None,
    };
    Ok(BlockKind::Categories { categories, error })
}

// ── JSON shape helpers ────────────────────────────────────────────────────────

fn object<'a>(v: &'a Value, at: &str) -> Result<&'a Map<String, Value>, SpecError> {
    v.as_object().ok_or_else(|| SpecError::WrongType {
        at: at.to_string(),
        expected: "an object",
    })
}

fn array<'a>(v: &'a Value, at: &str) -> Result<&'a Vec<Value>, SpecError> {
    v.as_array().ok_or_else(|| SpecError::WrongType {
        at: at.to_string(),
        expected: "an array",
    })
}

fn string(v: &Value, at: &str) -> Result<String, SpecError> {
    v.as_str()
        .map(str::to_string)
        .ok_or_else(|| SpecError::WrongType {
            at: at.to_string(),
            expected: "a string",
        })
}

fn opt_string(map: &Map<String, Value>, at: &str, key: &str) -> Result<Option<String>, SpecError> {
    match map.get(key) {
        Some(v) => Ok(Some(string(v, &format!("{at}.{key}"))?)),
        None => Ok(None),
    }
}

fn boolean(v: &Value, at: &str) -> Result<bool, SpecError> {
    v.as_bool().ok_or_else(|| SpecError::WrongType {
        at: at.to_string(),
        expected: "a boolean",
    })
}

fn uint(v: &Value, at: &str) -> Result<u64, SpecError> {
    v.as_u64().ok_or_else(|| SpecError::WrongType {
        at: at.to_string(),
        expected: "a non-negative integer",
    })
}

fn int(v: &Value, at: &str) -> Result<i64, SpecError> {
    v.as_i64().ok_or_else(|| SpecError::WrongType {
        at: at.to_string(),
        expected: "an integer",
    })
}

fn number(v: &Value, at: &str) -> Result<f64, SpecError> {
    let n = v.as_f64().ok_or_else(|| SpecError::WrongType {
        at: at.to_string(),
        expected: "a number",
    })?;
    if !n.is_finite() {
        return Err(SpecError::WrongType {
            at: at.to_string(),
            expected: "a finite number",
        });
    }
    Ok(n)
}

/// A width ≥ 1 with no upper bound (binary, pad, string length, array length).
fn positive(v: &Value, at: &str) -> Result<usize, SpecError> {
    let n = uint(v, at)?;
    if n == 0 {
        return Err(SpecError::WrongType {
            at: at.to_string(),
            expected: "a positive integer",
        });
    }
    usize::try_from(n).map_err(|_| SpecError::WrongType {
        at: at.to_string(),
        expected: "a positive integer",
    })
}

/// A width in `1..=64` (bit groups that ride in a `u64`).
fn group_bits(v: &Value, at: &str) -> Result<usize, SpecError> {
    let bits = uint(v, at)?;
    if bits == 0 || bits > MAX_GROUP_BITS {
        return Err(SpecError::BitsOutOfRange {
            at: at.to_string(),
            bits,
            max: MAX_GROUP_BITS,
        });
    }
    Ok(bits as usize)
}

fn require<'a>(
    map: &'a Map<String, Value>,
    at: &str,
    key: &'static str,
) -> Result<&'a Value, SpecError> {
    map.get(key).ok_or_else(|| SpecError::MissingKey {
        at: at.to_string(),
        key,
    })
}

fn known_keys(map: &Map<String, Value>, at: &str, allowed: &[&str]) -> Result<(), SpecError> {
    for key in map.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(SpecError::UnknownKey {
                at: at.to_string(),
                key: key.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn compile(raw: Value) -> Result<PayloadSpec, SpecError> {
        payload_spec(&raw)
    }

    #[test]
    fn minimal_spec_compiles() {
        let spec = compile(json!({
            "name": "t", "version": 1,
            "body": [{"type": "boolean", "key": "on"}],
        }))
        .unwrap();
        assert_eq!(spec.body.len(), 1);
        assert_eq!(spec.body[0].kind, BlockKind::Boolean);
        assert!(!spec.meta.crc8);
    }

    #[test]
    fn defaults_are_substituted() {
        let spec = compile(json!({
            "name": "t", "version": 1,
            "body": [
                {"type": "integer", "key": "i", "bits": 6},
                {"type": "float", "key": "f", "bits": 6},
            ],
        }))
        .unwrap();
        assert_eq!(
            spec.body[0].kind,
            BlockKind::Integer {
                bits: 6,
                offset: 0,
                mode: IntegerMode::Truncate
            }
        );
        assert_eq!(
            spec.body[1].kind,
            BlockKind::Float {
                bits: 6,
                lower: 0.0,
                upper: 1.0,
                approximation: Approximation::Round
            }
        );
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = compile(json!({
            "name": "t", "version": 1,
            "body": [{"type": "boolean", "key": "on", "bitz": 3}],
        }))
        .unwrap_err();
        assert!(matches!(err, SpecError::UnknownKey { key, .. } if key == "bitz"));
    }

    #[test]
    fn unknown_block_type_is_rejected() {
        let err = compile(json!({
            "name": "t", "version": 1,
            "body": [{"type": "quaternion", "key": "q"}],
        }))
        .unwrap_err();
        assert!(matches!(err, SpecError::UnknownBlockType { found, .. } if found == "quaternion"));
    }

    #[test]
    fn encode_version_requires_version_bits() {
        let err = compile(json!({
            "name": "t", "version": 1,
            "meta": {"encode_version": true},
            "body": [],
        }))
        .unwrap_err();
        assert!(matches!(err, SpecError::MissingVersionBits));
    }

    #[test]
    fn version_bits_requires_encode_version() {
        let err = compile(json!({
            "name": "t", "version": 1,
            "meta": {"version_bits": 4},
            "body": [],
        }))
        .unwrap_err();
        assert!(matches!(err, SpecError::StrayVersionBits));
    }

    #[test]
    fn version_must_fit_prefix() {
        let err = compile(json!({
            "name": "t", "version": 16,
            "meta": {"encode_version": true, "version_bits": 4},
            "body": [],
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            SpecError::VersionOverflow { version: 16, bits: 4 }
        ));
    }

    #[test]
    fn steps_must_ascend() {
        let err = compile(json!({
            "name": "t", "version": 1,
            "body": [{"type": "steps", "key": "s", "steps": [0.5, 0.5]}],
        }))
        .unwrap_err();
        assert!(matches!(err, SpecError::NonAscendingSteps { .. }));
    }

    #[test]
    fn step_names_are_synthesised() {
        let spec = compile(json!({
            "name": "t", "version": 1,
            "body": [{"type": "steps", "key": "s", "steps": [0.1, 0.6, 0.95]}],
        }))
        .unwrap();
        let BlockKind::Steps { names, .. } = &spec.body[0].kind else {
            panic!("expected a steps block");
        };
        assert_eq!(names, &["x<0.1", "0.1<=x<0.6", "0.6<=x<0.95", "x>=0.95"]);
    }

    #[test]
    fn steps_names_length_is_checked() {
        let err = compile(json!({
            "name": "t", "version": 1,
            "body": [{"type": "steps", "key": "s", "steps": [1, 2],
                      "steps_names": ["a", "b"]}],
        }))
        .unwrap_err();
        assert!(matches!(
            err,
            SpecError::StepsNamesLength { expected: 3, found: 2, .. }
        ));
    }

    #[test]
    fn duplicate_categories_are_rejected() {
        let err = compile(json!({
            "name": "t", "version": 1,
            "body": [{"type": "categories", "key": "c",
                      "categories": ["red", "red"]}],
        }))
        .unwrap_err();
        assert!(matches!(err, SpecError::DuplicateCategory { value, .. } if value == "red"));
    }

    #[test]
    fn duplicate_keys_include_aliases() {
        let err = compile(json!({
            "name": "t", "version": 1,
            "body": [
                {"type": "boolean", "key": "a"},
                {"type": "boolean", "key": "b", "alias": "a"},
            ],
        }))
        .unwrap_err();
        assert!(matches!(err, SpecError::DuplicateKey { key, .. } if key == "a"));
    }

    #[test]
    fn static_blocks_only_in_header() {
        let ok = compile(json!({
            "name": "t", "version": 1,
            "meta": {"header": [{"key": "unit", "value": "celsius"}]},
            "body": [],
        }))
        .unwrap();
        assert_eq!(ok.meta.header[0].kind, BlockKind::Static);

        let err = compile(json!({
            "name": "t", "version": 1,
            "body": [{"key": "unit", "value": "celsius"}],
        }))
        .unwrap_err();
        assert!(matches!(err, SpecError::MissingKey { key: "type", .. }));
    }

    #[test]
    fn array_items_declare_no_key() {
        let err = compile(json!({
            "name": "t", "version": 1,
            "body": [{"type": "array", "key": "xs", "length": 3,
                      "blocks": {"type": "integer", "key": "x", "bits": 4}}],
        }))
        .unwrap_err();
        assert!(matches!(err, SpecError::UnknownKey { key, .. } if key == "key"));
    }

    #[test]
    fn nested_blocks_are_validated() {
        let err = compile(json!({
            "name": "t", "version": 1,
            "body": [{"type": "object", "key": "o", "blocklist": [
                {"type": "integer", "key": "i", "bits": 99},
            ]}],
        }))
        .unwrap_err();
        assert!(matches!(err, SpecError::BitsOutOfRange { bits: 99, .. }));
    }

    #[test]
    fn custom_alphabeth_entries_are_checked() {
        let err = compile(json!({
            "name": "t", "version": 1,
            "body": [{"type": "string", "key": "s", "length": 4,
                      "custom_alphabeth": {"64": "!"}}],
        }))
        .unwrap_err();
        assert!(matches!(err, SpecError::AlphabetIndex { index: 64, .. }));

        let err = compile(json!({
            "name": "t", "version": 1,
            "body": [{"type": "string", "key": "s", "length": 4,
                      "custom_alphabeth": {"63": "ab"}}],
        }))
        .unwrap_err();
        assert!(matches!(err, SpecError::AlphabetChar { .. }));
    }

    #[test]
    fn float_range_must_be_non_empty() {
        let err = compile(json!({
            "name": "t", "version": 1,
            "body": [{"type": "float", "key": "f", "bits": 4,
                      "lower": 2.0, "upper": 2.0}],
        }))
        .unwrap_err();
        assert!(matches!(err, SpecError::EmptyRange { .. }));
    }
}
