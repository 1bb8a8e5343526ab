use std::collections::HashSet;

use spos_types::{PayloadSpec, SpecError};
use spos_wire::{BitReader, Message};

use crate::decoder::{Decoded, decode_bits};
use crate::error::{DecodeError, SpecsVersionError};

/// Decode a message whose version is selected from a pool of specs.
///
/// The pool must be consistent — one name, one version prefix layout,
/// pairwise distinct versions — otherwise the peeked prefix would be
/// meaningless. The dispatcher then:
///
///   1. reads the first `version_bits` bits of the message,
///   2. picks the unique spec with that version,
///   3. delegates to the ordinary decode, which re-reads the prefix as
///      part of its own framing (and verifies the CRC first when the
///      chosen spec carries one).
///
/// # Errors
///
/// [`SpecsVersionError`] for an inconsistent pool,
/// [`SpecError::UnknownVersion`] when no spec matches the wire version,
/// and any ordinary [`DecodeError`] from the delegated decode.
pub fn decode_from_specs(
    message: &Message,
    specs: &[PayloadSpec],
) -> Result<Decoded, DecodeError> {
    let first = specs.first().ok_or(SpecsVersionError::EmptyPool)?;
    let Some(version_bits) = first.meta.version_bits else {
        return Err(SpecsVersionError::VersionNotEncoded {
            name: first.name.clone(),
        }
        .into());
    };

    let mut versions = HashSet::new();
    for spec in specs {
        if spec.name != first.name {
            return Err(SpecsVersionError::MixedNames {
                first: first.name.clone(),
                other: spec.name.clone(),
            }
            .into());
        }
        match spec.meta.version_bits {
            Some(bits) if bits == version_bits => {}
            Some(bits) => {
                return Err(SpecsVersionError::MixedVersionBits {
                    first: version_bits,
                    other: bits,
                }
                .into());
            }
            None => {
                return Err(SpecsVersionError::VersionNotEncoded {
                    name: spec.name.clone(),
                }
                .into());
            }
        }
        if !versions.insert(spec.version) {
            return Err(SpecsVersionError::DuplicateVersion {
                version: spec.version,
            }
            .into());
        }
    }

    let bits = message.bits()?;
    let version = BitReader::new(&bits).read(version_bits)?;
    let spec = specs
        .iter()
        .find(|spec| spec.version == version)
        .ok_or(SpecError::UnknownVersion { version })?;

    decode_bits(&bits, spec)
}
