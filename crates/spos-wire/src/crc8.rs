use crc::{CRC_8_SMBUS, Crc};

use crate::bitbuf::BitString;

// CRC-8/SMBUS is the exact trailer algorithm: polynomial 0x07, init 0x00,
// MSB-first, no reflection, no final xor.
const CRC8: Crc<u8> = Crc::<u8>::new(&CRC_8_SMBUS);

/// Checksum over a byte slice.
#[must_use]
pub fn checksum(bytes: &[u8]) -> u8 {
    CRC8.checksum(bytes)
}

/// Checksum over a bit stream, zero-padded on the right up to the next
/// byte boundary.
///
/// This is the trailer input for `crc8`-enabled specs: everything that
/// precedes the 8 trailer bits, byte-padded. [`BitString`] keeps its
/// storage right-zero-padded already, so the padded view is its raw bytes.
#[must_use]
pub fn checksum_bits(bits: &BitString) -> u8 {
    CRC8.checksum(bits.as_bytes())
}
