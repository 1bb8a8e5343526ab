#![warn(clippy::pedantic)]

pub mod blocks;
pub mod decoder;
pub mod dispatch;
pub mod error;

pub use decoder::{Decoded, decode, decode_bits};
pub use dispatch::decode_from_specs;
pub use error::{DecodeError, SpecsVersionError};
