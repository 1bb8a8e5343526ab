#![warn(clippy::pedantic)]

pub mod bitbuf;
pub mod crc8;
pub mod error;
pub mod message;

pub use bitbuf::{BitReader, BitString, BitWriter};
pub use error::WireError;
pub use message::{Message, MessageFormat};
