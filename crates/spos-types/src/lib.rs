#![warn(clippy::pedantic)]

pub mod alphabet;
pub mod block;
pub mod error;
pub mod keypath;
pub mod spec;
pub mod validate;

pub use block::{Approximation, Block, BlockKind, IntegerMode, code_width};
pub use error::SpecError;
pub use spec::{Meta, PayloadSpec};
