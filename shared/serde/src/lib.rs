//! # Sluice Serde
//! Word-aligned primitives for reading and writing display protocol messages.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod error;
mod fixed;
mod serde;
mod wire_reader;
mod wire_writer;

pub use error::SerdeErr;
pub use fixed::Fixed;
pub use serde::Serde;
pub use wire_reader::WireReader;
pub use wire_writer::WireWriter;

/// Size in bytes of a single protocol word
pub const WORD_SIZE: usize = 4;

/// Rounds a byte length up to the next word boundary
pub fn padded_len(length: usize) -> usize {
    (length + (WORD_SIZE - 1)) & !(WORD_SIZE - 1)
}
