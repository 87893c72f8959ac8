//! Devices attached to the memory-mapped output registers.

/// Packed six-bit character alphabet.
pub mod charset;
/// Console device implementing the output registers.
pub mod console;

pub use charset::{packed_char, packed_code, unpack_pair, PACKED_NONE, PACKED_SPACE};
pub use console::ConsoleDevice;
