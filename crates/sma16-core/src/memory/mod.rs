//! Word-addressed memory model and fixed register map.

/// Fixed architectural addresses (vectors and memory-mapped registers).
pub mod map;

pub use map::{
    decode_fixed_register, FixedRegister, ASCII_OUT, FAULT_VECTOR, FIXED_REGISTERS,
    INTERRUPT_REASON, INTERRUPT_RETURN, MEMORY_CONF, PACKED_OUT, RESET_VECTOR, SOFTWARE_VECTOR,
    TERM_CONF,
};

/// Number of addressable 16-bit words.
pub const MEMORY_WORDS: usize = 4096;

/// Mask applied to every address and operand (12-bit address space).
pub const ADDRESS_MASK: u16 = 0x0FFF;

/// Reduces an arbitrary 16-bit value to a valid word address.
#[must_use]
pub const fn mask_address(addr: u16) -> u16 {
    addr & ADDRESS_MASK
}

/// Flat 4096-word backing store.
///
/// Every accessor masks its address, so no index can fall outside the array.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(from = "Vec<u16>", into = "Vec<u16>"))]
pub struct Memory {
    words: Box<[u16]>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let used = self.words.iter().filter(|word| **word != 0).count();
        f.debug_struct("Memory")
            .field("words", &MEMORY_WORDS)
            .field("non_zero", &used)
            .finish()
    }
}

impl Memory {
    /// Allocates a zeroed memory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            words: vec![0; MEMORY_WORDS].into_boxed_slice(),
        }
    }

    /// Builds a memory whose low addresses hold `words`.
    ///
    /// Words past `MEMORY_WORDS` are dropped; missing words stay zero.
    #[must_use]
    pub fn from_words(words: &[u16]) -> Self {
        let mut memory = Self::new();
        let count = words.len().min(MEMORY_WORDS);
        memory.words[..count].copy_from_slice(&words[..count]);
        memory
    }

    /// Reads the word at `addr` (masked to 12 bits).
    #[must_use]
    pub fn read(&self, addr: u16) -> u16 {
        self.words[usize::from(mask_address(addr))]
    }

    /// Writes `value` at `addr` (masked to 12 bits).
    pub fn write(&mut self, addr: u16, value: u16) {
        self.words[usize::from(mask_address(addr))] = value;
    }

    /// Returns the full backing store in address order.
    #[must_use]
    pub fn as_slice(&self) -> &[u16] {
        &self.words
    }
}

impl From<Vec<u16>> for Memory {
    fn from(words: Vec<u16>) -> Self {
        Self::from_words(&words)
    }
}

impl From<Memory> for Vec<u16> {
    fn from(memory: Memory) -> Self {
        memory.words.into_vec()
    }
}
