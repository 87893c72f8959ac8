use crate::memory::mask_address;

/// Mask of the accumulator's upper 4-bit preserve field.
pub const PRESERVE_MASK: u16 = 0xF000;
/// Mask of the 12-bit data field.
pub const DATA_MASK: u16 = 0x0FFF;

/// Returns the preserve field of `word`, left in place.
#[must_use]
pub const fn preserve_field(word: u16) -> u16 {
    word & PRESERVE_MASK
}

/// Returns the data field of `word`.
#[must_use]
pub const fn data_field(word: u16) -> u16 {
    word & DATA_MASK
}

/// Register state of the SMA16 processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ArchitecturalState {
    accumulator: u16,
    pc: u16,
    test: bool,
    halt: bool,
}

impl ArchitecturalState {
    /// Reads the accumulator.
    #[must_use]
    pub const fn accumulator(&self) -> u16 {
        self.accumulator
    }

    /// Writes the full accumulator, preserve field included.
    pub const fn set_accumulator(&mut self, value: u16) {
        self.accumulator = value;
    }

    /// Reads the program counter.
    #[must_use]
    pub const fn pc(&self) -> u16 {
        self.pc
    }

    /// Writes the program counter, masked to 12 bits.
    pub const fn set_pc(&mut self, value: u16) {
        self.pc = mask_address(value);
    }

    /// Reads the test flag.
    #[must_use]
    pub const fn test(&self) -> bool {
        self.test
    }

    /// Writes the test flag.
    pub const fn set_test(&mut self, value: bool) {
        self.test = value;
    }

    /// Reads the halt flag.
    #[must_use]
    pub const fn halt(&self) -> bool {
        self.halt
    }

    /// Writes the halt flag.
    pub const fn set_halt(&mut self, value: bool) {
        self.halt = value;
    }
}

#[cfg(test)]
mod tests {
    use super::{data_field, preserve_field, ArchitecturalState};

    #[test]
    fn fields_split_a_word() {
        assert_eq!(preserve_field(0xA123), 0xA000);
        assert_eq!(data_field(0xA123), 0x0123);
        assert_eq!(preserve_field(0xA123) | data_field(0xA123), 0xA123);
    }

    #[test]
    fn default_state_is_reset() {
        let state = ArchitecturalState::default();
        assert_eq!(state.accumulator(), 0);
        assert_eq!(state.pc(), 0);
        assert!(!state.test());
        assert!(!state.halt());
    }

    #[test]
    fn pc_writes_are_masked() {
        let mut state = ArchitecturalState::default();
        state.set_pc(0x1FFF);
        assert_eq!(state.pc(), 0x0FFF);

        state.set_pc(0x1000);
        assert_eq!(state.pc(), 0x0000);
    }

    #[test]
    fn accumulator_keeps_all_sixteen_bits() {
        let mut state = ArchitecturalState::default();
        state.set_accumulator(0xFFFF);
        assert_eq!(state.accumulator(), 0xFFFF);
    }
}
