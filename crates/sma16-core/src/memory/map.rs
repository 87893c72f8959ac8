//! Fixed architectural addresses living inside ordinary memory.

/// Execution starts here after load.
pub const RESET_VECTOR: u16 = 0x000;
/// PC is redirected here when an unsupported opcode executes.
pub const FAULT_VECTOR: u16 = 0x001;
/// Reserved software vector; the core never jumps here on its own.
pub const SOFTWARE_VECTOR: u16 = 0x002;
/// Receives the reason code of the last fault redirection.
pub const INTERRUPT_REASON: u16 = 0x008;
/// Receives the return address of the last fault redirection.
pub const INTERRUPT_RETURN: u16 = 0x009;
/// Writes emit the low byte as a raw character.
pub const ASCII_OUT: u16 = 0x00A;
/// Writes emit two characters from the packed 6-bit alphabet.
pub const PACKED_OUT: u16 = 0x00B;
/// Reserved terminal configuration register (plain memory).
pub const TERM_CONF: u16 = 0x00C;
/// Reserved memory configuration register (plain memory).
pub const MEMORY_CONF: u16 = 0x00D;

/// Named fixed address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum FixedRegister {
    ResetVector,
    FaultVector,
    SoftwareVector,
    InterruptReason,
    InterruptReturn,
    AsciiOut,
    PackedOut,
    TermConf,
    MemoryConf,
}

impl FixedRegister {
    /// Returns the word address of this register.
    #[must_use]
    pub const fn address(self) -> u16 {
        match self {
            Self::ResetVector => RESET_VECTOR,
            Self::FaultVector => FAULT_VECTOR,
            Self::SoftwareVector => SOFTWARE_VECTOR,
            Self::InterruptReason => INTERRUPT_REASON,
            Self::InterruptReturn => INTERRUPT_RETURN,
            Self::AsciiOut => ASCII_OUT,
            Self::PackedOut => PACKED_OUT,
            Self::TermConf => TERM_CONF,
            Self::MemoryConf => MEMORY_CONF,
        }
    }

    /// Returns `true` when a write to this register has an output side effect.
    #[must_use]
    pub const fn is_output(self) -> bool {
        matches!(self, Self::AsciiOut | Self::PackedOut)
    }
}

/// All fixed registers in ascending address order.
pub const FIXED_REGISTERS: [FixedRegister; 9] = [
    FixedRegister::ResetVector,
    FixedRegister::FaultVector,
    FixedRegister::SoftwareVector,
    FixedRegister::InterruptReason,
    FixedRegister::InterruptReturn,
    FixedRegister::AsciiOut,
    FixedRegister::PackedOut,
    FixedRegister::TermConf,
    FixedRegister::MemoryConf,
];

const _: () = assert_fixed_register_layout();

const fn assert_fixed_register_layout() {
    let mut index = 1;
    while index < FIXED_REGISTERS.len() {
        assert!(
            FIXED_REGISTERS[index - 1].address() < FIXED_REGISTERS[index].address(),
            "fixed registers must be strictly ascending"
        );
        index += 1;
    }
    assert!(
        FIXED_REGISTERS[FIXED_REGISTERS.len() - 1].address() <= crate::memory::ADDRESS_MASK,
        "fixed registers must fit the 12-bit address space"
    );
}

/// Maps a (masked) address to its fixed register, if any.
#[must_use]
pub const fn decode_fixed_register(addr: u16) -> Option<FixedRegister> {
    match crate::memory::mask_address(addr) {
        RESET_VECTOR => Some(FixedRegister::ResetVector),
        FAULT_VECTOR => Some(FixedRegister::FaultVector),
        SOFTWARE_VECTOR => Some(FixedRegister::SoftwareVector),
        INTERRUPT_REASON => Some(FixedRegister::InterruptReason),
        INTERRUPT_RETURN => Some(FixedRegister::InterruptReturn),
        ASCII_OUT => Some(FixedRegister::AsciiOut),
        PACKED_OUT => Some(FixedRegister::PackedOut),
        TERM_CONF => Some(FixedRegister::TermConf),
        MEMORY_CONF => Some(FixedRegister::MemoryConf),
        _ => None,
    }
}
