/// The sixteen primary opcodes (instruction bits 15..12).
///
/// `0x1` and `0xC` are unassigned and execute as `NOOP`. `POP` and `PUSH`
/// are decoded but unsupported: executing them redirects to the fault vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Opcode {
    Halt = 0x0,
    Unassigned1 = 0x1,
    Jump = 0x2,
    Jumpz = 0x3,
    Load = 0x4,
    Store = 0x5,
    Lshft = 0x6,
    Rshft = 0x7,
    Xor = 0x8,
    And = 0x9,
    Sfull = 0xA,
    Add = 0xB,
    UnassignedC = 0xC,
    Pop = 0xD,
    Push = 0xE,
    Noop = 0xF,
}

impl Opcode {
    /// Every opcode in numeric order.
    pub const ALL: [Self; 16] = [
        Self::Halt,
        Self::Unassigned1,
        Self::Jump,
        Self::Jumpz,
        Self::Load,
        Self::Store,
        Self::Lshft,
        Self::Rshft,
        Self::Xor,
        Self::And,
        Self::Sfull,
        Self::Add,
        Self::UnassignedC,
        Self::Pop,
        Self::Push,
        Self::Noop,
    ];

    /// Converts a 4-bit value into an opcode.
    #[must_use]
    pub const fn from_u4(value: u8) -> Option<Self> {
        match value {
            0x0 => Some(Self::Halt),
            0x1 => Some(Self::Unassigned1),
            0x2 => Some(Self::Jump),
            0x3 => Some(Self::Jumpz),
            0x4 => Some(Self::Load),
            0x5 => Some(Self::Store),
            0x6 => Some(Self::Lshft),
            0x7 => Some(Self::Rshft),
            0x8 => Some(Self::Xor),
            0x9 => Some(Self::And),
            0xA => Some(Self::Sfull),
            0xB => Some(Self::Add),
            0xC => Some(Self::UnassignedC),
            0xD => Some(Self::Pop),
            0xE => Some(Self::Push),
            0xF => Some(Self::Noop),
            _ => None,
        }
    }

    /// Returns the 4-bit opcode value.
    #[must_use]
    pub const fn as_u4(self) -> u8 {
        self as u8
    }

    /// Assembler-style mnemonic.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Halt => "HALT",
            Self::Unassigned1 | Self::UnassignedC => "----",
            Self::Jump => "JUMP",
            Self::Jumpz => "JUMPZ",
            Self::Load => "LOAD",
            Self::Store => "STORE",
            Self::Lshft => "LSHFT",
            Self::Rshft => "RSHFT",
            Self::Xor => "XOR",
            Self::And => "AND",
            Self::Sfull => "SFULL",
            Self::Add => "ADD",
            Self::Pop => "POP",
            Self::Push => "PUSH",
            Self::Noop => "NOOP",
        }
    }

    /// Returns `true` for opcodes that behave exactly like `NOOP`.
    #[must_use]
    pub const fn is_noop_alias(self) -> bool {
        matches!(self, Self::Unassigned1 | Self::UnassignedC | Self::Noop)
    }

    /// Returns `true` for opcodes that raise an unsupported-instruction fault.
    #[must_use]
    pub const fn is_unsupported(self) -> bool {
        matches!(self, Self::Pop | Self::Push)
    }
}

/// Extracts the opcode nibble (bits 15..12) of an instruction word.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn opcode_field(word: u16) -> u8 {
    ((word >> 12) & 0xF) as u8
}

/// Extracts the 12-bit operand of an instruction word.
#[must_use]
pub const fn operand_field(word: u16) -> u16 {
    word & 0x0FFF
}

/// Packs an opcode and operand into an instruction word.
#[must_use]
pub const fn encode_instruction(opcode: Opcode, operand: u16) -> u16 {
    ((opcode.as_u4() as u16) << 12) | operand_field(operand)
}
