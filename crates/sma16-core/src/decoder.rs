//! Instruction decoder for the SMA16 instruction word.
//!
//! Every 16-bit word decodes: the opcode nibble selects one of sixteen
//! operations and anything the table does not name falls back to `NOOP`.

use crate::encoding::{encode_instruction, opcode_field, operand_field, Opcode};

/// Decoded instruction fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedInstruction {
    /// Operation selected by bits 15..12.
    pub opcode: Opcode,
    /// 12-bit operand (bits 11..0).
    pub operand: u16,
    /// Raw fetched word.
    pub raw: u16,
}

impl DecodedInstruction {
    /// Re-encodes the opcode and operand into a word.
    #[must_use]
    pub const fn encode(self) -> u16 {
        encode_instruction(self.opcode, self.operand)
    }
}

/// Stateless instruction decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder;

impl Decoder {
    /// Decodes a fetched instruction word.
    #[must_use]
    pub const fn decode(word: u16) -> DecodedInstruction {
        let opcode = match Opcode::from_u4(opcode_field(word)) {
            Some(opcode) => opcode,
            None => Opcode::Noop,
        };

        DecodedInstruction {
            opcode,
            operand: operand_field(word),
            raw: word,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Decoder;
    use crate::encoding::Opcode;

    #[test]
    fn decodes_opcode_and_operand() {
        let instr = Decoder::decode(0x4010);
        assert_eq!(instr.opcode, Opcode::Load);
        assert_eq!(instr.operand, 0x010);
        assert_eq!(instr.raw, 0x4010);
    }

    #[test]
    fn decode_then_encode_reproduces_word() {
        for word in [0x0000, 0x1FFF, 0xB001, 0xD123, 0xFFFF] {
            assert_eq!(Decoder::decode(word).encode(), word);
        }
    }

    #[test]
    fn unassigned_opcodes_decode_to_their_own_variant() {
        assert_eq!(Decoder::decode(0x1000).opcode, Opcode::Unassigned1);
        assert_eq!(Decoder::decode(0xC000).opcode, Opcode::UnassignedC);
    }
}
