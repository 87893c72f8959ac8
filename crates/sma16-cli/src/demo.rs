//! Built-in demo program.

use sma16_core::{
    load_program, packed_code, Memory, Opcode, Placement, ProgramEntry, ASCII_OUT, PACKED_NONE,
    PACKED_OUT,
};

const TEXT_BASE: u16 = 0x030;
const CODE_BASE: u16 = 0x040;

/// Packs two characters at compile time; `'\0'` packs as no character.
const fn chp(first: char, second: char) -> u16 {
    const fn code(ch: char) -> u16 {
        match packed_code(ch) {
            Some(code) => code as u16,
            None => PACKED_NONE as u16,
        }
    }
    (code(first) << 6) | code(second)
}

const fn mem(placement: Placement, opcode: Opcode, data: u16) -> ProgramEntry {
    ProgramEntry::instruction(placement, opcode, data)
}

const fn next(opcode: Opcode, data: u16) -> ProgramEntry {
    mem(Placement::Next, opcode, data)
}

const fn data(placement: Placement, word: u16) -> ProgramEntry {
    ProgramEntry::word(placement, word)
}

/// Prints "Hello World" through the packed register and a newline through
/// the ASCII register, then halts. Resuming jumps back and prints it again.
pub const DEMO_PROGRAM: &[ProgramEntry] = &[
    mem(Placement::At(0x000), Opcode::Jump, CODE_BASE),
    // Faults land here and stop the machine.
    next(Opcode::Halt, 0),
    data(Placement::At(TEXT_BASE), chp('H', 'e')),
    data(Placement::Next, chp('l', 'l')),
    data(Placement::Next, chp('o', ' ')),
    data(Placement::Next, chp('W', 'o')),
    data(Placement::Next, chp('r', 'l')),
    data(Placement::Next, chp('d', '\0')),
    data(Placement::Next, 0x000A),
    mem(Placement::At(CODE_BASE), Opcode::Load, TEXT_BASE),
    next(Opcode::Store, PACKED_OUT),
    next(Opcode::Load, TEXT_BASE + 1),
    next(Opcode::Store, PACKED_OUT),
    next(Opcode::Load, TEXT_BASE + 2),
    next(Opcode::Store, PACKED_OUT),
    next(Opcode::Load, TEXT_BASE + 3),
    next(Opcode::Store, PACKED_OUT),
    next(Opcode::Load, TEXT_BASE + 4),
    next(Opcode::Store, PACKED_OUT),
    next(Opcode::Load, TEXT_BASE + 5),
    next(Opcode::Store, PACKED_OUT),
    next(Opcode::Load, TEXT_BASE + 6),
    next(Opcode::Store, ASCII_OUT),
    next(Opcode::Halt, 0),
    next(Opcode::Jump, CODE_BASE),
];

/// Memory image holding [`DEMO_PROGRAM`].
pub fn demo_memory() -> Memory {
    load_program(DEMO_PROGRAM)
}
