//! Six-bit alphabet used by the packed-character output register.

/// Code rendered as a space.
pub const PACKED_SPACE: u8 = 62;
/// Code that emits no character.
pub const PACKED_NONE: u8 = 63;

/// Maps a 6-bit code to its ASCII byte. Code 63 (and anything wider) maps to `None`.
#[must_use]
pub const fn packed_char(code: u8) -> Option<u8> {
    match code {
        0..=25 => Some(b'A' + code),
        26..=51 => Some(b'a' + (code - 26)),
        52..=61 => Some(b'0' + (code - 52)),
        PACKED_SPACE => Some(b' '),
        _ => None,
    }
}

/// Maps a character to its 6-bit code, if the alphabet contains it.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn packed_code(ch: char) -> Option<u8> {
    match ch {
        'A'..='Z' => Some(ch as u8 - b'A'),
        'a'..='z' => Some(ch as u8 - b'a' + 26),
        '0'..='9' => Some(ch as u8 - b'0' + 52),
        ' ' => Some(PACKED_SPACE),
        _ => None,
    }
}

/// Splits a written value into its two codes (bits 11..6, then bits 5..0)
/// and maps each through the alphabet.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn unpack_pair(value: u16) -> [Option<u8>; 2] {
    let first = ((value >> 6) & 0x3F) as u8;
    let second = (value & 0x3F) as u8;
    [packed_char(first), packed_char(second)]
}
