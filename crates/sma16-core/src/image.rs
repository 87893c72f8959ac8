//! Memory image loading: binary image files and embedded program tables.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::encoding::{encode_instruction, Opcode};
use crate::memory::{mask_address, Memory, MEMORY_WORDS};
use crate::peripherals::{packed_code, PACKED_NONE};

/// Largest image file consumed, in bytes (one byte pair per memory word).
pub const IMAGE_MAX_BYTES: usize = MEMORY_WORDS * 2;

/// Failures while building a memory image.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The image file could not be read.
    #[error("could not read image {}: {source}", path.display())]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A character outside the packed alphabet.
    #[error("character {0:?} has no packed code")]
    UnpackableChar(char),
}

/// Non-fatal irregularities found while decoding an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ImageWarning {
    /// The trailing odd byte was ignored.
    #[error("uneven number of bytes ({len}) read from memory image")]
    OddByteCount {
        /// Bytes consumed.
        len: usize,
    },
    /// Bytes past the end of memory were ignored.
    #[error("memory image is {len} bytes; bytes beyond {} ignored", IMAGE_MAX_BYTES)]
    Truncated {
        /// Total image size.
        len: usize,
    },
}

/// Memory built from an image, plus whatever was odd about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    /// Initial memory contents.
    pub memory: Memory,
    /// Warnings in the order they were found.
    pub warnings: Vec<ImageWarning>,
}

/// Decodes big-endian words from `bytes` into memory starting at address 0.
#[must_use]
pub fn decode_image(bytes: &[u8]) -> LoadedImage {
    let mut warnings = Vec::new();

    if bytes.len() > IMAGE_MAX_BYTES {
        warnings.push(ImageWarning::Truncated { len: bytes.len() });
    }
    let used = &bytes[..bytes.len().min(IMAGE_MAX_BYTES)];

    if used.len() % 2 != 0 {
        warnings.push(ImageWarning::OddByteCount { len: used.len() });
    }

    let words: Vec<u16> = used
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();

    LoadedImage {
        memory: Memory::from_words(&words),
        warnings,
    }
}

/// Reads and decodes an image file.
///
/// # Errors
///
/// Returns [`ImageError::Read`] if the file cannot be read.
pub fn load_image_file(path: &Path) -> Result<LoadedImage, ImageError> {
    let bytes = fs::read(path).map_err(|source| ImageError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let image = decode_image(&bytes);
    for warning in &image.warnings {
        tracing::warn!(path = %path.display(), %warning, "image loaded with warnings");
    }
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "image loaded");

    Ok(image)
}

/// Where a program-table word lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Explicit address (masked to 12 bits).
    At(u16),
    /// One past the previously placed address.
    Next,
}

/// One word of an embedded program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramEntry {
    /// Target address.
    pub placement: Placement,
    /// Stored word.
    pub word: u16,
}

impl ProgramEntry {
    /// Raw word entry.
    #[must_use]
    pub const fn word(placement: Placement, word: u16) -> Self {
        Self { placement, word }
    }

    /// Instruction entry built from an opcode and its data field.
    #[must_use]
    pub const fn instruction(placement: Placement, opcode: Opcode, data: u16) -> Self {
        Self::word(placement, encode_instruction(opcode, data))
    }

    /// Entry built from its high and low bytes.
    #[must_use]
    pub const fn bytes(placement: Placement, high: u8, low: u8) -> Self {
        Self::word(placement, u16::from_be_bytes([high, low]))
    }
}

/// Lays a program table into a fresh memory image.
#[must_use]
pub fn load_program(entries: &[ProgramEntry]) -> Memory {
    let mut memory = Memory::new();
    let mut last = 0_u16;

    for entry in entries {
        let addr = match entry.placement {
            Placement::At(addr) => mask_address(addr),
            Placement::Next => mask_address(last.wrapping_add(1)),
        };
        memory.write(addr, entry.word);
        last = addr;
    }

    memory
}

/// Packs two characters into one packed-output word (first in bits 11..6).
/// `None` packs as the no-character code.
///
/// # Errors
///
/// Returns [`ImageError::UnpackableChar`] for characters outside the alphabet.
pub fn pack_pair(first: Option<char>, second: Option<char>) -> Result<u16, ImageError> {
    let code = |ch: Option<char>| match ch {
        None => Ok(PACKED_NONE),
        Some(ch) => packed_code(ch).ok_or(ImageError::UnpackableChar(ch)),
    };
    Ok((u16::from(code(first)?) << 6) | u16::from(code(second)?))
}

/// Packs a string two characters at a time, padding an odd tail with the
/// no-character code.
///
/// # Errors
///
/// Returns [`ImageError::UnpackableChar`] for characters outside the alphabet.
pub fn pack_str(text: &str) -> Result<Vec<u16>, ImageError> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(2)
        .map(|pair| pack_pair(pair.first().copied(), pair.get(1).copied()))
        .collect()
}

/// Shift operand for `LSHFT`/`RSHFT`: `amount` in the upper bits, bit 0
/// selects whether the preserve field is kept.
#[must_use]
pub fn shift_operand(amount: u16, keep_preserve: bool) -> u16 {
    mask_address((amount << 1) | u16::from(keep_preserve))
}
