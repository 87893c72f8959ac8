//! Character console behind the ASCII and packed output registers.

use std::io::Write;

use crate::api::{MmioBus, MmioError, MmioWriteResult};
use crate::memory::{decode_fixed_register, FixedRegister};
use crate::peripherals::charset::unpack_pair;

/// Output device that renders register writes onto a byte stream.
///
/// Implements [`MmioBus`] for integration with the execution core.
#[derive(Debug)]
pub struct ConsoleDevice<W> {
    out: W,
    escape_newlines: bool,
}

impl<W: Write> ConsoleDevice<W> {
    /// Creates a console writing raw bytes to `out`.
    #[must_use]
    pub const fn new(out: W) -> Self {
        Self {
            out,
            escape_newlines: false,
        }
    }

    /// Renders ASCII-output newlines as the two characters `\n`.
    #[must_use]
    pub fn with_escaped_newlines(mut self, enabled: bool) -> Self {
        self.escape_newlines = enabled;
        self
    }

    /// Returns the underlying writer.
    #[must_use]
    pub const fn get_ref(&self) -> &W {
        &self.out
    }

    /// Consumes the console and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn put(&mut self, bytes: &[u8]) -> Result<(), MmioError> {
        self.out
            .write_all(bytes)
            .map_err(|err| MmioError::WriteFailed(err.kind()))
    }

    fn put_ascii(&mut self, value: u16) -> Result<(), MmioError> {
        let [_, byte] = value.to_be_bytes();
        if self.escape_newlines && byte == b'\n' {
            self.put(b"\\n")
        } else {
            self.put(&[byte])
        }
    }

    fn put_packed(&mut self, value: u16) -> Result<(), MmioError> {
        for byte in unpack_pair(value).into_iter().flatten() {
            self.put(&[byte])?;
        }
        Ok(())
    }
}

impl ConsoleDevice<Vec<u8>> {
    /// Creates a console that captures output in memory.
    #[must_use]
    pub const fn buffered() -> Self {
        Self::new(Vec::new())
    }

    /// Bytes emitted so far.
    #[must_use]
    pub fn output(&self) -> &[u8] {
        &self.out
    }
}

impl<W: Write> MmioBus for ConsoleDevice<W> {
    fn write16(&mut self, addr: u16, value: u16) -> Result<MmioWriteResult, MmioError> {
        match decode_fixed_register(addr) {
            Some(FixedRegister::AsciiOut) => {
                self.put_ascii(value)?;
                Ok(MmioWriteResult::Applied)
            }
            Some(FixedRegister::PackedOut) => {
                self.put_packed(value)?;
                Ok(MmioWriteResult::Applied)
            }
            _ => Ok(MmioWriteResult::Ignored),
        }
    }

    fn emit_text(&mut self, text: &str) -> Result<(), MmioError> {
        self.put(text.as_bytes())
    }

    fn flush(&mut self) -> Result<(), MmioError> {
        self.out
            .flush()
            .map_err(|err| MmioError::WriteFailed(err.kind()))
    }
}
