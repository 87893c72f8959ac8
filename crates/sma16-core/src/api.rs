//! Public host-facing API contracts for embedding the SMA16 core.

use std::io;
use std::time::Duration;

use thiserror::Error;

use crate::encoding::Opcode;
use crate::fault::FaultCode;
use crate::memory::Memory;
use crate::state::{ArchitecturalState, HaltCause, RunState};

/// Marker emitted when a `HALT` instruction executes.
pub const DEFAULT_HALT_MARKER: &str = "HALT";

/// Marker emitted when the host stop signal is observed.
pub const DEFAULT_STOP_MARKER: &str = " USER HALT";

/// Top-level immutable configuration for a core instance.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CoreConfig {
    /// Text emitted on the output stream when `HALT` executes.
    pub halt_marker: String,
    /// Text emitted on the output stream when a stop request is observed.
    pub stop_marker: String,
    /// Appends a newline after each marker.
    pub line_terminated_markers: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            halt_marker: DEFAULT_HALT_MARKER.to_string(),
            stop_marker: DEFAULT_STOP_MARKER.to_string(),
            line_terminated_markers: true,
        }
    }
}

impl CoreConfig {
    /// Renders `marker` the way it is written to the output stream.
    #[must_use]
    pub fn render_marker(&self, marker: &str) -> String {
        if self.line_terminated_markers {
            format!("{marker}\n")
        } else {
            marker.to_string()
        }
    }
}

/// Complete machine state: registers, memory and control state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CoreState {
    /// Accumulator, PC and flags.
    pub arch: ArchitecturalState,
    /// 4096-word memory image.
    pub memory: Memory,
    /// Current control state.
    pub run_state: RunState,
}

impl CoreState {
    /// Creates a reset machine (PC at the reset vector) over `memory`.
    #[must_use]
    pub fn with_memory(memory: Memory) -> Self {
        Self {
            arch: ArchitecturalState::default(),
            memory,
            run_state: RunState::Running,
        }
    }

    /// Clears the halt flag and returns to running.
    ///
    /// PC, memory, accumulator and test flag are left exactly as they were
    /// at the moment of the halt. Returns `false` (and changes nothing) if
    /// the machine was not halted.
    pub fn resume(&mut self) -> bool {
        if !self.run_state.is_resumable() {
            return false;
        }
        self.arch.set_halt(false);
        self.run_state = RunState::Running;
        tracing::debug!(pc = self.arch.pc(), "resumed");
        true
    }

    /// Marks the machine as terminated.
    pub fn terminate(&mut self) {
        self.run_state = RunState::Terminated;
    }
}

/// Output adapter failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum MmioError {
    /// The underlying stream rejected the write.
    #[error("output write failed: {0}")]
    WriteFailed(io::ErrorKind),
}

/// Result categories for memory-mapped writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MmioWriteResult {
    /// The address is an output register and the side effect happened.
    Applied,
    /// The address has no side effect; only the memory write happens.
    Ignored,
}

/// Memory-mapped output bus consulted before every store.
pub trait MmioBus {
    /// Observes a write of `value` to `addr` before memory is updated.
    ///
    /// # Errors
    ///
    /// Returns [`MmioError::WriteFailed`] when the output stream rejects a
    /// character.
    fn write16(&mut self, addr: u16, value: u16) -> Result<MmioWriteResult, MmioError>;

    /// Appends marker text (halt markers) to the output stream.
    ///
    /// # Errors
    ///
    /// Returns [`MmioError::WriteFailed`] when the output stream rejects it.
    fn emit_text(&mut self, text: &str) -> Result<(), MmioError>;

    /// Flushes buffered output.
    ///
    /// # Errors
    ///
    /// Returns [`MmioError::WriteFailed`] when the flush fails.
    fn flush(&mut self) -> Result<(), MmioError> {
        Ok(())
    }
}

/// Output status from one instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepOutcome {
    /// Instruction completed; execution continues.
    Retired,
    /// `HALT` executed.
    Halted,
    /// An unsupported opcode redirected control to the fault vector.
    FaultRedirected {
        /// Fault raised.
        code: FaultCode,
        /// Address stored in the interrupt-return register.
        return_pc: u16,
    },
}

/// Aggregated outcome of one RUNNING phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunOutcome {
    /// Instructions dispatched during this phase.
    pub steps: u64,
    /// What stopped the phase.
    pub cause: HaltCause,
    /// PC at the moment of the halt.
    pub pc: u16,
    /// Wall-clock duration of the phase.
    pub elapsed: Duration,
}

/// Trace events emitted at instruction and phase boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceEvent {
    /// A RUNNING phase begins.
    RunStarted {
        /// PC of the first instruction.
        pc: u16,
    },
    /// Instruction fetched, not yet executed.
    InstructionStart {
        /// Address of the instruction.
        pc: u16,
        /// Decoded opcode.
        opcode: Opcode,
        /// 12-bit operand.
        operand: u16,
        /// Accumulator before execution.
        accumulator: u16,
    },
    /// Control rerouted to the fault vector.
    FaultRedirected {
        /// Fault raised.
        code: FaultCode,
        /// Address stored in the interrupt-return register.
        return_pc: u16,
    },
    /// Instruction finished, stop signal already checked.
    InstructionRetired {
        /// PC of the next instruction.
        pc: u16,
    },
    /// The RUNNING phase ended.
    RunHalted {
        /// What stopped the phase.
        cause: HaltCause,
        /// Instructions dispatched during the phase.
        steps: u64,
    },
}

/// Sink for trace hooks.
pub trait TraceSink {
    /// Records an event in execution order.
    fn on_event(&mut self, event: TraceEvent);
}

/// Trace sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTrace;

impl TraceSink for NoTrace {
    fn on_event(&mut self, _event: TraceEvent) {}
}

impl TraceSink for Vec<TraceEvent> {
    fn on_event(&mut self, event: TraceEvent) {
        self.push(event);
    }
}
