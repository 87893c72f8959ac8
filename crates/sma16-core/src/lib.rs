//! Execution core for the SMA16 accumulator virtual machine.

/// Memory model primitives and fixed register map.
pub mod memory;
pub use memory::{
    decode_fixed_register, mask_address, FixedRegister, Memory, ADDRESS_MASK, ASCII_OUT,
    FAULT_VECTOR, FIXED_REGISTERS, INTERRUPT_REASON, INTERRUPT_RETURN, MEMORY_CONF, MEMORY_WORDS,
    PACKED_OUT, RESET_VECTOR, SOFTWARE_VECTOR, TERM_CONF,
};

/// Public host-facing API contract and integration types.
pub mod api;
pub use api::{
    CoreConfig, CoreState, MmioBus, MmioError, MmioWriteResult, NoTrace, RunOutcome, StepOutcome,
    TraceEvent, TraceSink, DEFAULT_HALT_MARKER, DEFAULT_STOP_MARKER,
};

/// Architectural CPU state model primitives.
pub mod state;
pub use state::{
    data_field, preserve_field, ArchitecturalState, HaltCause, RunState, DATA_MASK, PRESERVE_MASK,
};

/// Opcode table and instruction word fields.
pub mod encoding;
pub use encoding::{encode_instruction, opcode_field, operand_field, Opcode};

/// Instruction decoder.
pub mod decoder;
pub use decoder::{DecodedInstruction, Decoder};

/// Unsupported-instruction faults and the fault redirector.
pub mod fault;
pub use fault::{redirect_fault, FaultCode, FaultRedirect, InterruptReason};

/// Output devices behind the memory-mapped registers.
pub mod peripherals;
pub use peripherals::{
    packed_char, packed_code, unpack_pair, ConsoleDevice, PACKED_NONE, PACKED_SPACE,
};

/// Instruction execution pipeline.
pub mod execute;
pub use execute::{
    commit_execution, emit_marker, execute_instruction, step_one, ExecuteOutcome, ExecuteState,
    MemoryWrite, TestFlagUpdate,
};

/// Host stop requests.
pub mod stop;
pub use stop::StopSignal;

/// Run loop and halt/resume controller.
pub mod session;
pub use session::{
    is_resume_key, run_until_halt, Machine, ResumeEnvironment, SessionOutcome, Unattended,
};

/// Memory image files and embedded program tables.
pub mod image;
pub use image::{
    decode_image, load_image_file, load_program, pack_pair, pack_str, shift_operand, ImageError,
    ImageWarning, LoadedImage, Placement, ProgramEntry, IMAGE_MAX_BYTES,
};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
#[cfg(test)]
use serde_json as _;
