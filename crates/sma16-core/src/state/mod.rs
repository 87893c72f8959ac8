//! Architectural CPU state model primitives.

/// Accumulator, program counter and flag storage.
pub mod registers;
/// Halt/resume control states.
pub mod run_state;

pub use registers::{
    data_field, preserve_field, ArchitecturalState, DATA_MASK, PRESERVE_MASK,
};
pub use run_state::{HaltCause, RunState};
