//! Instruction execution pipeline for the SMA16 accumulator machine.
//!
//! Execution runs in two phases. `execute_instruction` reads the machine
//! state, performs memory-mapped output side effects and records the
//! register/memory changes in an [`ExecuteState`]. `commit_execution` then
//! applies them. Unsupported opcodes skip the commit and go through the
//! fault redirector instead.

mod flags;
mod helpers;

pub use flags::TestFlagUpdate;
pub use helpers::{add_to_data_field, and_mask, shift_accumulator, ShiftDirection};

use crate::decoder::{DecodedInstruction, Decoder};
use crate::encoding::Opcode;
use crate::fault::{redirect_fault, FaultCode};
use crate::memory::mask_address;
use crate::state::{data_field, preserve_field, HaltCause, RunState};
use crate::{CoreConfig, CoreState, MmioBus, StepOutcome, TraceEvent, TraceSink};

/// Outcome of executing a single instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecuteOutcome {
    /// Instruction completed normally.
    Retired,
    /// `HALT` executed.
    Halted,
    /// Unsupported opcode; nothing was committed.
    Fault {
        /// Fault to hand to the redirector.
        code: FaultCode,
    },
}

/// Pending memory write recorded during execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryWrite {
    /// Target address (already masked).
    pub addr: u16,
    /// Full 16-bit value to store.
    pub value: u16,
}

/// Side effects accumulated by one instruction before commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecuteState {
    /// New accumulator value.
    pub accumulator: Option<u16>,
    /// Memory write to apply.
    pub memory_write: Option<MemoryWrite>,
    /// Test flag update.
    pub test_update: TestFlagUpdate,
    /// PC after commit.
    pub next_pc: u16,
    /// Whether the halt flag is raised.
    pub halt: bool,
}

impl ExecuteState {
    /// Creates an execute state that only advances to `next_pc`.
    #[must_use]
    pub const fn advancing_to(next_pc: u16) -> Self {
        Self {
            accumulator: None,
            memory_write: None,
            test_update: TestFlagUpdate::Unchanged,
            next_pc,
            halt: false,
        }
    }
}

/// Executes a single decoded instruction against the current state.
///
/// Output side effects (characters, the halt marker) reach `bus` here. The
/// state itself is untouched; apply the returned [`ExecuteState`] with
/// [`commit_execution`] unless the outcome is a fault.
pub fn execute_instruction(
    instr: &DecodedInstruction,
    state: &CoreState,
    bus: &mut dyn MmioBus,
    config: &CoreConfig,
) -> (ExecuteOutcome, ExecuteState) {
    let pc = state.arch.pc();
    let next_pc = mask_address(pc.wrapping_add(1));
    let mut exec = ExecuteState::advancing_to(next_pc);

    match instr.opcode {
        Opcode::Halt => execute_halt(bus, config, &mut exec),
        Opcode::Jump => exec.next_pc = instr.operand,
        Opcode::Jumpz => {
            if state.arch.test() {
                exec.next_pc = instr.operand;
            }
        }
        Opcode::Load => exec.accumulator = Some(state.memory.read(instr.operand)),
        Opcode::Store => execute_store(instr, state, bus, &mut exec),
        Opcode::Sfull => execute_sfull(instr, state, bus, &mut exec),
        Opcode::Lshft => {
            let acc =
                shift_accumulator(state.arch.accumulator(), instr.operand, ShiftDirection::Left);
            exec.accumulator = Some(acc);
        }
        Opcode::Rshft => {
            let acc =
                shift_accumulator(state.arch.accumulator(), instr.operand, ShiftDirection::Right);
            exec.accumulator = Some(acc);
        }
        Opcode::Xor => exec.accumulator = Some(state.arch.accumulator() ^ instr.operand),
        Opcode::And => exec.accumulator = Some(state.arch.accumulator() & and_mask(instr.operand)),
        Opcode::Add => {
            let acc = add_to_data_field(state.arch.accumulator(), instr.operand);
            exec.accumulator = Some(acc);
            exec.test_update = TestFlagUpdate::Set(acc == 0);
        }
        Opcode::Pop => {
            let code = FaultCode::UnsupportedPop;
            return (ExecuteOutcome::Fault { code }, exec);
        }
        Opcode::Push => {
            let code = FaultCode::UnsupportedPush;
            return (ExecuteOutcome::Fault { code }, exec);
        }
        Opcode::Unassigned1 | Opcode::UnassignedC | Opcode::Noop => {}
    }

    if exec.halt {
        return (ExecuteOutcome::Halted, exec);
    }

    (ExecuteOutcome::Retired, exec)
}

/// Applies the recorded side effects of a non-faulting instruction.
pub fn commit_execution(state: &mut CoreState, exec: &ExecuteState) {
    if let Some(write) = exec.memory_write {
        state.memory.write(write.addr, write.value);
    }

    if let Some(acc) = exec.accumulator {
        state.arch.set_accumulator(acc);
    }

    state.arch.set_test(exec.test_update.apply(state.arch.test()));
    state.arch.set_pc(exec.next_pc);

    if exec.halt {
        state.arch.set_halt(true);
    }
}

fn execute_halt(bus: &mut dyn MmioBus, config: &CoreConfig, exec: &mut ExecuteState) {
    emit_marker(bus, config, &config.halt_marker);
    exec.halt = true;
}

fn execute_store(
    instr: &DecodedInstruction,
    state: &CoreState,
    bus: &mut dyn MmioBus,
    exec: &mut ExecuteState,
) {
    let addr = instr.operand;
    let data = data_field(state.arch.accumulator());

    notify_bus(bus, addr, data);

    exec.memory_write = Some(MemoryWrite {
        addr,
        value: preserve_field(state.memory.read(addr)) | data,
    });
}

fn execute_sfull(
    instr: &DecodedInstruction,
    state: &CoreState,
    bus: &mut dyn MmioBus,
    exec: &mut ExecuteState,
) {
    let addr = instr.operand;
    let value = state.arch.accumulator();

    notify_bus(bus, addr, value);

    exec.memory_write = Some(MemoryWrite { addr, value });
}

fn notify_bus(bus: &mut dyn MmioBus, addr: u16, value: u16) {
    if let Err(err) = bus.write16(addr, value) {
        tracing::warn!(%err, addr, value, "memory-mapped output dropped");
    }
}

/// Writes a marker to the output stream, honoring the line-termination setting.
pub fn emit_marker(bus: &mut dyn MmioBus, config: &CoreConfig, marker: &str) {
    if let Err(err) = bus.emit_text(&config.render_marker(marker)) {
        tracing::warn!(%err, marker, "marker output dropped");
    }
}

/// Fetches, decodes and executes the instruction at PC.
///
/// The halt flag is not consulted here; the run loop decides whether to
/// call this at all.
pub fn step_one(
    state: &mut CoreState,
    bus: &mut dyn MmioBus,
    config: &CoreConfig,
    trace: &mut dyn TraceSink,
) -> StepOutcome {
    let pc = state.arch.pc();
    let instruction = Decoder::decode(state.memory.read(pc));
    tracing::trace!(
        pc,
        op = instruction.opcode.mnemonic(),
        operand = instruction.operand,
        "dispatch"
    );

    trace.on_event(TraceEvent::InstructionStart {
        pc,
        opcode: instruction.opcode,
        operand: instruction.operand,
        accumulator: state.arch.accumulator(),
    });

    let (outcome, exec_state) = execute_instruction(&instruction, state, bus, config);

    match outcome {
        ExecuteOutcome::Retired => {
            commit_execution(state, &exec_state);
            StepOutcome::Retired
        }
        ExecuteOutcome::Halted => {
            commit_execution(state, &exec_state);
            state.run_state = RunState::Halted(HaltCause::Instruction);
            StepOutcome::Halted
        }
        ExecuteOutcome::Fault { code } => {
            let redirect = redirect_fault(state, pc, code);
            trace.on_event(TraceEvent::FaultRedirected {
                code,
                return_pc: redirect.return_pc,
            });
            StepOutcome::FaultRedirected {
                code,
                return_pc: redirect.return_pc,
            }
        }
    }
}
