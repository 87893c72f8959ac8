//! End-to-end programs through the run loop and halt/resume controller.

#![allow(clippy::pedantic, clippy::nursery)]

use std::collections::VecDeque;

use proptest as _;
use rstest::rstest;
#[cfg(feature = "serde")]
use serde as _;
#[cfg(not(feature = "serde"))]
use serde_json as _;
use sma16_core::{
    decode_image, encode_instruction, load_program, pack_str, shift_operand, ConsoleDevice,
    CoreConfig, HaltCause, Machine, Memory, NoTrace, Opcode, Placement, ProgramEntry,
    ResumeEnvironment, RunOutcome, RunState, TraceEvent, Unattended, ASCII_OUT, PACKED_OUT,
};
use tempfile as _;
use thiserror as _;
use tracing as _;

struct ScriptedKeys {
    interactive: bool,
    keys: VecDeque<char>,
    halts: Vec<(RunOutcome, bool)>,
}

impl ScriptedKeys {
    fn interactive(keys: &str) -> Self {
        Self {
            interactive: true,
            keys: keys.chars().collect(),
            halts: Vec::new(),
        }
    }
}

impl ResumeEnvironment for ScriptedKeys {
    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn read_key(&mut self) -> Option<char> {
        self.keys.pop_front()
    }

    fn on_halt(&mut self, outcome: &RunOutcome, interactive: bool) {
        self.halts.push((*outcome, interactive));
    }
}

fn machine(memory: Memory) -> Machine<ConsoleDevice<Vec<u8>>> {
    Machine::new(memory, ConsoleDevice::buffered(), CoreConfig::default())
}

/// `[LOAD 0x010][STORE 0x00A][HALT]` with 'A' at 0x010, as an image file.
fn print_a_image() -> Vec<u8> {
    let mut words = vec![
        encode_instruction(Opcode::Load, 0x010),
        encode_instruction(Opcode::Store, ASCII_OUT),
        encode_instruction(Opcode::Halt, 0),
    ];
    words.resize(0x010, 0);
    words.push(0x0041);
    words.iter().flat_map(|word| word.to_be_bytes()).collect()
}

#[test]
fn load_store_halt_prints_character_and_marker() {
    let image = decode_image(&print_a_image());
    let mut machine = machine(image.memory);

    let outcome = machine.run_session(&mut NoTrace, &mut Unattended);

    assert_eq!(outcome.runs, 1);
    assert_eq!(outcome.last.pc, 3);
    assert_eq!(machine.bus().output(), b"AHALT\n");
}

#[rstest]
#[case::lower('c')]
#[case::upper('C')]
fn resume_key_continues_from_next_address(#[case] key: char) {
    let memory = load_program(&[
        ProgramEntry::instruction(Placement::At(0x000), Opcode::Xor, 0x00F),
        ProgramEntry::instruction(Placement::Next, Opcode::Add, 0x000),
        ProgramEntry::instruction(Placement::Next, Opcode::Halt, 0),
        ProgramEntry::instruction(Placement::Next, Opcode::Store, ASCII_OUT),
        ProgramEntry::instruction(Placement::Next, Opcode::Halt, 0),
    ]);
    let mut machine = machine(memory);
    let mut env = ScriptedKeys::interactive(&format!("{key}q"));

    let outcome = machine.run_session(&mut NoTrace, &mut env);

    assert_eq!(outcome.runs, 2);
    assert_eq!(env.halts[0].0.pc, 3);
    assert_eq!(env.halts[1].0.pc, 5);
    assert!(env.halts.iter().all(|(_, interactive)| *interactive));
    // XOR placed 0x00F; STORE after resume still sees it.
    assert_eq!(machine.bus().output(), b"HALT\n\x0fHALT\n");
    assert_eq!(machine.state().arch.accumulator(), 0x000F);
}

#[test]
fn other_key_terminates_without_further_output() {
    let memory = Memory::from_words(&[
        encode_instruction(Opcode::Halt, 0),
        encode_instruction(Opcode::Store, ASCII_OUT),
    ]);
    let mut machine = machine(memory);
    let mut env = ScriptedKeys::interactive("x");

    let outcome = machine.run_session(&mut NoTrace, &mut env);

    assert_eq!(outcome.runs, 1);
    assert_eq!(machine.state().run_state, RunState::Terminated);
    assert_eq!(machine.bus().output(), b"HALT\n");
}

#[test]
fn no_key_available_terminates() {
    let mut machine = machine(Memory::new());
    let mut env = ScriptedKeys::interactive("");

    let outcome = machine.run_session(&mut NoTrace, &mut env);

    assert_eq!(outcome.runs, 1);
    assert_eq!(machine.state().run_state, RunState::Terminated);
}

#[test]
fn non_interactive_environment_is_never_asked_for_a_key() {
    let mut machine = machine(Memory::new());
    let mut env = ScriptedKeys {
        interactive: false,
        keys: "c".chars().collect(),
        halts: Vec::new(),
    };

    machine.run_session(&mut NoTrace, &mut env);

    assert_eq!(env.keys.len(), 1);
    assert_eq!(env.halts.len(), 1);
    assert!(!env.halts[0].1);
}

#[test]
fn stop_request_interrupts_an_endless_loop() {
    let memory = Memory::from_words(&[
        encode_instruction(Opcode::Noop, 0),
        encode_instruction(Opcode::Jump, 0x000),
    ]);
    let mut machine = machine(memory);
    machine.stop_signal().raise();

    let outcome = machine.run(&mut NoTrace);

    assert_eq!(outcome.cause, HaltCause::StopRequested);
    assert_eq!(outcome.steps, 1);
    assert_eq!(outcome.pc, 1);
    assert_eq!(machine.bus().output(), b" USER HALT\n");

    assert!(machine.resume());
    machine.stop_signal().raise();
    let outcome = machine.run(&mut NoTrace);
    assert_eq!(outcome.pc, 0);
}

#[test]
fn stop_request_from_another_thread() {
    let memory = Memory::from_words(&[encode_instruction(Opcode::Jump, 0x000)]);
    let mut machine = machine(memory);
    let stop = machine.stop_signal();

    let raiser = std::thread::spawn(move || {
        std::thread::sleep(std::time::Duration::from_millis(10));
        stop.raise();
    });
    let outcome = machine.run(&mut NoTrace);
    raiser.join().expect("raiser thread");

    assert_eq!(outcome.cause, HaltCause::StopRequested);
    assert!(outcome.steps >= 1);
}

#[test]
fn fault_handler_can_return_through_interrupt_registers() {
    // POP at 0x040 faults; the handler at 0x001 prints the low byte of the
    // reason code and halts.
    let memory = load_program(&[
        ProgramEntry::instruction(Placement::At(0x000), Opcode::Jump, 0x040),
        ProgramEntry::instruction(Placement::Next, Opcode::Load, 0x008),
        ProgramEntry::instruction(Placement::At(0x002), Opcode::Store, ASCII_OUT),
        ProgramEntry::instruction(Placement::Next, Opcode::Halt, 0),
        ProgramEntry::instruction(Placement::At(0x040), Opcode::Pop, 0),
    ]);
    let mut machine = machine(memory);
    let mut events = Vec::new();

    machine.run(&mut events);

    assert_eq!(machine.state().memory.read(0x009), 0x041);
    assert_eq!(machine.bus().output(), b"\xfdHALT\n");
    assert!(events.iter().any(|event| matches!(
        event,
        TraceEvent::FaultRedirected { return_pc: 0x041, .. }
    )));
}

#[test]
fn packed_greeting_program() {
    let mut entries = vec![ProgramEntry::instruction(
        Placement::At(0x000),
        Opcode::Jump,
        0x040,
    )];
    let words = pack_str("Hi 42").expect("packable");
    for (offset, word) in words.iter().enumerate() {
        let addr = 0x030 + u16::try_from(offset).expect("small offset");
        entries.push(ProgramEntry::word(Placement::At(addr), *word));
    }
    let mut placement = Placement::At(0x040);
    for offset in 0..words.len() {
        let addr = 0x030 + u16::try_from(offset).expect("small offset");
        entries.push(ProgramEntry::instruction(placement, Opcode::Load, addr));
        entries.push(ProgramEntry::instruction(Placement::Next, Opcode::Store, PACKED_OUT));
        placement = Placement::Next;
    }
    entries.push(ProgramEntry::instruction(Placement::Next, Opcode::Halt, 0));
    let mut machine = machine(load_program(&entries));

    machine.run_session(&mut NoTrace, &mut Unattended);

    assert_eq!(machine.bus().output(), b"Hi 42HALT\n");
}

#[test]
fn shift_operand_builds_working_shifts() {
    let memory = load_program(&[
        ProgramEntry::instruction(Placement::At(0x000), Opcode::Xor, 0x041),
        ProgramEntry::instruction(Placement::Next, Opcode::Lshft, shift_operand(4, false)),
        ProgramEntry::instruction(Placement::Next, Opcode::Rshft, shift_operand(4, false)),
        ProgramEntry::instruction(Placement::Next, Opcode::Store, ASCII_OUT),
        ProgramEntry::instruction(Placement::Next, Opcode::Halt, 0),
    ]);
    let mut machine = machine(memory);

    machine.run(&mut NoTrace);

    assert_eq!(machine.bus().output(), b"AHALT\n");
}

#[cfg(feature = "serde")]
#[test]
fn halted_state_survives_serde_round_trip() {
    let mut machine = machine(decode_image(&print_a_image()).memory);
    machine.run(&mut NoTrace);
    let (state, _) = machine.into_parts();

    let json = serde_json::to_string(&state).expect("serialize");
    let restored: sma16_core::CoreState = serde_json::from_str(&json).expect("deserialize");

    assert_eq!(restored, state);
    assert_eq!(
        restored.run_state,
        RunState::Halted(HaltCause::Instruction)
    );
}
