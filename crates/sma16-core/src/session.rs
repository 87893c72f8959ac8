//! Run loop and halt/resume controller.

use std::time::Instant;

use crate::execute::{emit_marker, step_one};
use crate::memory::Memory;
use crate::state::{HaltCause, RunState};
use crate::stop::StopSignal;
use crate::{CoreConfig, CoreState, MmioBus, RunOutcome, StepOutcome, TraceEvent, TraceSink};

/// Host side of the halt/resume decision.
pub trait ResumeEnvironment {
    /// Whether both input and output are attended.
    fn is_interactive(&self) -> bool;

    /// Reads a single key. `None` means no key could be read.
    fn read_key(&mut self) -> Option<char>;

    /// Called once per halt, before any key is read.
    fn on_halt(&mut self, _outcome: &RunOutcome, _interactive: bool) {}
}

/// Environment that never resumes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unattended;

impl ResumeEnvironment for Unattended {
    fn is_interactive(&self) -> bool {
        false
    }

    fn read_key(&mut self) -> Option<char> {
        None
    }
}

/// Returns whether `key` is the resume key.
#[must_use]
pub const fn is_resume_key(key: char) -> bool {
    matches!(key, 'c' | 'C')
}

/// Dispatches instructions until the halt flag is set.
///
/// The stop signal is consumed after every dispatch. An observed stop
/// forces the halt flag and writes the stop marker; when the same
/// instruction was a `HALT`, both markers appear and the cause stays
/// [`HaltCause::Instruction`].
pub fn run_until_halt(
    state: &mut CoreState,
    bus: &mut dyn MmioBus,
    config: &CoreConfig,
    stop: &StopSignal,
    trace: &mut dyn TraceSink,
) -> RunOutcome {
    let started = Instant::now();
    let mut steps = 0_u64;

    trace.on_event(TraceEvent::RunStarted { pc: state.arch.pc() });

    while !state.arch.halt() {
        let outcome = step_one(state, bus, config, trace);
        steps += 1;

        if stop.take() {
            state.arch.set_halt(true);
            emit_marker(bus, config, &config.stop_marker);
            if outcome != StepOutcome::Halted {
                state.run_state = RunState::Halted(HaltCause::StopRequested);
            }
            tracing::debug!(pc = state.arch.pc(), "stop request observed");
        }

        trace.on_event(TraceEvent::InstructionRetired { pc: state.arch.pc() });
    }

    let cause = state
        .run_state
        .halt_cause()
        .unwrap_or(HaltCause::Instruction);
    if state.run_state == RunState::Running {
        state.run_state = RunState::Halted(cause);
    }

    let elapsed = started.elapsed();
    trace.on_event(TraceEvent::RunHalted { cause, steps });
    tracing::debug!(steps, pc = state.arch.pc(), ?cause, "run halted");

    RunOutcome {
        steps,
        cause,
        pc: state.arch.pc(),
        elapsed,
    }
}

/// Totals across every RUNNING phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOutcome {
    /// Number of RUNNING phases.
    pub runs: u32,
    /// Instructions dispatched across all phases.
    pub steps: u64,
    /// Outcome of the final phase.
    pub last: RunOutcome,
}

/// A machine wired to its output bus and stop signal.
#[derive(Debug)]
pub struct Machine<B> {
    state: CoreState,
    bus: B,
    config: CoreConfig,
    stop: StopSignal,
}

impl<B: MmioBus> Machine<B> {
    /// Creates a machine at reset over `memory`.
    pub fn new(memory: Memory, bus: B, config: CoreConfig) -> Self {
        Self::from_state(CoreState::with_memory(memory), bus, config)
    }

    /// Wraps an existing state.
    pub fn from_state(state: CoreState, bus: B, config: CoreConfig) -> Self {
        Self {
            state,
            bus,
            config,
            stop: StopSignal::new(),
        }
    }

    /// Handle for requesting a stop from elsewhere.
    #[must_use]
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Current machine state.
    #[must_use]
    pub const fn state(&self) -> &CoreState {
        &self.state
    }

    /// Output bus.
    #[must_use]
    pub const fn bus(&self) -> &B {
        &self.bus
    }

    /// Executes exactly one instruction, ignoring the halt flag.
    pub fn step(&mut self, trace: &mut dyn TraceSink) -> StepOutcome {
        step_one(&mut self.state, &mut self.bus, &self.config, trace)
    }

    /// Runs until the next halt.
    pub fn run(&mut self, trace: &mut dyn TraceSink) -> RunOutcome {
        let outcome = run_until_halt(
            &mut self.state,
            &mut self.bus,
            &self.config,
            &self.stop,
            trace,
        );
        if let Err(err) = self.bus.flush() {
            tracing::warn!(%err, "output flush failed");
        }
        outcome
    }

    /// Clears the halt flag; see [`CoreState::resume`].
    pub fn resume(&mut self) -> bool {
        self.state.resume()
    }

    /// Alternates RUNNING and HALTED phases until the environment declines
    /// to resume.
    pub fn run_session(
        &mut self,
        trace: &mut dyn TraceSink,
        env: &mut dyn ResumeEnvironment,
    ) -> SessionOutcome {
        let mut runs = 0_u32;
        let mut steps = 0_u64;

        loop {
            let last = self.run(trace);
            runs += 1;
            steps += last.steps;

            let interactive = env.is_interactive();
            env.on_halt(&last, interactive);

            let key = if interactive { env.read_key() } else { None };
            if key.is_some_and(is_resume_key) && self.resume() {
                continue;
            }

            tracing::debug!(runs, steps, ?key, "session terminated");
            self.state.terminate();
            return SessionOutcome { runs, steps, last };
        }
    }

    /// Splits the machine into its state and bus.
    pub fn into_parts(self) -> (CoreState, B) {
        (self.state, self.bus)
    }
}
