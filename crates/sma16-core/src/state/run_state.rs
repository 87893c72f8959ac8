/// Why the run loop left the running state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum HaltCause {
    /// A `HALT` instruction executed.
    Instruction,
    /// The host raised the stop signal.
    StopRequested,
}

/// Host-observable control state of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RunState {
    /// Instructions are being dispatched.
    #[default]
    Running,
    /// Dispatch stopped; PC, memory and registers keep their last values.
    Halted(HaltCause),
    /// The host declined to resume. No further progress is possible.
    Terminated,
}

impl RunState {
    /// Returns the halt cause, if this state is halted.
    #[must_use]
    pub const fn halt_cause(self) -> Option<HaltCause> {
        match self {
            Self::Halted(cause) => Some(cause),
            Self::Running | Self::Terminated => None,
        }
    }

    /// Returns `true` if the host may resume from this state.
    #[must_use]
    pub const fn is_resumable(self) -> bool {
        matches!(self, Self::Halted(_))
    }
}
