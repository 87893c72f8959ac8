//! Test-flag update behaviors for different instructions.

/// Describes how the test flag changes after an instruction executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TestFlagUpdate {
    /// Flag keeps its value. Every instruction except `ADD`.
    #[default]
    Unchanged,
    /// Flag is overwritten. Only `ADD` produces this.
    Set(bool),
}

impl TestFlagUpdate {
    /// Applies the update to the current flag value.
    #[must_use]
    pub const fn apply(self, current: bool) -> bool {
        match self {
            Self::Unchanged => current,
            Self::Set(value) => value,
        }
    }
}
