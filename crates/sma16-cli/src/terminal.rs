//! Terminal-backed resume decisions.

use std::io::{self, IsTerminal, Write};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use sma16_core::{ResumeEnvironment, RunOutcome};

const PRESS_PROMPT: &str = " Press C to continue, or any other key to exit.";

/// Builds the line printed when the machine halts.
pub fn halt_message(outcome: &RunOutcome, timed: bool, interactive: bool) -> String {
    if !interactive {
        return "System halted.".to_string();
    }
    if timed {
        format!(
            "System halted after {}us.{PRESS_PROMPT}",
            outcome.elapsed.as_micros()
        )
    } else {
        format!("System halted.{PRESS_PROMPT}")
    }
}

/// Keeps stdin in raw mode until dropped.
struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> io::Result<Self> {
        crossterm::terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = crossterm::terminal::disable_raw_mode();
    }
}

/// Maps a key press to the character a line-less `getchar` would see.
fn key_char(key: &KeyEvent) -> char {
    match key.code {
        KeyCode::Char(ch) if key.modifiers.contains(KeyModifiers::CONTROL) => {
            char::from_u32(u32::from(ch) & 0x1F).unwrap_or('\0')
        }
        KeyCode::Char(ch) => ch,
        KeyCode::Enter => '\n',
        KeyCode::Tab => '\t',
        KeyCode::Esc => '\u{1b}',
        _ => '\0',
    }
}

/// Resume environment over the process's stdin/stdout.
#[derive(Debug)]
pub struct TerminalEnvironment {
    interactive: bool,
    timed: bool,
    failure: Option<io::Error>,
}

impl TerminalEnvironment {
    /// Interactive when both stdin and stdout are terminals.
    pub fn detect(timed: bool) -> Self {
        Self {
            interactive: io::stdin().is_terminal() && io::stdout().is_terminal(),
            timed,
            failure: None,
        }
    }

    /// Terminal error that ended the session, if any.
    pub fn take_failure(&mut self) -> Option<io::Error> {
        self.failure.take()
    }

    fn read_key_raw() -> io::Result<char> {
        let _guard = RawModeGuard::enter()?;
        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                return Ok(key_char(&key));
            }
        }
    }
}

impl ResumeEnvironment for TerminalEnvironment {
    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn read_key(&mut self) -> Option<char> {
        match Self::read_key_raw() {
            Ok(ch) => Some(ch),
            Err(err) => {
                tracing::error!(%err, "could not read key");
                self.failure = Some(err);
                None
            }
        }
    }

    fn on_halt(&mut self, outcome: &RunOutcome, interactive: bool) {
        let mut out = io::stdout().lock();
        let written = writeln!(out, "{}", halt_message(outcome, self.timed, interactive))
            .and_then(|()| out.flush());
        if let Err(err) = written {
            tracing::warn!(%err, "halt message dropped");
        }
    }
}
