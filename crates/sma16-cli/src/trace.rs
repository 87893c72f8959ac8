//! Debug table rendered alongside program output.

use std::io::Write;

use sma16_core::{data_field, preserve_field, TraceEvent, TraceSink};

const RULE: &str = "+---------+-----+-------+--- -- -- - - -";
const TITLE: &str = "| [ ACC ] | PC  | PROG  | -> OUTPUT";

/// Trace sink printing one table row per instruction.
///
/// Each row is opened before the instruction executes, so characters and
/// markers the instruction emits land in the OUTPUT column. The row is
/// closed after the stop check.
#[derive(Debug)]
pub struct DebugTrace<W> {
    out: W,
}

impl<W: Write> DebugTrace<W> {
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn render(&mut self, event: TraceEvent) -> std::io::Result<()> {
        match event {
            TraceEvent::RunStarted { .. } => {
                writeln!(self.out, "{RULE}")?;
                writeln!(self.out, "{TITLE}")?;
                writeln!(self.out, "{RULE}")
            }
            TraceEvent::InstructionStart {
                pc,
                opcode,
                operand,
                accumulator,
            } => write!(
                self.out,
                "| [{:01x}:{:03x}] | {pc:03x} | {:01x}:{operand:03x} | -> ",
                preserve_field(accumulator) >> 12,
                data_field(accumulator),
                opcode.as_u4(),
            ),
            TraceEvent::InstructionRetired { .. } => writeln!(self.out),
            TraceEvent::RunHalted { .. } => {
                writeln!(self.out, "{RULE}")?;
                self.out.flush()
            }
            TraceEvent::FaultRedirected { .. } => Ok(()),
        }
    }
}

impl<W: Write> TraceSink for DebugTrace<W> {
    fn on_event(&mut self, event: TraceEvent) {
        if let Err(err) = self.render(event) {
            tracing::warn!(%err, "debug table output failed");
        }
    }
}
