use thiserror::Error;

use crate::encoding::Opcode;
use crate::memory::{mask_address, FAULT_VECTOR, INTERRUPT_REASON, INTERRUPT_RETURN};
use crate::CoreState;

/// Reason-code bases written to the interrupt-reason register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum InterruptReason {
    /// No specific reason recorded.
    Unknown = 0x0000,
    /// Unsupported instruction; the faulting opcode is added to this base.
    Unsupported = 0x0FF0,
}

impl InterruptReason {
    /// Returns the base code.
    #[must_use]
    pub const fn base(self) -> u16 {
        self as u16
    }
}

/// Unsupported-instruction faults and the reason codes they record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u16)]
pub enum FaultCode {
    /// `POP` executed; no stack exists.
    #[error("unsupported instruction POP")]
    UnsupportedPop = InterruptReason::Unsupported.base() + Opcode::Pop as u16,
    /// `PUSH` executed; no stack exists.
    #[error("unsupported instruction PUSH")]
    UnsupportedPush = InterruptReason::Unsupported.base() + Opcode::Push as u16,
}

impl FaultCode {
    /// Returns the fault raised by `opcode`, if it is unsupported.
    #[must_use]
    pub const fn for_opcode(opcode: Opcode) -> Option<Self> {
        match opcode {
            Opcode::Pop => Some(Self::UnsupportedPop),
            Opcode::Push => Some(Self::UnsupportedPush),
            _ => None,
        }
    }

    /// Reason code stored in the interrupt-reason register.
    #[must_use]
    pub const fn reason_code(self) -> u16 {
        self as u16
    }

    /// Converts a stored reason code back into a fault.
    #[must_use]
    pub const fn from_reason_code(code: u16) -> Option<Self> {
        match code {
            0x0FFD => Some(Self::UnsupportedPop),
            0x0FFE => Some(Self::UnsupportedPush),
            _ => None,
        }
    }
}

/// Register values written by one fault redirection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaultRedirect {
    /// Fault that triggered the redirection.
    pub code: FaultCode,
    /// Address stored in the interrupt-return register.
    pub return_pc: u16,
}

/// Reroutes control for a fault raised by the instruction at `pc`.
///
/// Writes `pc + 1` to the interrupt-return register, the reason code to the
/// interrupt-reason register and moves PC to the fault vector. The software
/// at the fault vector decides what happens next.
pub fn redirect_fault(state: &mut CoreState, pc: u16, code: FaultCode) -> FaultRedirect {
    let return_pc = mask_address(pc.wrapping_add(1));

    state.memory.write(INTERRUPT_RETURN, return_pc);
    state.memory.write(INTERRUPT_REASON, code.reason_code());
    state.arch.set_pc(FAULT_VECTOR);

    tracing::debug!(fault = %code, pc, return_pc, "redirected to fault vector");

    FaultRedirect { code, return_pc }
}
