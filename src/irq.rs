/*
 * IRQ Kinds and Dispatch Outcome
 *
 * The four interrupt kinds the simulator can raise, and the two values
 * `Kernel::dispatch` can return. `dispatch` never returns a `Result`:
 * both "a process was dispatched" and "the kernel halted" are ordinary
 * control flow from the simulator's point of view, not failures of the
 * dispatcher itself (see the error-handling design notes).
 */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IrqKind {
    Reset,
    Syscall,
    CpuError,
    Clock,
}

impl TryFrom<u8> for IrqKind {
    type Error = crate::error::KernelError;

    /// The one place raw simulator IRQ numbers are decoded; `Kernel::dispatch`
    /// itself only ever sees an `IrqKind`.
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(IrqKind::Reset),
            1 => Ok(IrqKind::Syscall),
            2 => Ok(IrqKind::CpuError),
            3 => Ok(IrqKind::Clock),
            other => Err(crate::error::KernelError::UnknownIrqKind(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A process was dispatched; the simulator may resume (return code 0).
    Dispatched,
    /// No runnable process exists, or the kernel halted after a
    /// kernel-fatal error; the simulator should idle (return code 1).
    Idle,
}

impl DispatchOutcome {
    pub fn as_code(self) -> u8 {
        match self {
            DispatchOutcome::Dispatched => 0,
            DispatchOutcome::Idle => 1,
        }
    }
}

/// CPU error codes the dispatcher recognizes on a CPU_ERROR IRQ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuErrorCode {
    PageAbsent,
    Other(u32),
}

impl From<u32> for CpuErrorCode {
    fn from(code: u32) -> Self {
        // By simulator convention, 1 means "page absent"; every other
        // value is an ordinary (process-fatal) CPU error.
        if code == 1 {
            CpuErrorCode::PageAbsent
        } else {
            CpuErrorCode::Other(code)
        }
    }
}
