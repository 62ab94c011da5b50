/*
 * Kernel Error Types
 *
 * The single error surface used throughout the kernel. Every internal
 * fallible operation (frame allocation, MMU access, disk reads, process
 * lookups) returns `Result<T, KernelError>`; callers match on
 * `severity()` rather than re-deriving process-fatal vs. kernel-fatal at
 * each call site. `anyhow` is reserved for the binary/simulator-glue
 * boundary and never appears inside this crate.
 */

use crate::process::Pid;

/// The three error severities the kernel distinguishes.
///
/// Recoverable conditions (device busy, page fault, wait-on-live-process)
/// are deliberately not represented as `KernelError` variants: they are
/// ordinary state transitions, not error values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Kill the offending process; the kernel continues.
    ProcessFatal,
    /// Latch `internal_error`; the next dispatch halts the simulator.
    KernelFatal,
}

#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    #[error("no free frame and no victim available for replacement")]
    FrameAllocationFailed,

    #[error("disk read failed at offset {offset}")]
    DiskReadFailed { offset: u64 },

    #[error("MMU fault reading address {addr:#x}")]
    MmuFault { addr: u64 },

    #[error("process {0:?} not found in the process table")]
    ProcessNotFound(Pid),

    #[error("scheduler invoked with an empty process table")]
    SchedulerHasNoProcesses,

    #[error("unknown IRQ kind {0}")]
    UnknownIrqKind(u8),

    #[error("unknown syscall id {0}")]
    UnknownSyscall(u8),

    #[error("SPAWN could not load program image: {0}")]
    SpawnLoadFailed(&'static str),

    #[error("CPU error code {0} is not a recognized fault")]
    UnknownCpuError(u32),

    #[error("failed to write the metrics report: {0}")]
    ReportWriteFailed(#[from] std::io::Error),
}

impl KernelError {
    /// Classify this error per the kernel's error-handling design.
    ///
    /// `UnknownIrqKind`, `SchedulerHasNoProcesses`, and MMU/disk primitive
    /// failures are kernel-fatal: they indicate the simulator contract was
    /// violated, not that a user process misbehaved. Everything else that
    /// reaches this type is process-fatal.
    pub fn severity(&self) -> Severity {
        match self {
            KernelError::UnknownIrqKind(_)
            | KernelError::SchedulerHasNoProcesses
            | KernelError::MmuFault { .. }
            | KernelError::DiskReadFailed { .. }
            | KernelError::ReportWriteFailed(_) => Severity::KernelFatal,

            KernelError::FrameAllocationFailed
            | KernelError::ProcessNotFound(_)
            | KernelError::UnknownSyscall(_)
            | KernelError::SpawnLoadFailed(_)
            | KernelError::UnknownCpuError(_) => Severity::ProcessFatal,
        }
    }
}
