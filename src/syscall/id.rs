use crate::error::KernelError;

/// Syscall ids, read out of the outgoing A register on a SYSCALL IRQ.
/// The numeric values are this crate's own choice (no assembly stub
/// ships alongside it); kernel logic is keyed off this enum everywhere
/// except the one conversion below, which is the sole place raw
/// integers are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyscallId {
    Read = 0,
    Write = 1,
    Spawn = 2,
    Kill = 3,
    Wait = 4,
}

impl TryFrom<i64> for SyscallId {
    type Error = KernelError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SyscallId::Read),
            1 => Ok(SyscallId::Write),
            2 => Ok(SyscallId::Spawn),
            3 => Ok(SyscallId::Kill),
            4 => Ok(SyscallId::Wait),
            other => Err(KernelError::UnknownSyscall(other.rem_euclid(256) as u8)),
        }
    }
}
