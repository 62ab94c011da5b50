/*
 * System-call Dispatch
 *
 * Decodes the call id out of the outgoing A register and enacts one of
 * the five calls. Each handler only ever touches the current process's
 * own descriptor plus, for SPAWN/KILL/WAIT, the process table and ready
 * queue, never another process's saved registers, since only the
 * current process is under the CPU's control at syscall time.
 */

mod id;
mod name;

pub use id::SyscallId;
pub use name::copy_name_string;

use crate::error::KernelError;
use crate::machine::{Machine, Mode};
use crate::process::{BlockReason, Pid, ProcessDescriptor, ProcessTable};
use crate::scheduler::ReadyQueue;

/// Outcome of a syscall that the dispatcher needs to act on beyond
/// writing `reg_a`/`reg_x` back (blocking, or killing the caller).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyscallEffect {
    /// The call completed; registers already hold its result.
    Completed,
    /// The caller must block for `reason`.
    Block(BlockReason),
    /// The caller issued KILL(self) and must be killed. Not an error.
    KillCaller,
    /// The caller issued an id this kernel doesn't recognize: the caller
    /// is killed and `internal_error` latches (see §4.7 and scenario 4).
    InvalidCall,
}

/// Dispatch the syscall the current process (`pid`) just made. `table`
/// must already contain `pid`'s descriptor with its saved registers.
pub fn dispatch<M: Machine>(
    pid: Pid,
    table: &mut ProcessTable,
    ready: &mut ReadyQueue,
    machine: &mut M,
    max_name_len: usize,
) -> Result<SyscallEffect, KernelError> {
    let raw_id = {
        let proc = table.get(pid).ok_or(KernelError::ProcessNotFound(pid))?;
        proc.reg_a
    };

    let id = match SyscallId::try_from(raw_id) {
        Ok(id) => id,
        Err(_) => return Ok(SyscallEffect::InvalidCall),
    };

    match id {
        SyscallId::Read => read(pid, table, machine),
        SyscallId::Write => write(pid, table, machine),
        SyscallId::Spawn => spawn(pid, table, ready, machine, max_name_len),
        SyscallId::Kill => kill(pid, table, ready, machine),
        SyscallId::Wait => wait(pid, table),
    }
}

fn read<M: Machine>(
    pid: Pid,
    table: &mut ProcessTable,
    machine: &mut M,
) -> Result<SyscallEffect, KernelError> {
    let proc = table.get_mut(pid).ok_or(KernelError::ProcessNotFound(pid))?;
    if !machine.keyboard_ready(proc.terminal) {
        return Ok(SyscallEffect::Block(BlockReason::AwaitingRead));
    }
    proc.reg_a = machine.read_keyboard(proc.terminal) as i64;
    Ok(SyscallEffect::Completed)
}

fn write<M: Machine>(
    pid: Pid,
    table: &mut ProcessTable,
    machine: &mut M,
) -> Result<SyscallEffect, KernelError> {
    let proc = table.get_mut(pid).ok_or(KernelError::ProcessNotFound(pid))?;
    if !machine.screen_ready(proc.terminal) {
        return Ok(SyscallEffect::Block(BlockReason::AwaitingWrite));
    }
    machine.write_screen(proc.terminal, proc.reg_x as u8);
    proc.reg_a = 0;
    Ok(SyscallEffect::Completed)
}

fn spawn<M: Machine>(
    pid: Pid,
    table: &mut ProcessTable,
    ready: &mut ReadyQueue,
    machine: &mut M,
    max_name_len: usize,
) -> Result<SyscallEffect, KernelError> {
    let name_addr = {
        let proc = table.get(pid).ok_or(KernelError::ProcessNotFound(pid))?;
        proc.reg_x as u32
    };
    let secondary_base = {
        let proc = table
            .get(pid)
            .ok_or(KernelError::ProcessNotFound(pid))?;
        match copy_name_string(&*machine, Mode::Supervisor, name_addr, proc.secondary_base, max_name_len)
            .and_then(|name| machine.resolve_program(&name))
        {
            Ok(offset) => offset,
            Err(_) => {
                let proc = table.get_mut(pid).unwrap();
                proc.reg_a = -1;
                return Ok(SyscallEffect::Completed);
            }
        }
    };

    let child_pid = table.allocate_pid();
    let now = machine.clock();
    let child = ProcessDescriptor::new(child_pid, 0, secondary_base, now);
    table.insert(child);
    ready.enqueue(child_pid);
    log::info!("process {pid} spawned child {child_pid}");

    let proc = table.get_mut(pid).ok_or(KernelError::ProcessNotFound(pid))?;
    proc.reg_a = child_pid.as_u32() as i64;
    Ok(SyscallEffect::Completed)
}

fn kill<M: Machine>(
    pid: Pid,
    table: &mut ProcessTable,
    ready: &mut ReadyQueue,
    machine: &M,
) -> Result<SyscallEffect, KernelError> {
    let target = {
        let proc = table.get(pid).ok_or(KernelError::ProcessNotFound(pid))?;
        if proc.reg_x == 0 {
            pid
        } else {
            Pid(proc.reg_x as u32)
        }
    };

    if table.get(target).is_none() {
        table.get_mut(pid).unwrap().reg_a = -1;
        return Ok(SyscallEffect::Completed);
    }

    if target == pid {
        // Caller kills itself; the dispatcher transitions it to DEAD once
        // this effect comes back, so reg_a is moot here.
        return Ok(SyscallEffect::KillCaller);
    }

    ready.remove(target);
    table.get_mut(target).unwrap().kill(machine.clock());
    log::info!("process {pid} killed process {target}");

    table.get_mut(pid).unwrap().reg_a = 0;
    Ok(SyscallEffect::Completed)
}

fn wait(pid: Pid, table: &mut ProcessTable) -> Result<SyscallEffect, KernelError> {
    let proc = table.get(pid).ok_or(KernelError::ProcessNotFound(pid))?;
    let target = Pid(proc.reg_x as u32);

    if target == pid {
        let proc = table.get_mut(pid).unwrap();
        proc.reg_a = -1;
        return Ok(SyscallEffect::Completed);
    }

    let target_dead = table.get(target).map(|d| d.is_dead()).unwrap_or(true);
    if target_dead {
        let proc = table.get_mut(pid).unwrap();
        proc.reg_a = 0;
        return Ok(SyscallEffect::Completed);
    }

    Ok(SyscallEffect::Block(BlockReason::AwaitingProcess))
}
