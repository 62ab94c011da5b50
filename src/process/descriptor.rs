/*
 * Process Descriptor
 *
 * One of these exists per process for the lifetime of the kernel, even
 * after the process dies, since a later `wait` or the final metrics
 * report still needs it. The process table is the sole owner; nothing
 * else holds a `&ProcessDescriptor` across a tick boundary.
 */

use super::{GlobalMetrics, Pid, ProcessMetrics};
use crate::memory::PageTable;

/// Lifecycle state of a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Ready,
    Blocked,
    Dead,
}

/// Why a BLOCKED process is waiting, and therefore which predicate the
/// pending-I/O sweep evaluates for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    None,
    AwaitingRead,
    AwaitingWrite,
    AwaitingProcess,
    AwaitingPage,
}

pub struct ProcessDescriptor {
    pub pid: Pid,

    // Saved CPU state, salvaged from the machine on every trap in which
    // this process was the outgoing current process.
    pub pc: u32,
    pub reg_a: i64,
    pub reg_x: i64,

    pub error_complement: u32,
    pub error_code: u32,

    /// Index into the four per-process terminal groups: `(pid mod 4) * 4`.
    pub terminal: usize,

    pub state: ProcessState,
    pub block_reason: BlockReason,

    /// Absolute clock value at which an AWAITING_PAGE block may retire.
    pub unblock_time: u64,

    /// Rational in [0, 1]; lower is better. Starts at 0.5.
    pub priority: f64,

    pub page_table: PageTable,

    /// Starting offset in the disk where this process's image lives.
    /// Set once at spawn and never relocated.
    pub secondary_base: u64,

    pub metrics: ProcessMetrics,
}

impl ProcessDescriptor {
    pub fn new(pid: Pid, pc: u32, secondary_base: u64, now: u64) -> Self {
        let terminal = (pid.as_u32() as usize % 4) * 4;
        ProcessDescriptor {
            pid,
            pc,
            reg_a: 0,
            reg_x: 0,
            error_complement: 0,
            error_code: 0,
            terminal,
            state: ProcessState::Ready,
            block_reason: BlockReason::None,
            unblock_time: 0,
            priority: 0.5,
            page_table: PageTable::new(),
            secondary_base,
            metrics: ProcessMetrics::new(now),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state == ProcessState::Ready
    }

    pub fn is_blocked(&self) -> bool {
        self.state == ProcessState::Blocked
    }

    pub fn is_dead(&self) -> bool {
        self.state == ProcessState::Dead
    }

    /// Priority update rule applied on quantum exhaustion or block:
    /// `new = (old + t_executed / quantum_initial) / 2`, where
    /// `t_executed = quantum_initial - residual`. A process that burns its
    /// whole quantum drifts toward 1 (worse); one that blocks early drifts
    /// toward 0 (better).
    pub fn recompute_priority(&mut self, quantum_initial: u32, residual: u32) {
        let t_executed = (quantum_initial.saturating_sub(residual)) as f64;
        let fraction = t_executed / quantum_initial.max(1) as f64;
        self.priority = (self.priority + fraction) / 2.0;
    }

    /// Transition to BLOCKED for `reason`. Does not touch the ready
    /// queue: callers remove the descriptor from the queue themselves,
    /// since `block` only ever applies to the current process (which sits
    /// at the queue front or has already been popped by the scheduler).
    pub fn block(&mut self, reason: BlockReason, now: u64) {
        self.state = ProcessState::Blocked;
        self.block_reason = reason;
        self.metrics.enter_state(ProcessState::Blocked, now);
    }

    /// Transition back to READY, clearing the block reason. Requeuing
    /// onto the ready queue is the caller's responsibility.
    pub fn unblock(&mut self, now: u64) {
        self.state = ProcessState::Ready;
        self.block_reason = BlockReason::None;
        self.metrics.enter_state(ProcessState::Ready, now);
    }

    pub fn kill(&mut self, now: u64) {
        self.state = ProcessState::Dead;
        self.block_reason = BlockReason::None;
        self.metrics.enter_state(ProcessState::Dead, now);
        self.metrics.turnaround = now.saturating_sub(self.metrics.created_at);
    }
}

impl std::fmt::Debug for ProcessDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessDescriptor")
            .field("pid", &self.pid)
            .field("state", &self.state)
            .field("block_reason", &self.block_reason)
            .field("priority", &self.priority)
            .finish()
    }
}

/// Finalize a run's global metrics once every process is DEAD. Kept here
/// (rather than on `GlobalMetrics` itself) since it needs to fold in
/// per-process dead-time, which only the process table can see in full.
pub fn finalize_dead_time(table: &[ProcessDescriptor], metrics: &mut GlobalMetrics) {
    for proc in table {
        metrics.total_dead_time += proc.metrics.time_in_state(ProcessState::Dead);
    }
}
