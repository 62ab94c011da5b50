/*
 * SIMPLE: plain FCFS. A process keeps the CPU until it blocks, is
 * killed, or a syscall returns control voluntarily; the quantum is never
 * enforced.
 *
 * Selection scans the process table in insertion (spawn) order for the
 * first READY descriptor, rather than popping the ready queue's front:
 * the two differ once a process unblocks and rejoins the queue at the
 * tail while an earlier-spawned process is still queued ahead of it.
 */

use crate::process::{Pid, ProcessState, ProcessTable};
use crate::scheduler::{ReadyQueue, SchedulingPolicy};

#[derive(Debug, Default)]
pub struct Simple;

impl SchedulingPolicy for Simple {
    fn select_next(&mut self, ready: &mut ReadyQueue, table: &ProcessTable) -> Option<Pid> {
        let pid = table.first_in_state(ProcessState::Ready)?.pid;
        ready.remove(pid);
        Some(pid)
    }

    fn requeue_after_quantum(&mut self, ready: &mut ReadyQueue, _table: &ProcessTable, pid: Pid) {
        // Never called in practice since `preempts_on_quantum` is false,
        // but behaves sensibly (FIFO re-entry) if it ever is.
        ready.enqueue(pid);
    }

    fn preempts_on_quantum(&self) -> bool {
        false
    }
}
