/*
 * PRIORITY: the ready queue is kept sorted ascending by each process's
 * priority (lower runs sooner); quantum exhaustion both recomputes the
 * preempted process's priority (in the dispatcher, before it gets here)
 * and re-sorts the queue so the new value takes effect immediately.
 */

use crate::process::{Pid, ProcessDescriptor, ProcessTable};
use crate::scheduler::{ReadyQueue, SchedulingPolicy};

#[derive(Debug, Default)]
pub struct Priority;

impl SchedulingPolicy for Priority {
    fn select_next(&mut self, ready: &mut ReadyQueue, table: &ProcessTable) -> Option<Pid> {
        ready.sort_by_priority(table);
        ready.pop_front()
    }

    fn requeue_after_quantum(&mut self, ready: &mut ReadyQueue, table: &ProcessTable, pid: Pid) {
        ready.enqueue(pid);
        ready.sort_by_priority(table);
    }

    fn preempts_on_quantum(&self) -> bool {
        true
    }

    fn on_preempt(&mut self, descriptor: &mut ProcessDescriptor, quantum_initial: u32, residual: u32) {
        descriptor.recompute_priority(quantum_initial, residual);
    }
}
