/*
 * ROUND_ROBIN: plain FIFO selection, but a process that exhausts its
 * quantum is preempted and sent to the back of the queue.
 */

use crate::process::{Pid, ProcessTable};
use crate::scheduler::{ReadyQueue, SchedulingPolicy};

#[derive(Debug, Default)]
pub struct RoundRobin;

impl SchedulingPolicy for RoundRobin {
    fn select_next(&mut self, ready: &mut ReadyQueue, _table: &ProcessTable) -> Option<Pid> {
        ready.pop_front()
    }

    fn requeue_after_quantum(&mut self, ready: &mut ReadyQueue, _table: &ProcessTable, pid: Pid) {
        ready.enqueue(pid);
    }

    fn preempts_on_quantum(&self) -> bool {
        true
    }
}
