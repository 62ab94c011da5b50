/*
 * Scheduling Policy
 *
 * The seam between "which process runs next" (policy) and "how a process
 * moves through READY/BLOCKED/DEAD" (mechanism, in `dispatcher.rs`). Only
 * `select_next` and `requeue_after_quantum` differ between the three
 * policies; everything else about quantum bookkeeping is shared kernel
 * code.
 */

use std::fmt;

use crate::process::{Pid, ProcessDescriptor, ProcessTable};

use super::ReadyQueue;

pub trait SchedulingPolicy: fmt::Debug {
    /// Pop the next process to run from `ready`, if any.
    fn select_next(&mut self, ready: &mut ReadyQueue, table: &ProcessTable) -> Option<Pid>;

    /// Return a process preempted by quantum exhaustion to the ready
    /// queue, in whatever position this policy requires.
    fn requeue_after_quantum(&mut self, ready: &mut ReadyQueue, table: &ProcessTable, pid: Pid);

    /// Whether this policy preempts a running process once its quantum
    /// runs out. SIMPLE runs a process to completion or block; the other
    /// two time-slice.
    fn preempts_on_quantum(&self) -> bool;

    /// Called whenever `descriptor` stops running, whether by quantum
    /// exhaustion or by blocking, with the quantum it was given and what
    /// was left of it. Only PRIORITY acts on this; the others no-op.
    fn on_preempt(&mut self, _descriptor: &mut ProcessDescriptor, _quantum_initial: u32, _residual: u32) {}
}
