/*
 * Scheduling
 *
 * The ready queue and the three pluggable selection policies. Everything
 * about *how* a process moves between READY, BLOCKED and DEAD lives in
 * `dispatcher.rs`; this module only answers "who runs next" and "where
 * does a preempted process go back to".
 */

mod policies;
mod ready_queue;
mod traits;

pub use policies::{Priority, RoundRobin, Simple};
pub use ready_queue::ReadyQueue;
pub use traits::SchedulingPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerPolicyKind {
    Simple,
    RoundRobin,
    Priority,
}

impl SchedulerPolicyKind {
    pub fn build(self) -> Box<dyn SchedulingPolicy> {
        match self {
            SchedulerPolicyKind::Simple => Box::new(Simple),
            SchedulerPolicyKind::RoundRobin => Box::new(RoundRobin),
            SchedulerPolicyKind::Priority => Box::new(Priority),
        }
    }
}
