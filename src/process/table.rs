/*
 * Process Table
 *
 * A growable array of descriptors, indexed by insertion order. The
 * distilled spec calls for an array that doubles its backing storage on
 * overflow; `Vec` already provides that amortized-doubling growth, so
 * this wrapper exists only to pin down the table's search semantics
 * (linear lookup by pid, "first descriptor in state S" scanning
 * insertion order) rather than to reimplement growth by hand.
 *
 * Descriptors are never removed once inserted (a DEAD descriptor stays
 * in the table until the kernel halts, so that a late `wait` still
 * resolves and the final report still sees it), which means "lowest
 * empty slot" from the distilled spec collapses to "append": no slot is
 * ever vacated before halt.
 */

use super::{Pid, ProcessDescriptor, ProcessState};

#[derive(Default)]
pub struct ProcessTable {
    descriptors: Vec<ProcessDescriptor>,
    next_pid: u32,
}

impl ProcessTable {
    pub fn new() -> Self {
        ProcessTable {
            descriptors: Vec::new(),
            next_pid: 1,
        }
    }

    /// Allocate the next pid. Strictly increasing, never reused.
    pub fn allocate_pid(&mut self) -> Pid {
        let pid = Pid(self.next_pid);
        self.next_pid += 1;
        pid
    }

    pub fn insert(&mut self, descriptor: ProcessDescriptor) {
        self.descriptors.push(descriptor);
    }

    pub fn get(&self, pid: Pid) -> Option<&ProcessDescriptor> {
        self.descriptors.iter().find(|p| p.pid == pid)
    }

    pub fn get_mut(&mut self, pid: Pid) -> Option<&mut ProcessDescriptor> {
        self.descriptors.iter_mut().find(|p| p.pid == pid)
    }

    /// First descriptor in state `state`, in insertion order.
    pub fn first_in_state(&self, state: ProcessState) -> Option<&ProcessDescriptor> {
        self.descriptors.iter().find(|p| p.state == state)
    }

    pub fn first_in_state_mut(&mut self, state: ProcessState) -> Option<&mut ProcessDescriptor> {
        self.descriptors.iter_mut().find(|p| p.state == state)
    }

    pub fn any_in_state(&self, state: ProcessState) -> bool {
        self.descriptors.iter().any(|p| p.state == state)
    }

    pub fn all_dead(&self) -> bool {
        !self.descriptors.is_empty() && self.descriptors.iter().all(|p| p.is_dead())
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProcessDescriptor> {
        self.descriptors.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ProcessDescriptor> {
        self.descriptors.iter_mut()
    }

    pub fn as_slice(&self) -> &[ProcessDescriptor] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }
}
