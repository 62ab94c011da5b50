/*
 * Ready Queue
 *
 * A FIFO of pids waiting to run, backed by `VecDeque` the way the rest of
 * this crate prefers a standard growable collection over a hand-rolled
 * ring buffer. `sort_by_priority` is the one operation that isn't plain
 * FIFO discipline: the PRIORITY policy calls it after every recompute so
 * the queue always reflects current priorities without the policy having
 * to maintain its own ordering.
 */

use std::collections::VecDeque;

use crate::process::{Pid, ProcessTable};

#[derive(Debug, Default)]
pub struct ReadyQueue {
    entries: VecDeque<Pid>,
}

impl ReadyQueue {
    pub fn new() -> Self {
        ReadyQueue {
            entries: VecDeque::new(),
        }
    }

    pub fn enqueue(&mut self, pid: Pid) {
        self.entries.push_back(pid);
    }

    pub fn pop_front(&mut self) -> Option<Pid> {
        self.entries.pop_front()
    }

    pub fn peek_front(&self) -> Option<Pid> {
        self.entries.front().copied()
    }

    /// Remove `pid` wherever it sits in the queue. Returns whether it was
    /// present. Used when a process is killed while still queued.
    pub fn remove(&mut self, pid: Pid) -> bool {
        let before = self.entries.len();
        self.entries.retain(|&queued| queued != pid);
        before != self.entries.len()
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.entries.contains(&pid)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pid> {
        self.entries.iter()
    }

    /// Stable sort ascending by priority (lower value runs sooner), ties
    /// broken by existing queue order.
    pub fn sort_by_priority(&mut self, table: &ProcessTable) {
        let mut entries: Vec<Pid> = self.entries.drain(..).collect();
        entries.sort_by(|a, b| {
            let pa = table.get(*a).map(|d| d.priority).unwrap_or(0.5);
            let pb = table.get(*b).map(|d| d.priority).unwrap_or(0.5);
            pa.partial_cmp(&pb).unwrap_or(std::cmp::Ordering::Equal)
        });
        self.entries.extend(entries);
    }
}
