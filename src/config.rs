/*
 * Kernel Configuration
 *
 * Everything the kernel's behavior can be tuned by: initial quantum,
 * page size, frame count, simulated page-load latency, and the policy
 * selections. There is no external config-file format here: the teacher
 * crate this kernel is adapted from tunes itself the same way, through
 * plain constants and `Default` impls rather than a loaded file, and
 * nothing in this kernel's I/O surface calls for one either.
 */

use crate::memory::ReplacementPolicyKind;
use crate::scheduler::SchedulerPolicyKind;

/// Tunable parameters for a `Kernel` instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelConfig {
    /// Timer interrupts a process may consume before preemption.
    pub initial_quantum: u32,
    /// Bytes per page / per frame.
    pub page_size: u32,
    /// Number of physical frames the allocator manages. Frame 0 is
    /// reserved for the kernel image at boot.
    pub total_frames: usize,
    /// Simulated clock ticks between a page fault being serviced and the
    /// faulting process becoming READY again.
    pub page_load_cost: u64,
    /// Maximum bytes scanned for a SPAWN program-name terminator before
    /// giving up.
    pub max_name_len: usize,
    pub scheduler: SchedulerPolicyKind,
    pub replacement: ReplacementPolicyKind,
}

impl Default for KernelConfig {
    fn default() -> Self {
        KernelConfig {
            initial_quantum: 10,
            page_size: 256,
            total_frames: 16,
            page_load_cost: 5,
            max_name_len: 100,
            scheduler: SchedulerPolicyKind::RoundRobin,
            replacement: ReplacementPolicyKind::Fifo,
        }
    }
}

impl KernelConfig {
    pub fn with_scheduler(mut self, kind: SchedulerPolicyKind) -> Self {
        self.scheduler = kind;
        self
    }

    pub fn with_replacement(mut self, kind: ReplacementPolicyKind) -> Self {
        self.replacement = kind;
        self
    }
}
