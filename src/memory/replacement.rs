/*
 * Page Replacement Policies
 *
 * Both policies operate purely through `FrameAllocator`'s allocation-order
 * queue rather than scanning `Frame`s directly, so neither needs to know
 * about process ownership or virtual pages. FIFO always evicts the
 * oldest allocation. Second-chance walks the same queue but gives a
 * frame one extra lap if its referenced bit is set, clearing the bit as
 * it goes (a queue-based stand-in for the circular clock hand, since
 * there is no hardware accessed bit to read here).
 */

use std::fmt;

use super::FrameAllocator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplacementPolicyKind {
    Fifo,
    SecondChance,
}

impl ReplacementPolicyKind {
    pub fn build(self) -> Box<dyn ReplacementPolicy> {
        match self {
            ReplacementPolicyKind::Fifo => Box::new(Fifo),
            ReplacementPolicyKind::SecondChance => Box::new(SecondChance),
        }
    }
}

pub trait ReplacementPolicy: fmt::Debug {
    /// Choose a frame to evict. Returns `None` only if the allocator has
    /// no frames under management at all.
    fn select_victim(&mut self, allocator: &mut FrameAllocator) -> Option<usize>;
}

#[derive(Debug, Default)]
pub struct Fifo;

impl ReplacementPolicy for Fifo {
    fn select_victim(&mut self, allocator: &mut FrameAllocator) -> Option<usize> {
        allocator.pop_oldest()
    }
}

#[derive(Debug, Default)]
pub struct SecondChance;

impl ReplacementPolicy for SecondChance {
    fn select_victim(&mut self, allocator: &mut FrameAllocator) -> Option<usize> {
        // Bounded to twice the queue length: every frame gets at most one
        // extra lap before something has to give.
        let mut remaining = allocator.total_frames().max(1) * 2;
        while remaining > 0 {
            remaining -= 1;
            let index = allocator.pop_oldest()?;
            if allocator.is_referenced(index) {
                allocator.clear_referenced(index);
                allocator.requeue(index);
            } else {
                return Some(index);
            }
        }
        None
    }
}
