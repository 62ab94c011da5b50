/*
 * Demand Paging
 *
 * The PAGE_ABSENT fault path: find or free a frame, pull the page in
 * from disk, map it, and block the faulting process for `page_load_cost`
 * ticks to model the I/O latency. Any other CPU error never reaches
 * this module, it is handled as an ordinary process kill in the
 * dispatcher.
 */

use crate::error::KernelError;
use crate::machine::Machine;
use crate::process::{BlockReason, Pid, ProcessTable};

use super::{FrameAllocator, ReplacementPolicy};

pub fn handle_fault<M: Machine>(
    pid: Pid,
    table: &mut ProcessTable,
    allocator: &mut FrameAllocator,
    replacement: &mut dyn ReplacementPolicy,
    machine: &mut M,
    page_size: u32,
    page_load_cost: u64,
    now: u64,
) -> Result<(), KernelError> {
    let fault_addr = table
        .get(pid)
        .ok_or(KernelError::ProcessNotFound(pid))?
        .error_complement;
    let virtual_page = fault_addr / page_size;

    let frame_index = match allocator.find_free() {
        Some(idx) => idx,
        None => {
            let victim = replacement
                .select_victim(allocator)
                .ok_or(KernelError::FrameAllocationFailed)?;
            let victim_frame = *allocator.frame(victim);
            if let Some(owner) = victim_frame.owner {
                if let Some(owner_proc) = table.get_mut(owner) {
                    owner_proc.page_table.unmap(victim_frame.virtual_page);
                }
            }
            victim
        }
    };

    let secondary_base = table.get(pid).unwrap().secondary_base;
    let page_start = fault_addr - (fault_addr % page_size);
    let mut page = vec![0u8; page_size as usize];
    machine.read_block(secondary_base + page_start as u64, &mut page)?;
    machine.load_frame(frame_index as u32, page_size, &page);

    allocator.allocate(frame_index, pid, virtual_page);

    let proc = table.get_mut(pid).unwrap();
    proc.page_table.map(virtual_page, frame_index as u32);
    proc.unblock_time = now + page_load_cost;
    proc.block(BlockReason::AwaitingPage, now);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessDescriptor;

    #[derive(Default)]
    struct FaultMachine {
        disk: Vec<u8>,
        ram: Vec<u8>,
    }

    impl crate::machine::Cpu for FaultMachine {
        fn pc(&self) -> u32 {
            0
        }
        fn set_pc(&mut self, _v: u32) {}
        fn reg_a(&self) -> i64 {
            0
        }
        fn set_reg_a(&mut self, _v: i64) {}
        fn reg_x(&self) -> i64 {
            0
        }
        fn set_reg_x(&mut self, _v: i64) {}
        fn error_code(&self) -> u32 {
            1
        }
        fn error_complement(&self) -> u32 {
            0
        }
        fn mode(&self) -> crate::machine::Mode {
            crate::machine::Mode::User
        }
        fn set_mode(&mut self, _m: crate::machine::Mode) {}
    }

    impl crate::machine::Memory for FaultMachine {
        fn read_byte(&self, addr: u32) -> u8 {
            self.ram.get(addr as usize).copied().unwrap_or(0)
        }
        fn write_byte(&mut self, addr: u32, value: u8) {
            if addr as usize >= self.ram.len() {
                self.ram.resize(addr as usize + 1, 0);
            }
            self.ram[addr as usize] = value;
        }
    }

    impl crate::machine::Mmu for FaultMachine {
        fn read(&self, _addr: u32, _mode: crate::machine::Mode) -> Result<u8, KernelError> {
            Ok(0)
        }
        fn write(&mut self, _addr: u32, _v: u8, _mode: crate::machine::Mode) -> Result<(), KernelError> {
            Ok(())
        }
        fn set_page_table(&mut self, _table: &crate::memory::PageTable) {}
    }

    impl crate::machine::Disk for FaultMachine {
        fn read_block(&self, offset: u64, buf: &mut [u8]) -> Result<(), KernelError> {
            for (i, slot) in buf.iter_mut().enumerate() {
                *slot = self.disk.get(offset as usize + i).copied().unwrap_or(0);
            }
            Ok(())
        }
        fn write_block(&mut self, offset: u64, data: &[u8]) -> Result<(), KernelError> {
            let end = offset as usize + data.len();
            if end > self.disk.len() {
                self.disk.resize(end, 0);
            }
            self.disk[offset as usize..end].copy_from_slice(data);
            Ok(())
        }
        fn resolve_program(&self, _name: &str) -> Result<u64, KernelError> {
            Ok(0)
        }
    }

    impl crate::machine::Console for FaultMachine {
        fn write_line(&mut self, _line: &str) {}
    }

    impl crate::machine::Devices for FaultMachine {
        fn keyboard_ready(&self, _terminal: usize) -> bool {
            false
        }
        fn read_keyboard(&mut self, _terminal: usize) -> u8 {
            0
        }
        fn screen_ready(&self, _terminal: usize) -> bool {
            false
        }
        fn write_screen(&mut self, _terminal: usize, _byte: u8) {}
        fn clock(&self) -> u64 {
            0
        }
    }

    #[test]
    fn fault_with_free_frame_maps_and_blocks() {
        let mut table = ProcessTable::new();
        let pid = table.allocate_pid();
        let mut proc = ProcessDescriptor::new(pid, 0, 0, 0);
        proc.error_complement = 600;
        table.insert(proc);

        let mut allocator = FrameAllocator::new(4);
        let mut replacement = super::super::Fifo;
        let mut machine = FaultMachine::default();

        handle_fault(pid, &mut table, &mut allocator, &mut replacement, &mut machine, 256, 5, 100).unwrap();

        let proc = table.get(pid).unwrap();
        assert!(proc.is_blocked());
        assert_eq!(proc.unblock_time, 105);
        assert_eq!(proc.page_table.translate(600 / 256), Some(1));
    }

    #[test]
    fn fault_with_no_free_frame_evicts_victim() {
        let mut table = ProcessTable::new();
        let p1 = table.allocate_pid();
        let d1 = ProcessDescriptor::new(p1, 0, 0, 0);
        table.insert(d1);
        let p2 = table.allocate_pid();
        let d2 = ProcessDescriptor::new(p2, 0, 0, 0);
        table.insert(d2);

        let mut allocator = FrameAllocator::new(2);
        // Only frame 1 exists beyond the reserved frame 0; fill it so the
        // next fault must evict.
        allocator.allocate(1, p1, 0);
        table.get_mut(p1).unwrap().page_table.map(0, 1);

        table.get_mut(p2).unwrap().error_complement = 0;
        let mut replacement = super::super::Fifo;
        let mut machine = FaultMachine::default();

        handle_fault(p2, &mut table, &mut allocator, &mut replacement, &mut machine, 256, 5, 0).unwrap();

        assert_eq!(table.get(p1).unwrap().page_table.translate(0), None);
        assert_eq!(table.get(p2).unwrap().page_table.translate(0), Some(1));
    }
}
