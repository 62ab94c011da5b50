/*
 * Simulator Collaborator Traits
 *
 * This module is the Rust-level expression of the simulator contract
 * (see the external-interfaces section of the design docs): the CPU,
 * main memory, MMU, disk, console and per-process devices the kernel
 * consumes but does not implement. The kernel is generic over these
 * traits everywhere (`Kernel<S: Machine>`), so none of the scheduling,
 * paging or syscall logic ever assumes a concrete simulator exists.
 *
 * A minimal in-process implementation used by the integration tests and
 * the example binary lives in `tests/support/mock_machine.rs` and
 * `bin_support.rs` respectively; production deployments would instead
 * bind these traits to FFI calls into the real simulator.
 */

use crate::error::KernelError;

/// Supervisor/user mode bit, published by the CPU at a fixed cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    User,
    Supervisor,
}

/// The CPU publishes outgoing register state at fixed cells on every trap
/// and reads the kernel's chosen values back on resume.
pub trait Cpu {
    fn pc(&self) -> u32;
    fn set_pc(&mut self, value: u32);

    fn reg_a(&self) -> i64;
    fn set_reg_a(&mut self, value: i64);

    fn reg_x(&self) -> i64;
    fn set_reg_x(&mut self, value: i64);

    fn error_code(&self) -> u32;
    fn error_complement(&self) -> u32;

    fn mode(&self) -> Mode;
    fn set_mode(&mut self, mode: Mode);
}

/// Byte-addressable main memory, used at boot to install the interrupt
/// trampoline at a fixed physical address and at fault time to land a
/// freshly loaded page in its physical frame.
pub trait Memory {
    fn read_byte(&self, addr: u32) -> u8;
    fn write_byte(&mut self, addr: u32, value: u8);

    fn write_bytes(&mut self, addr: u32, bytes: &[u8]) {
        for (i, b) in bytes.iter().enumerate() {
            self.write_byte(addr + i as u32, *b);
        }
    }

    fn load_frame(&mut self, frame: u32, page_size: u32, bytes: &[u8]) {
        self.write_bytes(frame * page_size, bytes);
    }
}

/// Per-process virtual-to-physical translation, mediated through the MMU.
///
/// The kernel owns each process's `PageTable` (see `memory::PageTable`)
/// and calls `set_page_table` at dispatch time so that the instructions
/// the CPU executes next see the right mapping. `read`/`write` are used
/// for the byte-by-byte SPAWN name-string copy.
pub trait Mmu {
    fn read(&self, addr: u32, mode: Mode) -> Result<u8, KernelError>;
    fn write(&mut self, addr: u32, value: u8, mode: Mode) -> Result<(), KernelError>;
    fn set_page_table(&mut self, table: &crate::memory::PageTable);
}

/// Block-oriented secondary store. Process images are written once at
/// SPAWN and never relocated; pages are faulted in from here on demand.
pub trait Disk {
    fn read_block(&self, offset: u64, buf: &mut [u8]) -> Result<(), KernelError>;
    fn write_block(&mut self, offset: u64, data: &[u8]) -> Result<(), KernelError>;

    /// Resolve a program name (as passed to SPAWN) to the disk offset its
    /// image already occupies. Parsing the program-image format itself is
    /// out of scope here (an external loader owns that); the kernel only
    /// needs the offset to record as the new process's `secondary_base`.
    fn resolve_program(&self, name: &str) -> Result<u64, KernelError>;
}

/// Write-only diagnostic sink. The kernel never reads back what it wrote.
pub trait Console {
    fn write_line(&mut self, line: &str);
}

/// Per-process terminals (keyboard/screen, each with a ready flag) and the
/// programmable timer. Terminal `k`'s four addresses are consecutive in
/// the real simulator; here each is its own method keyed by terminal
/// index rather than a raw address, since the kernel never needs the
/// address arithmetic itself, only the simulator's trap trampoline does,
/// and that is out of scope (see Non-goals).
pub trait Devices {
    fn keyboard_ready(&self, terminal: usize) -> bool;
    fn read_keyboard(&mut self, terminal: usize) -> u8;

    fn screen_ready(&self, terminal: usize) -> bool;
    fn write_screen(&mut self, terminal: usize, byte: u8);

    /// INSTRUCTIONS: monotonically advancing clock reading.
    fn clock(&self) -> u64;
}

/// A machine is anything that bundles all five collaborators. The kernel
/// holds a single `S: Machine` rather than five separate generic
/// parameters, matching the teacher's single `KernelSchedCtx` boundary
/// trait while still keeping each concern as its own trait above.
pub trait Machine: Cpu + Memory + Mmu + Disk + Console + Devices {}

impl<T: Cpu + Memory + Mmu + Disk + Console + Devices> Machine for T {}
