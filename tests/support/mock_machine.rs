/*
 * In-process stand-in for the simulator, used by the integration tests.
 *
 * This is not a simulator in its own right — no instruction execution,
 * no real CPU — just plain `Vec`-backed storage behind the kernel's
 * `Machine` collaborator traits, with a handful of helpers the test
 * harness uses to script IRQs (writing program images to disk, flipping
 * device-ready flags, advancing the clock).
 */

use std::collections::HashMap;

use so_kernel::error::KernelError;
use so_kernel::machine::{Console, Cpu, Devices, Disk, Memory, Mmu, Mode};
use so_kernel::memory::PageTable;

pub struct MockMachine {
    pub page_size: u32,

    pc: u32,
    reg_a: i64,
    reg_x: i64,
    error_code: u32,
    error_complement: u32,
    mode: Mode,

    ram: Vec<u8>,
    disk: Vec<u8>,
    programs: HashMap<String, u64>,
    next_disk_offset: u64,

    page_table: PageTable,

    keyboard_ready: [bool; 4],
    keyboard_byte: [u8; 4],
    screen_ready: [bool; 4],
    pub screen_out: [Vec<u8>; 4],
    pub console_lines: Vec<String>,

    clock: u64,
}

impl MockMachine {
    pub fn new(page_size: u32) -> Self {
        MockMachine {
            page_size,
            pc: 0,
            reg_a: 0,
            reg_x: 0,
            error_code: 0,
            error_complement: 0,
            mode: Mode::Supervisor,
            ram: vec![0; 64 * 1024],
            disk: Vec::new(),
            programs: HashMap::new(),
            next_disk_offset: 0,
            page_table: PageTable::new(),
            keyboard_ready: [false; 4],
            keyboard_byte: [0; 4],
            screen_ready: [false; 4],
            screen_out: [Vec::new(), Vec::new(), Vec::new(), Vec::new()],
            console_lines: Vec::new(),
            clock: 0,
        }
    }

    /// Register a named program image on disk, as `so_carrega_programa`
    /// would at load time, returning the offset it was written at.
    pub fn install_program(&mut self, name: &str, image: &[u8]) -> u64 {
        let offset = self.next_disk_offset;
        if self.disk.len() < (offset as usize + image.len()) {
            self.disk.resize(offset as usize + image.len(), 0);
        }
        self.disk[offset as usize..offset as usize + image.len()].copy_from_slice(image);
        self.programs.insert(name.to_string(), offset);
        self.next_disk_offset += image.len().max(self.page_size as usize) as u64;
        offset
    }

    /// Write raw bytes directly onto the disk at `offset`, growing it as
    /// needed. Used by tests to plant a SPAWN name string at a specific
    /// process's `secondary_base`.
    pub fn install_block_at(&mut self, offset: u64, bytes: &[u8]) {
        let end = offset as usize + bytes.len();
        if self.disk.len() < end {
            self.disk.resize(end, 0);
        }
        self.disk[offset as usize..end].copy_from_slice(bytes);
    }

    /// Register a program name/offset pair without writing anything new
    /// to disk, for names whose image content the test doesn't care
    /// about.
    pub fn register_program(&mut self, name: &str, offset: u64) {
        self.programs.insert(name.to_string(), offset);
    }

    pub fn set_clock(&mut self, value: u64) {
        self.clock = value;
    }

    pub fn advance_clock(&mut self, by: u64) {
        self.clock += by;
    }

    pub fn set_keyboard(&mut self, terminal_group: usize, byte: u8) {
        let slot = terminal_group / 4;
        self.keyboard_ready[slot] = true;
        self.keyboard_byte[slot] = byte;
    }

    pub fn set_screen_ready(&mut self, terminal_group: usize, ready: bool) {
        self.screen_ready[terminal_group / 4] = ready;
    }

    /// Directly set the outgoing registers the way a trap would, ahead
    /// of a `Kernel::dispatch` call.
    pub fn simulate_trap(&mut self, reg_a: i64, reg_x: i64) {
        self.reg_a = reg_a;
        self.reg_x = reg_x;
    }

    pub fn simulate_cpu_error(&mut self, error_code: u32, error_complement: u32) {
        self.error_code = error_code;
        self.error_complement = error_complement;
    }

    fn translate(&self, virtual_addr: u32) -> Option<u32> {
        let page = virtual_addr / self.page_size;
        let offset = virtual_addr % self.page_size;
        self.page_table
            .translate(page)
            .map(|frame| frame * self.page_size + offset)
    }
}

impl Cpu for MockMachine {
    fn pc(&self) -> u32 {
        self.pc
    }
    fn set_pc(&mut self, value: u32) {
        self.pc = value;
    }
    fn reg_a(&self) -> i64 {
        self.reg_a
    }
    fn set_reg_a(&mut self, value: i64) {
        self.reg_a = value;
    }
    fn reg_x(&self) -> i64 {
        self.reg_x
    }
    fn set_reg_x(&mut self, value: i64) {
        self.reg_x = value;
    }
    fn error_code(&self) -> u32 {
        self.error_code
    }
    fn error_complement(&self) -> u32 {
        self.error_complement
    }
    fn mode(&self) -> Mode {
        self.mode
    }
    fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }
}

impl Memory for MockMachine {
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

impl Mmu for MockMachine {
    fn read(&self, addr: u32, _mode: Mode) -> Result<u8, KernelError> {
        let phys = self.translate(addr).ok_or(KernelError::MmuFault { addr: addr as u64 })?;
        Ok(self.read_byte(phys))
    }

    fn write(&mut self, addr: u32, value: u8, _mode: Mode) -> Result<(), KernelError> {
        let phys = self.translate(addr).ok_or(KernelError::MmuFault { addr: addr as u64 })?;
        self.write_byte(phys, value);
        Ok(())
    }

    fn set_page_table(&mut self, table: &PageTable) {
        self.page_table = table.clone();
    }
}

impl Disk for MockMachine {
    fn read_block(&self, offset: u64, buf: &mut [u8]) -> Result<(), KernelError> {
        for (i, slot) in buf.iter_mut().enumerate() {
            *slot = self
                .disk
                .get(offset as usize + i)
                .copied()
                .unwrap_or(0);
        }
        Ok(())
    }

    fn write_block(&mut self, offset: u64, data: &[u8]) -> Result<(), KernelError> {
        let end = offset as usize + data.len();
        if self.disk.len() < end {
            self.disk.resize(end, 0);
        }
        self.disk[offset as usize..end].copy_from_slice(data);
        Ok(())
    }

    fn resolve_program(&self, name: &str) -> Result<u64, KernelError> {
        self.programs
            .get(name)
            .copied()
            .ok_or(KernelError::SpawnLoadFailed("unknown program name"))
    }
}

impl Console for MockMachine {
    fn write_line(&mut self, line: &str) {
        self.console_lines.push(line.to_string());
    }
}

impl Devices for MockMachine {
    fn keyboard_ready(&self, terminal: usize) -> bool {
        self.keyboard_ready[terminal / 4]
    }

    fn read_keyboard(&mut self, terminal: usize) -> u8 {
        let slot = terminal / 4;
        self.keyboard_ready[slot] = false;
        self.keyboard_byte[slot]
    }

    fn screen_ready(&self, terminal: usize) -> bool {
        self.screen_ready[terminal / 4]
    }

    fn write_screen(&mut self, terminal: usize, byte: u8) {
        self.screen_out[terminal / 4].push(byte);
    }

    fn clock(&self) -> u64 {
        self.clock
    }
}
