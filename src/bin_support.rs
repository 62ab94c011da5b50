/*
 * In-process stand-in for the simulator, used by the example binary.
 *
 * Real deployments bind the `Machine` collaborator traits to FFI calls
 * into an actual simulator process; this module exists only so
 * `main.rs` has something to drive without one. It mirrors the mock
 * used by the integration tests (see `tests/support/mock_machine.rs`)
 * but keeps a tiny scripted demo program on disk instead of letting the
 * caller plant arbitrary bytes.
 */

use std::collections::HashMap;

use so_kernel::error::KernelError;
use so_kernel::machine::{Console, Cpu, Devices, Disk, Memory, Mmu, Mode};
use so_kernel::memory::PageTable;

pub struct DemoMachine {
    pc: u32,
    reg_a: i64,
    reg_x: i64,
    error_code: u32,
    error_complement: u32,
    mode: Mode,

    ram: Vec<u8>,
    disk: Vec<u8>,
    programs: HashMap<String, u64>,

    page_table: PageTable,
    page_size: u32,

    keyboard_ready: bool,
    keyboard_byte: u8,
    screen_ready: bool,
    screen_out: Vec<u8>,

    clock: u64,
}

impl DemoMachine {
    pub fn new(page_size: u32) -> Self {
        let mut programs = HashMap::new();
        programs.insert("init".to_string(), 0);
        DemoMachine {
            pc: 0,
            reg_a: 0,
            reg_x: 0,
            error_code: 0,
            error_complement: 0,
            mode: Mode::Supervisor,
            ram: vec![0; 4096],
            disk: b"init\0".to_vec(),
            programs,
            page_table: PageTable::new(),
            page_size,
            keyboard_ready: false,
            keyboard_byte: 0,
            screen_ready: true,
            screen_out: Vec::new(),
            clock: 0,
        }
    }

    pub fn tick(&mut self) {
        self.clock += 1;
    }

    pub fn clock_value(&self) -> u64 {
        self.clock
    }

    pub fn screen_output(&self) -> &[u8] {
        &self.screen_out
    }

    fn translate(&self, virtual_addr: u32) -> Option<u32> {
        let page = virtual_addr / self.page_size;
        let offset = virtual_addr % self.page_size;
        self.page_table
            .translate(page)
            .map(|frame| frame * self.page_size + offset)
    }
}

impl Cpu for DemoMachine {
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

impl Memory for DemoMachine {
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

impl Mmu for DemoMachine {
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

impl Disk for DemoMachine {
    fn read_block(&self, offset: u64, buf: &mut [u8]) -> Result<(), KernelError> {
        for (i, slot) in buf.iter_mut().enumerate() {
            *slot = self.disk.get(offset as usize + i).copied().unwrap_or(0);
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

impl Console for DemoMachine {
    fn write_line(&mut self, line: &str) {
        log::info!(target: "so_kernel::console", "{line}");
    }
}

impl Devices for DemoMachine {
    fn keyboard_ready(&self, _terminal: usize) -> bool {
        self.keyboard_ready
    }

    fn read_keyboard(&mut self, _terminal: usize) -> u8 {
        self.keyboard_ready = false;
        self.keyboard_byte
    }

    fn screen_ready(&self, _terminal: usize) -> bool {
        self.screen_ready
    }

    fn write_screen(&mut self, _terminal: usize, byte: u8) {
        self.screen_out.push(byte);
    }

    fn clock(&self) -> u64 {
        self.clock
    }
}
