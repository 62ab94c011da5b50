/*
 * Pedagogical OS Kernel
 *
 * Core of an operating-system kernel that runs atop a simulated
 * computer: interrupt dispatch, process table, ready queue, three
 * pluggable schedulers, blocking/unblocking, demand paging, syscalls,
 * and metrics. The simulator itself (CPU, memory, MMU, disk, devices)
 * is consumed through the traits in `machine`, never implemented here;
 * see `main.rs` for a minimal in-process stand-in.
 */

pub mod config;
pub mod error;
pub mod io;
pub mod irq;
pub mod kernel;
pub mod machine;
pub mod memory;
pub mod process;
pub mod report;
pub mod scheduler;
pub mod syscall;

pub use config::KernelConfig;
pub use error::{KernelError, Severity};
pub use irq::{DispatchOutcome, IrqKind};
pub use kernel::Kernel;
pub use machine::{Console, Cpu, Devices, Disk, Machine, Memory, Mmu, Mode};
