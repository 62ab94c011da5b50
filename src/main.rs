/*
 * Demo binary
 *
 * Drives a `Kernel` against `DemoMachine`, an in-process stand-in for
 * the simulator (see `bin_support`), through a short scripted run: the
 * init process spawns one child, the child writes a byte and exits,
 * init waits on it and exits too. Exists to exercise the kernel without
 * a real simulator and to leave a `metricas_simulador.txt` on disk, not
 * as a substitute for the integration tests under `tests/`.
 */

mod bin_support;

use anyhow::Result;
use bin_support::DemoMachine;
use so_kernel::syscall::SyscallId;
use so_kernel::{Cpu, DispatchOutcome, IrqKind, Kernel, KernelConfig};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = KernelConfig::default();
    let mut kernel = Kernel::new(config);
    let mut machine = DemoMachine::new(config.page_size);

    log::info!("booting");
    kernel.dispatch(&mut machine, IrqKind::Reset);

    // init spawns a child.
    machine.set_reg_a(SyscallId::Spawn as i64);
    machine.set_reg_x(0);
    kernel.dispatch(&mut machine, IrqKind::Syscall);
    let child = kernel
        .process_table()
        .iter()
        .find(|p| p.pid != so_kernel::process::Pid::INIT)
        .map(|p| p.pid)
        .ok_or_else(|| anyhow::anyhow!("spawn did not produce a child process"))?;
    log::info!("init spawned child {child}");

    // init waits on the child; the child becomes current.
    machine.set_reg_a(SyscallId::Wait as i64);
    machine.set_reg_x(child.as_u32() as i64);
    kernel.dispatch(&mut machine, IrqKind::Syscall);

    // the child writes a byte, then exits.
    machine.set_reg_a(SyscallId::Write as i64);
    machine.set_reg_x(b'A' as i64);
    kernel.dispatch(&mut machine, IrqKind::Syscall);
    log::info!("child wrote to its terminal: {:?}", machine.screen_output());

    machine.set_reg_a(SyscallId::Kill as i64);
    machine.set_reg_x(0);
    kernel.dispatch(&mut machine, IrqKind::Syscall);

    // init wakes back up and exits too.
    machine.set_reg_a(SyscallId::Kill as i64);
    machine.set_reg_x(0);
    let outcome = kernel.dispatch(&mut machine, IrqKind::Syscall);

    if outcome == DispatchOutcome::Idle && kernel.is_halted() {
        log::info!("kernel halted cleanly; metrics written to metricas_simulador.txt");
    } else {
        log::warn!("kernel did not halt after the scripted run as expected");
    }

    Ok(())
}
