/*
 * Kernel
 *
 * The single non-reentrant entry point. `dispatch` runs the seven steps
 * from accounting through final dispatch to completion before the
 * simulator may call it again (see the system overview). No locks, no
 * statics: `Kernel` is plain owned data, threaded through by `&mut self`.
 */

use crate::config::KernelConfig;
use crate::error::{KernelError, Severity};
use crate::irq::{CpuErrorCode, DispatchOutcome, IrqKind};
use crate::machine::{Machine, Mode};
use crate::memory::{self, FrameAllocator, ReplacementPolicy};
use crate::process::{
    finalize_dead_time, BlockReason, GlobalMetrics, Pid, ProcessDescriptor, ProcessTable,
};
use crate::report;
use crate::scheduler::{ReadyQueue, SchedulingPolicy};
use crate::syscall::{self, SyscallEffect};

/// Name of the persisted metrics report, written in the current
/// directory at normal termination.
const REPORT_PATH: &str = "metricas_simulador.txt";

pub struct Kernel {
    config: KernelConfig,
    table: ProcessTable,
    ready: ReadyQueue,
    scheduler: Box<dyn SchedulingPolicy>,
    frame_allocator: FrameAllocator,
    replacement: Box<dyn ReplacementPolicy>,
    current: Option<Pid>,
    residual_quantum: u32,
    metrics: GlobalMetrics,
    internal_error: bool,
    halted: bool,
}

impl Kernel {
    pub fn new(config: KernelConfig) -> Self {
        let frame_allocator = FrameAllocator::new(config.total_frames);
        let replacement = config.replacement.build();
        let scheduler = config.scheduler.build();
        let initial_quantum = config.initial_quantum;
        Kernel {
            config,
            table: ProcessTable::new(),
            ready: ReadyQueue::new(),
            scheduler,
            frame_allocator,
            replacement,
            current: None,
            residual_quantum: initial_quantum,
            metrics: GlobalMetrics::new(),
            internal_error: false,
            halted: false,
        }
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    pub fn metrics(&self) -> &GlobalMetrics {
        &self.metrics
    }

    pub fn process_table(&self) -> &ProcessTable {
        &self.table
    }

    pub fn ready_queue(&self) -> &ReadyQueue {
        &self.ready
    }

    pub fn current(&self) -> Option<Pid> {
        self.current
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn internal_error(&self) -> bool {
        self.internal_error
    }

    /// Run one tick. Returns `Dispatched` if a process is about to run,
    /// `Idle` if the simulator should wait for the next IRQ (including
    /// the tick on which the kernel halts).
    pub fn dispatch<M: Machine>(&mut self, machine: &mut M, irq: IrqKind) -> DispatchOutcome {
        if self.halted {
            return DispatchOutcome::Idle;
        }

        let now = machine.clock();

        // 1. Accounting
        self.metrics.record_irq(irq);
        if self.current.is_some() {
            self.metrics.total_execution_time += 1;
        } else {
            self.metrics.idle_time += 1;
        }

        // 2. State salvage
        if let Some(pid) = self.current {
            if let Some(proc) = self.table.get_mut(pid) {
                proc.pc = machine.pc();
                proc.reg_a = machine.reg_a();
                proc.reg_x = machine.reg_x();
                proc.error_code = machine.error_code();
                proc.error_complement = machine.error_complement();
            }
        }

        // 3. IRQ-specific handling
        match irq {
            IrqKind::Reset => self.handle_reset(machine, now),
            IrqKind::Syscall => self.handle_syscall(machine, now),
            IrqKind::CpuError => self.handle_cpu_error(machine, now),
            IrqKind::Clock => self.handle_clock(),
        }

        // 4. Pending-I/O and wait sweep
        crate::io::sweep(&mut self.table, &mut self.ready, machine, now);

        // 5. Scheduling
        self.schedule();

        // 6. Termination check
        if self.internal_error || (!self.table.is_empty() && self.table.all_dead()) {
            self.finalize();
            return DispatchOutcome::Idle;
        }

        // 7. Dispatch
        match self.current {
            Some(pid) => {
                let proc = self.table.get(pid).expect("current always valid");
                machine.set_pc(proc.pc);
                machine.set_reg_a(proc.reg_a);
                machine.set_reg_x(proc.reg_x);
                machine.set_mode(Mode::User);
                machine.set_page_table(&proc.page_table);
                DispatchOutcome::Dispatched
            }
            None => DispatchOutcome::Idle,
        }
    }

    fn handle_reset<M: Machine>(&mut self, machine: &mut M, now: u64) {
        if !self.table.is_empty() {
            return;
        }
        let secondary_base = machine.resolve_program("init").unwrap_or(0);
        let pid = self.table.allocate_pid();
        self.metrics.processes_created += 1;
        let descriptor = ProcessDescriptor::new(pid, 0, secondary_base, now);
        self.table.insert(descriptor);
        self.ready.enqueue(pid);
        machine.set_mode(Mode::User);
        log::info!("init process created, pid={pid}");
    }

    fn handle_syscall<M: Machine>(&mut self, machine: &mut M, now: u64) {
        let pid = match self.current {
            Some(pid) => pid,
            None => return,
        };
        let processes_before = self.table.len();
        match syscall::dispatch(
            pid,
            &mut self.table,
            &mut self.ready,
            machine,
            self.config.max_name_len,
        ) {
            Ok(SyscallEffect::Completed) => {}
            Ok(SyscallEffect::Block(reason)) => self.block_current(reason, now),
            Ok(SyscallEffect::KillCaller) => self.kill_current(now),
            Ok(SyscallEffect::InvalidCall) => {
                log::error!("process {pid} issued an unrecognized syscall id; halting");
                self.kill_current(now);
                self.internal_error = true;
            }
            Err(err) => self.raise(err, now),
        }
        self.metrics.processes_created += (self.table.len() - processes_before) as u32;
    }

    fn handle_cpu_error<M: Machine>(&mut self, machine: &mut M, now: u64) {
        let pid = match self.current {
            Some(pid) => pid,
            None => return,
        };
        let code = self.table.get(pid).map(|p| p.error_code).unwrap_or(0);
        match CpuErrorCode::from(code) {
            CpuErrorCode::PageAbsent => {
                let result = memory::handle_fault(
                    pid,
                    &mut self.table,
                    &mut self.frame_allocator,
                    self.replacement.as_mut(),
                    machine,
                    self.config.page_size,
                    self.config.page_load_cost,
                    now,
                );
                match result {
                    Ok(()) => self.current = None,
                    Err(err) => self.raise(err, now),
                }
            }
            CpuErrorCode::Other(code) => {
                // Process-fatal, never kernel-fatal: see the resolved
                // open question on this.
                log::warn!("process {pid} killed by CPU error code {code}");
                self.kill_current(now);
            }
        }
    }

    fn handle_clock(&mut self) {
        if self.current.is_some() && self.residual_quantum > 0 {
            self.residual_quantum -= 1;
        }
    }

    fn schedule(&mut self) {
        if let Some(pid) = self.current {
            let still_ready = self.table.get(pid).map(|p| p.is_ready()).unwrap_or(false);
            if still_ready {
                if !self.scheduler.preempts_on_quantum() || self.residual_quantum > 0 {
                    return;
                }
                let quantum_initial = self.config.initial_quantum;
                let residual = self.residual_quantum;
                if let Some(proc) = self.table.get_mut(pid) {
                    self.scheduler.on_preempt(proc, quantum_initial, residual);
                    proc.metrics.record_preemption();
                }
                self.metrics.preemptions += 1;
                self.scheduler
                    .requeue_after_quantum(&mut self.ready, &self.table, pid);
            }
            self.current = None;
        }

        if self.current.is_none() {
            self.current = self.scheduler.select_next(&mut self.ready, &self.table);
            self.residual_quantum = self.config.initial_quantum;
        }
    }

    fn block_current(&mut self, reason: BlockReason, now: u64) {
        if let Some(pid) = self.current.take() {
            let quantum_initial = self.config.initial_quantum;
            let residual = self.residual_quantum;
            if let Some(proc) = self.table.get_mut(pid) {
                self.scheduler.on_preempt(proc, quantum_initial, residual);
                proc.block(reason, now);
            }
        }
    }

    fn kill_current(&mut self, now: u64) {
        if let Some(pid) = self.current.take() {
            self.ready.remove(pid);
            if let Some(proc) = self.table.get_mut(pid) {
                proc.kill(now);
            }
        }
    }

    fn raise(&mut self, err: KernelError, now: u64) {
        match err.severity() {
            Severity::ProcessFatal => self.kill_current(now),
            Severity::KernelFatal => self.internal_error = true,
        }
    }

    fn finalize(&mut self) {
        finalize_dead_time(self.table.as_slice(), &mut self.metrics);
        self.halted = true;
        log::info!(
            "all processes dead, halting (processes_created={}, preemptions={})",
            self.metrics.processes_created,
            self.metrics.preemptions
        );
        let path = std::path::Path::new(REPORT_PATH);
        if let Err(err) = report::write_report(path, self.config.initial_quantum, &self.metrics, &self.table) {
            log::error!("failed to write metrics report: {err}");
        }
    }
}
