/*
 * Final Metrics Report
 *
 * Written once, at normal termination, to a plain-text file: global
 * counters first, then one block per process. Human-readable rather
 * than a structured format, matching the persisted-state contract.
 */

use std::io::Write;
use std::path::Path;

use crate::error::KernelError;
use crate::irq::IrqKind;
use crate::process::{GlobalMetrics, ProcessState, ProcessTable};

pub fn write_report(
    path: &Path,
    quantum_initial: u32,
    metrics: &GlobalMetrics,
    table: &ProcessTable,
) -> Result<(), KernelError> {
    let mut out = String::new();
    out.push_str(&format!("processes_created={}\n", metrics.processes_created));
    out.push_str(&format!("initial_quantum={}\n", quantum_initial));
    out.push_str(&format!("preemptions={}\n", metrics.preemptions));
    out.push_str(&format!(
        "total_execution_time={}\n",
        metrics.total_execution_time
    ));
    out.push_str(&format!("idle_time={}\n", metrics.idle_time));
    out.push_str(&format!("total_dead_time={}\n", metrics.total_dead_time));
    for kind in [IrqKind::Reset, IrqKind::Syscall, IrqKind::CpuError, IrqKind::Clock] {
        out.push_str(&format!("irq[{:?}]={}\n", kind, metrics.irq_count(kind)));
    }

    for proc in table.iter() {
        out.push_str(&format!("\n[process {}]\n", proc.pid));
        out.push_str(&format!("turnaround={}\n", proc.metrics.turnaround));
        out.push_str(&format!("preemptions={}\n", proc.metrics.preemptions));
        out.push_str(&format!(
            "time_ready={}\n",
            proc.metrics.time_in_state(ProcessState::Ready)
        ));
        out.push_str(&format!(
            "time_blocked={}\n",
            proc.metrics.time_in_state(ProcessState::Blocked)
        ));
        out.push_str(&format!(
            "mean_response_time={:.3}\n",
            proc.metrics.mean_response_time()
        ));
        out.push_str(&format!(
            "entries_ready={}\n",
            proc.metrics.entries_into(ProcessState::Ready)
        ));
        out.push_str(&format!(
            "entries_blocked={}\n",
            proc.metrics.entries_into(ProcessState::Blocked)
        ));
    }

    let mut file = std::fs::File::create(path)?;
    file.write_all(out.as_bytes())?;
    Ok(())
}
