/*
 * Pending-I/O and Wait Sweep
 *
 * Run once per tick, after IRQ-specific handling and before scheduling.
 * For every BLOCKED descriptor, retries the condition that blocked it;
 * idempotent, since a still-unsatisfied condition leaves the descriptor
 * untouched.
 */

use crate::machine::Machine;
use crate::process::{BlockReason, ProcessState, ProcessTable};
use crate::scheduler::ReadyQueue;

pub fn sweep<M: Machine>(table: &mut ProcessTable, ready: &mut ReadyQueue, machine: &mut M, now: u64) {
    let pids: Vec<_> = table
        .iter()
        .filter(|p| p.state == ProcessState::Blocked)
        .map(|p| p.pid)
        .collect();

    for pid in pids {
        let proc = match table.get_mut(pid) {
            Some(p) => p,
            None => continue,
        };

        match proc.block_reason {
            BlockReason::AwaitingRead => {
                if machine.keyboard_ready(proc.terminal) {
                    proc.reg_a = machine.read_keyboard(proc.terminal) as i64;
                    proc.unblock(now);
                    ready.enqueue(pid);
                }
            }
            BlockReason::AwaitingWrite => {
                if machine.screen_ready(proc.terminal) {
                    machine.write_screen(proc.terminal, proc.reg_x as u8);
                    proc.reg_a = 0;
                    proc.unblock(now);
                    ready.enqueue(pid);
                }
            }
            BlockReason::AwaitingProcess => {
                let target = crate::process::Pid(proc.reg_x as u32);
                let target_dead = table.get(target).map(|t| t.is_dead()).unwrap_or(true);
                if target_dead {
                    let proc = table.get_mut(pid).unwrap();
                    proc.reg_a = 0;
                    proc.unblock(now);
                    ready.enqueue(pid);
                }
            }
            BlockReason::AwaitingPage => {
                if now >= proc.unblock_time {
                    proc.reg_a = 0;
                    proc.unblock(now);
                    ready.enqueue(pid);
                }
            }
            BlockReason::None => {}
        }
    }
}
