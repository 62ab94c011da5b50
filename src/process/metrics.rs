/*
 * Metrics
 *
 * Per-process accounting (state entry counts, cumulative time per state,
 * turnaround, preemptions, mean response time) and the global aggregate
 * the final report is built from. All counters are monotonic; nothing
 * here is ever decremented.
 */

use std::collections::HashMap;

use super::ProcessState;
use crate::irq::IrqKind;

#[derive(Debug, Clone)]
pub struct ProcessMetrics {
    pub created_at: u64,
    pub turnaround: u64,
    pub preemptions: u32,

    entries: HashMap<StateKey, u32>,
    cumulative_time: HashMap<StateKey, u64>,

    /// Clock reading at which the process last entered its current state.
    last_transition: u64,
    current_state: StateKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum StateKey {
    Ready,
    Blocked,
    Dead,
}

impl From<ProcessState> for StateKey {
    fn from(s: ProcessState) -> Self {
        match s {
            ProcessState::Ready => StateKey::Ready,
            ProcessState::Blocked => StateKey::Blocked,
            ProcessState::Dead => StateKey::Dead,
        }
    }
}

impl ProcessMetrics {
    pub fn new(now: u64) -> Self {
        let mut entries = HashMap::new();
        entries.insert(StateKey::Ready, 1);
        ProcessMetrics {
            created_at: now,
            turnaround: 0,
            preemptions: 0,
            entries,
            cumulative_time: HashMap::new(),
            last_transition: now,
            current_state: StateKey::Ready,
        }
    }

    /// Record entry into `state` at clock reading `now`, folding the time
    /// spent in the previous state into its cumulative total.
    pub fn enter_state(&mut self, state: ProcessState, now: u64) {
        let elapsed = now.saturating_sub(self.last_transition);
        *self.cumulative_time.entry(self.current_state).or_insert(0) += elapsed;

        let key = StateKey::from(state);
        *self.entries.entry(key).or_insert(0) += 1;
        self.current_state = key;
        self.last_transition = now;
    }

    /// Cumulative time spent in `state` as of the last transition. If
    /// `state` is the current state, time since `last_transition` isn't
    /// folded in yet: callers after a fresh `enter_state` call get an
    /// exact figure; mid-state callers get a lower bound.
    pub fn time_in_state(&self, state: ProcessState) -> u64 {
        let key = StateKey::from(state);
        self.cumulative_time.get(&key).copied().unwrap_or(0)
    }

    pub fn entries_into(&self, state: ProcessState) -> u32 {
        self.entries.get(&StateKey::from(state)).copied().unwrap_or(0)
    }

    /// Mean response time: total time in READY divided by entries into
    /// READY.
    pub fn mean_response_time(&self) -> f64 {
        let entries = self.entries_into(ProcessState::Ready);
        if entries == 0 {
            return 0.0;
        }
        self.time_in_state(ProcessState::Ready) as f64 / entries as f64
    }

    pub fn record_preemption(&mut self) {
        self.preemptions += 1;
    }
}

#[derive(Debug, Clone, Default)]
pub struct GlobalMetrics {
    pub processes_created: u32,
    pub irq_counts: HashMap<IrqKind, u32>,
    pub total_execution_time: u64,
    pub idle_time: u64,
    pub total_dead_time: u64,
    pub preemptions: u32,
}

impl GlobalMetrics {
    pub fn new() -> Self {
        GlobalMetrics::default()
    }

    pub fn record_irq(&mut self, kind: IrqKind) {
        *self.irq_counts.entry(kind).or_insert(0) += 1;
    }

    pub fn irq_count(&self, kind: IrqKind) -> u32 {
        self.irq_counts.get(&kind).copied().unwrap_or(0)
    }
}
