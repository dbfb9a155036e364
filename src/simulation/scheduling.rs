/*!
 * Scheduling Runs
 * Host-driven stepping, cancellation and replay of scheduling runs
 */

use super::config::SimulationConfig;
use crate::core::types::Ticks;
use crate::monitoring::span_operation;
use crate::process::{validate_process_set, Process};
use crate::scheduler::{Algorithm, Engine, ScheduleOutcome, SchedulerResult, TickRecord};
use std::thread;
use tracing::info;

/// One scheduling run driven tick by tick by its host
///
/// Keeps the initial snapshot so the run can be replayed; determinism
/// makes a replay produce the identical trace.
#[derive(Debug)]
pub struct SchedulingRun {
    initial: Vec<Process>,
    quantum: Ticks,
    engine: Engine,
    cancelled: bool,
}

impl SchedulingRun {
    pub fn new(processes: &[Process], algorithm: Algorithm, quantum: Ticks) -> SchedulerResult<Self> {
        let engine = Engine::new(processes, algorithm, quantum)?;
        Ok(Self {
            initial: processes.iter().map(Process::snapshot).collect(),
            quantum,
            engine,
            cancelled: false,
        })
    }

    pub fn from_config(processes: &[Process], config: &SimulationConfig) -> SchedulerResult<Self> {
        Self::new(processes, config.algorithm, config.quantum)
    }

    /// Advance one time unit; `None` once finished or cancelled
    pub fn tick(&mut self) -> Option<TickRecord> {
        if self.cancelled {
            return None;
        }
        self.engine.step()
    }

    /// Stop advancing; the returned outcome is flagged incomplete unless
    /// the run had already finished
    pub fn cancel(&mut self) -> ScheduleOutcome {
        self.cancelled = true;
        let outcome = self.engine.outcome();
        info!(
            algorithm = %self.engine.algorithm(),
            at = self.engine.now(),
            completeness = ?outcome.metrics.completeness,
            "scheduling run cancelled"
        );
        outcome
    }

    /// Start over from the initial snapshot
    pub fn restart(&mut self) -> SchedulerResult<()> {
        self.engine = Engine::new(&self.initial, self.engine.algorithm(), self.quantum)?;
        self.cancelled = false;
        Ok(())
    }

    /// Run the remaining ticks, unless cancelled
    pub fn finish(self) -> ScheduleOutcome {
        if self.cancelled {
            self.engine.into_outcome()
        } else {
            self.engine.run()
        }
    }

    pub fn outcome(&self) -> ScheduleOutcome {
        self.engine.outcome()
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.engine.is_finished()
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }
}

/// Run `processes` under every algorithm, one thread and one snapshot per
/// run; outcomes come back in [`Algorithm::ALL`] order
pub fn compare_algorithms(processes: &[Process], quantum: Ticks) -> SchedulerResult<Vec<ScheduleOutcome>> {
    let span = span_operation("compare_algorithms");
    let _guard = span.enter();

    validate_process_set(processes)?;
    let engines = Algorithm::ALL
        .iter()
        .map(|&algorithm| Engine::new(processes, algorithm, quantum))
        .collect::<SchedulerResult<Vec<_>>>()?;

    let outcomes: Vec<ScheduleOutcome> = thread::scope(|scope| {
        let handles: Vec<_> = engines
            .into_iter()
            .map(|engine| scope.spawn(move || engine.run()))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect()
    });

    span.record_items_processed(outcomes.len());
    span.record_result(true);
    Ok(outcomes)
}
