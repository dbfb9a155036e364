/*!
 * Scheduling Engine
 * Discrete-time CPU scheduling over a run-owned process snapshot
 */

use super::entry::{Entry, ReadyQueue};
use super::starvation::{check_starvation, StarvationWarning};
use super::stats::{EngineStats, Metrics};
use super::trace::GanttTrace;
use super::types::{Algorithm, SchedulerResult, TickRecord};
use crate::core::errors::SchedulerError;
use crate::core::serde::is_none;
use crate::core::types::{Pid, Ticks};
use crate::process::{validate_process_set, GanttSegment, Process};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// CPU scheduling engine
///
/// Owns an independent snapshot of the input processes; the caller's
/// records are never aliased or mutated. Time advances one unit per
/// [`Engine::step`], so any host (timer callback, test loop, batch driver)
/// can drive it.
#[derive(Debug)]
pub struct Engine {
    algorithm: Algorithm,
    quantum: Ticks,

    // Snapshot, indexed by input position
    processes: Vec<Process>,

    // Input positions sorted by (arrival, input order); admission cursor
    arrival_order: Vec<usize>,
    next_arrival: usize,

    ready: ReadyQueue,
    running: Option<usize>,
    slice_used: Ticks,

    now: Ticks,
    completed: usize,
    trace: GanttTrace,
    stats: EngineStats,
}

impl Engine {
    /// Create an engine for `processes`
    ///
    /// `quantum` is only read by Round Robin, which rejects zero.
    pub fn new(processes: &[Process], algorithm: Algorithm, quantum: Ticks) -> SchedulerResult<Self> {
        validate_process_set(processes)?;
        if algorithm.requires_quantum() && quantum == 0 {
            return Err(SchedulerError::MissingQuantum(quantum));
        }

        let processes: Vec<Process> = processes.iter().map(Process::snapshot).collect();

        let mut arrival_order: Vec<usize> = (0..processes.len()).collect();
        arrival_order.sort_by_key(|&i| processes[i].arrival_time);

        debug!(
            algorithm = %algorithm,
            quantum = quantum,
            processes = processes.len(),
            "scheduling engine created"
        );

        Ok(Self {
            algorithm,
            quantum,
            processes,
            arrival_order,
            next_arrival: 0,
            ready: ReadyQueue::for_algorithm(algorithm),
            running: None,
            slice_used: 0,
            now: 0,
            completed: 0,
            trace: GanttTrace::new(),
            stats: EngineStats::default(),
        })
    }

    /// Simulate one time unit
    ///
    /// Returns `None` once every process has finished.
    pub fn step(&mut self) -> Option<TickRecord> {
        if self.is_finished() {
            return None;
        }

        let time = self.now;
        self.admit_arrivals();
        self.select();

        let Some(index) = self.running else {
            self.stats.idle_ticks += 1;
            self.now += 1;
            return Some(TickRecord {
                time,
                running: None,
                completed: None,
            });
        };

        let process = &mut self.processes[index];
        let pid = process.id;
        let finished = process.execute_unit(time);
        self.trace.record(pid, time);
        self.slice_used += 1;

        let mut completed = None;
        if finished {
            let process = &self.processes[index];
            debug!(
                pid = pid,
                completion = ?process.completion_time,
                turnaround = process.turnaround_time,
                waiting = process.waiting_time,
                "process completed"
            );
            self.running = None;
            self.completed += 1;
            completed = Some(pid);
        } else if self.algorithm == Algorithm::RoundRobin && self.slice_used >= self.quantum {
            // Arrivals of this slice are already queued, so the expired
            // process lands behind them
            self.stats.preemptions += 1;
            self.running = None;
            self.ready.push(Entry::new(self.algorithm, &self.processes[index], index));
        }

        self.now += 1;
        Some(TickRecord {
            time,
            running: Some(pid),
            completed,
        })
    }

    /// Drive the engine to completion
    ///
    /// Idle gaps are skipped in one jump; trace, metrics and idle count
    /// match stepping unit by unit.
    pub fn run(mut self) -> ScheduleOutcome {
        while !self.is_finished() {
            self.skip_idle();
            self.step();
        }
        let outcome = self.into_outcome();

        info!(
            algorithm = %outcome.algorithm,
            makespan = outcome.metrics.makespan,
            avg_waiting = outcome.metrics.avg_waiting,
            avg_turnaround = outcome.metrics.avg_turnaround,
            avg_response = outcome.metrics.avg_response,
            "scheduling run finished"
        );
        outcome
    }

    /// Current state as an outcome; metrics are flagged incomplete when
    /// processes remain
    pub fn outcome(&self) -> ScheduleOutcome {
        ScheduleOutcome::assemble(
            self.algorithm,
            self.quantum,
            self.now,
            self.stats,
            self.trace.segments().to_vec(),
            self.processes.clone(),
        )
    }

    pub fn into_outcome(self) -> ScheduleOutcome {
        let Self {
            algorithm,
            quantum,
            processes,
            now,
            trace,
            stats,
            ..
        } = self;
        ScheduleOutcome::assemble(algorithm, quantum, now, stats, trace.into_segments(), processes)
    }

    // Nothing running or ready: jump straight to the next arrival
    fn skip_idle(&mut self) {
        if self.running.is_some() || !self.ready.is_empty() {
            return;
        }
        let Some(&index) = self.arrival_order.get(self.next_arrival) else {
            return;
        };
        let arrival = self.processes[index].arrival_time;
        if arrival > self.now {
            self.stats.idle_ticks += arrival - self.now;
            self.now = arrival;
        }
    }

    fn admit_arrivals(&mut self) {
        while let Some(&index) = self.arrival_order.get(self.next_arrival) {
            let process = &self.processes[index];
            if process.arrival_time > self.now {
                break;
            }
            self.ready.push(Entry::new(self.algorithm, process, index));
            self.next_arrival += 1;
        }
    }

    fn select(&mut self) {
        // SRTF re-competes every unit: the running process goes back into
        // the heap with its current remaining time
        if self.algorithm == Algorithm::Srtf {
            if let Some(index) = self.running {
                self.ready.push(Entry::new(self.algorithm, &self.processes[index], index));
            }
        }

        let previous = self.running;
        if previous.is_some() && self.algorithm != Algorithm::Srtf {
            return;
        }

        self.running = self.ready.pop();
        match (previous, self.running) {
            (Some(prev), Some(next)) if prev == next => {}
            (prev, Some(next)) => {
                self.slice_used = 0;
                self.stats.dispatches += 1;
                if prev.is_some() {
                    self.stats.preemptions += 1;
                }
                debug!(
                    time = self.now,
                    pid = self.processes[next].id,
                    ready = self.ready.len(),
                    "dispatched"
                );
            }
            (_, None) => {}
        }
    }

    pub fn is_finished(&self) -> bool {
        self.completed == self.processes.len()
    }

    pub fn now(&self) -> Ticks {
        self.now
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    pub fn trace(&self) -> &GanttTrace {
        &self.trace
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    /// Process currently holding the CPU
    pub fn running(&self) -> Option<&Process> {
        self.running.map(|i| &self.processes[i])
    }
}

/// Everything a scheduling run produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ScheduleOutcome {
    pub algorithm: Algorithm,
    #[serde(default, skip_serializing_if = "is_none")]
    pub quantum: Option<Ticks>,
    pub trace: Vec<GanttSegment>,
    pub processes: Vec<Process>,
    pub metrics: Metrics,
    pub stats: EngineStats,
    #[serde(default, skip_serializing_if = "is_none")]
    pub starvation: Option<StarvationWarning>,
}

impl ScheduleOutcome {
    fn assemble(
        algorithm: Algorithm,
        quantum: Ticks,
        now: Ticks,
        stats: EngineStats,
        trace: Vec<GanttSegment>,
        processes: Vec<Process>,
    ) -> Self {
        let metrics = Metrics::from_processes(&processes, now);
        let starvation = if algorithm.reports_starvation() {
            check_starvation(&processes)
        } else {
            None
        };

        Self {
            algorithm,
            quantum: algorithm.requires_quantum().then_some(quantum),
            trace,
            processes,
            metrics,
            stats,
            starvation,
        }
    }

    /// Process ids in completion order
    pub fn completion_order(&self) -> Vec<Pid> {
        let mut finished: Vec<&Process> =
            self.processes.iter().filter(|p| p.is_finished()).collect();
        finished.sort_by_key(|p| p.completion_time);
        finished.iter().map(|p| p.id).collect()
    }
}

/// Run a complete schedule
///
/// Fails with an `InvalidInput`-class error and no partial result when the
/// process set or quantum is malformed.
pub fn run_schedule(
    processes: &[Process],
    algorithm: Algorithm,
    quantum: Ticks,
) -> SchedulerResult<ScheduleOutcome> {
    let outcome = Engine::new(processes, algorithm, quantum)?.run();
    if let Some(warning) = &outcome.starvation {
        warn!(at_risk = ?warning.at_risk, "{}", warning);
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn workload() -> Vec<Process> {
        vec![
            Process::new(1, "P1", 0, 8).with_priority(3),
            Process::new(2, "P2", 1, 4).with_priority(1),
            Process::new(3, "P3", 2, 9).with_priority(2),
            Process::new(4, "P4", 3, 5).with_priority(4),
        ]
    }

    fn seg(process_id: u32, start: Ticks, duration: Ticks) -> GanttSegment {
        GanttSegment {
            process_id,
            start,
            duration,
        }
    }

    #[test]
    fn test_fcfs_trace() {
        let outcome = run_schedule(&workload(), Algorithm::Fcfs, 0).unwrap();
        assert_eq!(
            outcome.trace,
            vec![seg(1, 0, 8), seg(2, 8, 4), seg(3, 12, 9), seg(4, 21, 5)]
        );
        // Waiting times 0, 7, 10, 18
        assert_eq!(outcome.metrics.avg_waiting, 8.75);
        assert_eq!(outcome.completion_order(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_sjf_is_non_preemptive() {
        let outcome = run_schedule(&workload(), Algorithm::Sjf, 0).unwrap();
        assert_eq!(
            outcome.trace,
            vec![seg(1, 0, 8), seg(2, 8, 4), seg(4, 12, 5), seg(3, 17, 9)]
        );
        assert_eq!(outcome.stats.preemptions, 0);
    }

    #[test]
    fn test_srtf_preempts_on_arrival() {
        let outcome = run_schedule(&workload(), Algorithm::Srtf, 0).unwrap();
        assert_eq!(
            outcome.trace,
            vec![seg(1, 0, 1), seg(2, 1, 4), seg(4, 5, 5), seg(1, 10, 7), seg(3, 17, 9)]
        );
        assert_eq!(outcome.metrics.avg_waiting, 6.5);
    }

    #[test]
    fn test_round_robin_rotation() {
        let outcome = run_schedule(&workload(), Algorithm::RoundRobin, 4).unwrap();
        assert_eq!(
            outcome.trace,
            vec![
                seg(1, 0, 4),
                seg(2, 4, 4),
                seg(3, 8, 4),
                seg(4, 12, 4),
                seg(1, 16, 4),
                seg(3, 20, 4),
                seg(4, 24, 1),
                seg(3, 25, 1),
            ]
        );
        assert_eq!(outcome.quantum, Some(4));
    }

    #[test]
    fn test_priority_non_preemptive() {
        let outcome = run_schedule(&workload(), Algorithm::Priority, 0).unwrap();
        // P1 holds the CPU even though P2 (priority 1) arrives at t=1
        assert_eq!(
            outcome.trace,
            vec![seg(1, 0, 8), seg(2, 8, 4), seg(3, 12, 9), seg(4, 21, 5)]
        );
        assert!(outcome.starvation.is_none());
    }

    #[test]
    fn test_mlfq_matches_priority() {
        let priority = run_schedule(&workload(), Algorithm::Priority, 0).unwrap();
        let mlfq = run_schedule(&workload(), Algorithm::Mlfq, 0).unwrap();
        assert_eq!(priority.trace, mlfq.trace);
        assert_eq!(priority.processes, mlfq.processes);
    }

    #[test]
    fn test_idle_gap_produces_no_segment() {
        let processes = vec![Process::new(1, "A", 0, 2), Process::new(2, "B", 5, 1)];
        let mut engine = Engine::new(&processes, Algorithm::Fcfs, 0).unwrap();

        let ticks: Vec<TickRecord> = std::iter::from_fn(|| engine.step()).collect();
        assert_eq!(ticks.len(), 6);
        assert!(ticks[2].is_idle());
        assert_eq!(engine.stats().idle_ticks, 3);
        assert_eq!(engine.trace().segments(), &[seg(1, 0, 2), seg(2, 5, 1)]);
    }

    #[test]
    fn test_run_matches_unit_stepping_across_gaps() {
        let processes = vec![
            Process::new(1, "A", 0, 2),
            Process::new(2, "B", 5, 3),
            Process::new(3, "C", 6, 1),
            Process::new(4, "D", 40, 2),
        ];
        for algorithm in Algorithm::ALL {
            let mut stepped = Engine::new(&processes, algorithm, 2).unwrap();
            while stepped.step().is_some() {}
            let ran = Engine::new(&processes, algorithm, 2).unwrap().run();
            assert_eq!(ran, stepped.into_outcome());
        }
    }

    #[test]
    fn test_distant_arrival_is_skipped() {
        let processes = vec![Process::new(1, "A", 0, 2), Process::new(2, "B", 1_000_000_000_000, 1)];
        let outcome = run_schedule(&processes, Algorithm::Fcfs, 0).unwrap();

        assert_eq!(outcome.trace, vec![seg(1, 0, 2), seg(2, 1_000_000_000_000, 1)]);
        assert_eq!(outcome.stats.idle_ticks, 1_000_000_000_000 - 2);
        assert_eq!(outcome.metrics.makespan, 1_000_000_000_001);
        assert_eq!(outcome.processes[1].waiting_time, 0);
        assert!(outcome.metrics.is_final());
    }

    #[test]
    fn test_caller_processes_untouched() {
        let processes = workload();
        let before = processes.clone();
        let _ = run_schedule(&processes, Algorithm::Srtf, 0).unwrap();
        assert_eq!(processes, before);
    }

    #[test]
    fn test_invalid_input() {
        assert_eq!(
            Engine::new(&[], Algorithm::Fcfs, 0).unwrap_err(),
            SchedulerError::EmptyProcessSet
        );
        assert_eq!(
            Engine::new(&workload(), Algorithm::RoundRobin, 0).unwrap_err(),
            SchedulerError::MissingQuantum(0)
        );
        assert_eq!(
            Engine::new(&[Process::new(9, "Z", 0, 0)], Algorithm::Sjf, 1).unwrap_err(),
            SchedulerError::NonPositiveBurst { pid: 9 }
        );
    }

    #[test]
    fn test_partial_outcome_is_incomplete() {
        let mut engine = Engine::new(&workload(), Algorithm::Fcfs, 0).unwrap();
        for _ in 0..10 {
            engine.step();
        }

        let outcome = engine.outcome();
        assert!(!outcome.metrics.is_final());
        assert_eq!(outcome.completion_order(), vec![1]);
        assert_eq!(engine.running().map(|p| p.id), Some(2));
    }
}
