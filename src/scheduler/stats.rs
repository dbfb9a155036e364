/*!
 * Scheduling Metrics
 * Averaged timing metrics and engine counters
 */

use crate::core::serde::is_zero_u64;
use crate::core::types::Ticks;
use crate::process::Process;
use serde::{Deserialize, Serialize};

/// Whether metrics describe a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Completeness {
    Final,
    /// Run stopped before every process finished; averages cover the
    /// finished processes only
    Incomplete { completed: usize, total: usize },
}

/// Averaged per-run metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Metrics {
    pub avg_waiting: f64,
    pub avg_turnaround: f64,
    /// Averaged over processes that have been dispatched at least once
    pub avg_response: f64,
    pub makespan: Ticks,
    pub completeness: Completeness,
}

impl Metrics {
    /// Compute metrics from process snapshots
    pub fn from_processes(processes: &[Process], makespan: Ticks) -> Self {
        let finished: Vec<&Process> = processes.iter().filter(|p| p.is_finished()).collect();
        let responses: Vec<Ticks> = processes.iter().filter_map(|p| p.response_time).collect();

        let completeness = if finished.len() == processes.len() {
            Completeness::Final
        } else {
            Completeness::Incomplete {
                completed: finished.len(),
                total: processes.len(),
            }
        };

        Self {
            avg_waiting: mean(finished.iter().map(|p| p.waiting_time)),
            avg_turnaround: mean(finished.iter().map(|p| p.turnaround_time)),
            avg_response: mean(responses.into_iter()),
            makespan,
            completeness,
        }
    }

    #[inline]
    pub fn is_final(&self) -> bool {
        matches!(self.completeness, Completeness::Final)
    }
}

fn mean(values: impl Iterator<Item = Ticks>) -> f64 {
    let (sum, count) = values.fold((0u64, 0u64), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

/// Engine counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EngineStats {
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub dispatches: u64,
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub preemptions: u64,
    #[serde(skip_serializing_if = "is_zero_u64")]
    pub idle_ticks: u64,
}
