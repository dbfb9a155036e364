/*!
 * Engine Entry Points
 * Traced, plain-data entry points for hosts
 */

use crate::banker::{self, BankersState, RequestDecision, SafetyReport};
use crate::core::types::{SimResult, Ticks, Units};
use crate::monitoring::span_operation;
use crate::process::Process;
use crate::resources::{self, ProcessRecord, Resource};
use crate::scheduler::{self, Algorithm, ScheduleOutcome};
use tracing::error;

/// Full schedule: Gantt trace, metrics and final process records
pub fn run_schedule(processes: &[Process], algorithm: Algorithm, quantum: Ticks) -> SimResult<ScheduleOutcome> {
    let span = span_operation("run_schedule");
    let _guard = span.enter();

    match scheduler::run_schedule(processes, algorithm, quantum) {
        Ok(outcome) => {
            span.record_items_processed(outcome.trace.len());
            span.record_result(true);
            Ok(outcome)
        }
        Err(e) => {
            error!(algorithm = %algorithm, error = %e, "scheduling run rejected");
            span.record_error(&e.to_string());
            Err(e.into())
        }
    }
}

/// True when the wait-for graph contains a cycle
pub fn detect_deadlock(processes: &[ProcessRecord], resources: &[Resource]) -> bool {
    let span = span_operation("detect_deadlock");
    let _guard = span.enter();

    let deadlocked = resources::detect_cycle(processes, resources);
    span.record_items_processed(processes.len());
    span.record_result(true);
    deadlocked
}

pub fn check_safety(allocation: &[Vec<Units>], max: &[Vec<Units>], available: &[Units]) -> SimResult<SafetyReport> {
    let span = span_operation("check_safety");
    let _guard = span.enter();

    let report = banker::check_safety(allocation, max, available).inspect_err(|e| span.record_error(&e.to_string()))?;
    span.record_items_processed(report.steps.len());
    span.record_result(true);
    Ok(report)
}

/// Decide a Banker's request; `state` is never modified
pub fn request_resources(index: usize, request: &[Units], state: &BankersState) -> SimResult<RequestDecision> {
    let span = span_operation("request_resources");
    let _guard = span.enter();

    let decision = banker::request_resources(index, request, state).inspect_err(|e| span.record_error(&e.to_string()))?;
    span.record_result(decision.granted);
    Ok(decision)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::{ErrorKind, SimError};

    #[test]
    fn test_errors_convert_to_sim_error() {
        let err = run_schedule(&[], Algorithm::Fcfs, 0).unwrap_err();
        assert!(matches!(err, SimError::Scheduler(_)));
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let state = BankersState::new(vec![vec![0]], vec![vec![1]], vec![1]).unwrap();
        let err = request_resources(0, &[2], &state).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExceedsNeed);
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_check_safety_reports_steps() {
        let report = check_safety(&[vec![1]], &[vec![2]], &[1]).unwrap();
        assert!(report.safe);
        assert_eq!(report.sequence, vec![0]);
        assert_eq!(report.steps.len(), 2);
    }
}
