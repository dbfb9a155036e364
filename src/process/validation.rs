/*!
 * Process Set Validation
 * Input checks performed before a scheduling run takes its snapshot
 */

use super::types::Process;
use crate::core::errors::SchedulerError;
use crate::scheduler::types::SchedulerResult;
use std::collections::HashSet;

/// Validate a process set for a scheduling run
///
/// Rejects empty sets, zero burst times and duplicate ids. Nothing is ever
/// coerced: a zero burst is an error, not a burst of one.
pub fn validate_process_set(processes: &[Process]) -> SchedulerResult<()> {
    if processes.is_empty() {
        return Err(SchedulerError::EmptyProcessSet);
    }

    let mut seen = HashSet::with_capacity(processes.len());
    for process in processes {
        if process.burst_time == 0 {
            return Err(SchedulerError::NonPositiveBurst { pid: process.id });
        }
        if !seen.insert(process.id) {
            return Err(SchedulerError::DuplicateProcessId(process.id));
        }
    }

    Ok(())
}
