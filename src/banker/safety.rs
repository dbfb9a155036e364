/*!
 * Safety Algorithm
 * Deterministic safe-sequence search with a step log
 */

use super::state::{BankerResult, BankersState};
use crate::core::types::Units;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// One entry of the safety log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum SafetyStep {
    /// Unfinished process compared against the current work vector
    Checked {
        process: usize,
        need: Vec<Units>,
        work: Vec<Units>,
        eligible: bool,
    },
    /// Process assumed to run to completion and release its allocation
    Completed {
        process: usize,
        released: Vec<Units>,
        work: Vec<Units>,
    },
}

impl fmt::Display for SafetyStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checked {
                process,
                need,
                work,
                eligible,
            } => write!(
                f,
                "P{process}: need {need:?} {} work {work:?}",
                if *eligible { "<=" } else { ">" }
            ),
            Self::Completed {
                process,
                released,
                work,
            } => write!(f, "P{process} completes, releases {released:?}, work {work:?}"),
        }
    }
}

/// Verdict of a safety pass
///
/// When `safe` is false, `sequence` holds the processes that could finish
/// before progress stopped; it is diagnostic only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SafetyReport {
    pub safe: bool,
    pub sequence: Vec<usize>,
    pub steps: Vec<SafetyStep>,
}

/// Check whether the given matrices describe a safe state
pub fn check_safety(allocation: &[Vec<Units>], max: &[Vec<Units>], available: &[Units]) -> BankerResult<SafetyReport> {
    let state = BankersState::new(allocation.to_vec(), max.to_vec(), available.to_vec())?;
    Ok(state.check_safety())
}

impl BankersState {
    /// Run the safety algorithm on this state
    ///
    /// Each pass scans from index 0 and takes the first unfinished process
    /// whose need fits in `work`, so the sequence is reproducible.
    pub fn check_safety(&self) -> SafetyReport {
        let processes = self.processes();
        let mut work = self.available().to_vec();
        let mut finished = vec![false; processes];
        let mut sequence = Vec::with_capacity(processes);
        let mut steps = Vec::new();

        while sequence.len() < processes {
            let mut progressed = false;

            for i in 0..processes {
                if finished[i] {
                    continue;
                }

                let need = &self.need()[i];
                let eligible = need.iter().zip(&work).all(|(n, w)| n <= w);
                steps.push(SafetyStep::Checked {
                    process: i,
                    need: need.clone(),
                    work: work.clone(),
                    eligible,
                });
                if !eligible {
                    continue;
                }

                let released = &self.allocation()[i];
                for (w, a) in work.iter_mut().zip(released) {
                    *w += *a;
                }
                finished[i] = true;
                sequence.push(i);
                steps.push(SafetyStep::Completed {
                    process: i,
                    released: released.clone(),
                    work: work.clone(),
                });
                progressed = true;
                break;
            }

            if !progressed {
                break;
            }
        }

        let safe = sequence.len() == processes;
        debug!(safe = safe, sequence = ?sequence, "safety check finished");
        SafetyReport { safe, sequence, steps }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn classic() -> (Vec<Vec<Units>>, Vec<Vec<Units>>, Vec<Units>) {
        (
            vec![vec![0, 1, 0], vec![2, 0, 0], vec![3, 0, 2], vec![2, 1, 1], vec![0, 0, 2]],
            vec![vec![7, 5, 3], vec![3, 2, 2], vec![9, 0, 2], vec![2, 2, 2], vec![4, 3, 3]],
            vec![3, 3, 2],
        )
    }

    #[test]
    fn test_classic_sequence_restarts_from_zero() {
        let (allocation, max, available) = classic();
        let report = check_safety(&allocation, &max, &available).unwrap();

        assert!(report.safe);
        assert_eq!(report.sequence, vec![1, 3, 0, 2, 4]);
    }

    #[test]
    fn test_step_log_records_completions() {
        let (allocation, max, available) = classic();
        let report = check_safety(&allocation, &max, &available).unwrap();

        assert_eq!(
            report.steps[0],
            SafetyStep::Checked {
                process: 0,
                need: vec![7, 4, 3],
                work: vec![3, 3, 2],
                eligible: false
            }
        );
        assert_eq!(
            report.steps[2],
            SafetyStep::Completed {
                process: 1,
                released: vec![2, 0, 0],
                work: vec![5, 3, 2]
            }
        );
        let completions = report
            .steps
            .iter()
            .filter(|s| matches!(s, SafetyStep::Completed { .. }))
            .count();
        assert_eq!(completions, 5);
    }

    #[test]
    fn test_unsafe_state_returns_partial_sequence() {
        let report = check_safety(
            &[vec![1, 0], vec![0, 1], vec![1, 1]],
            &[vec![2, 1], vec![1, 2], vec![2, 2]],
            &[0, 0],
        )
        .unwrap();

        assert!(!report.safe);
        assert!(report.sequence.is_empty());
        assert_eq!(report.steps.len(), 3);
    }

    #[test]
    fn test_empty_state_is_safe() {
        let report = check_safety(&[], &[], &[1]).unwrap();
        assert!(report.safe);
        assert!(report.sequence.is_empty());
    }

    #[test]
    fn test_step_display() {
        let step = SafetyStep::Checked {
            process: 2,
            need: vec![6, 0, 0],
            work: vec![5, 3, 2],
            eligible: false,
        };
        assert_eq!(step.to_string(), "P2: need [6, 0, 0] > work [5, 3, 2]");
    }
}
