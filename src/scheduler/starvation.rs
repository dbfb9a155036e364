/*!
 * Starvation Diagnostic
 * Advisory check for low-priority processes under Priority scheduling
 */

use crate::core::limits::{HIGH_PRIORITY_MAX, LOW_PRIORITY_MIN, STARVATION_BURST_THRESHOLD};
use crate::core::types::{Pid, Ticks};
use crate::process::Process;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Low-priority processes that may wait indefinitely
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StarvationWarning {
    /// Cumulative burst of processes with priority <= `HIGH_PRIORITY_MAX`
    pub high_priority_burst: Ticks,
    pub at_risk: Vec<Pid>,
    pub at_risk_names: Vec<String>,
}

impl fmt::Display for StarvationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "STARVATION RISK: low priority processes ({}) may experience indefinite waiting",
            self.at_risk_names.join(", ")
        )
    }
}

/// Report a starvation risk without touching dispatch order
///
/// Fires when the high-priority band carries more than
/// `STARVATION_BURST_THRESHOLD` units of work while processes in the
/// low-priority band exist.
pub fn check_starvation(processes: &[Process]) -> Option<StarvationWarning> {
    let high_priority_burst: Ticks = processes
        .iter()
        .filter(|p| p.effective_priority() <= HIGH_PRIORITY_MAX)
        .map(|p| p.burst_time)
        .sum();

    let mut at_risk: Vec<&Process> = processes
        .iter()
        .filter(|p| p.effective_priority() >= LOW_PRIORITY_MIN)
        .collect();

    if at_risk.is_empty() || high_priority_burst <= STARVATION_BURST_THRESHOLD {
        return None;
    }

    at_risk.sort_by_key(|p| p.effective_priority());

    Some(StarvationWarning {
        high_priority_burst,
        at_risk: at_risk.iter().map(|p| p.id).collect(),
        at_risk_names: at_risk.iter().map(|p| p.name.clone()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_warning_for_default_workload() {
        // 4 + 9 units of high-priority work stays under the threshold
        let processes = vec![
            Process::new(1, "P1", 0, 8).with_priority(3),
            Process::new(2, "P2", 1, 4).with_priority(1),
            Process::new(3, "P3", 2, 9).with_priority(2),
            Process::new(4, "P4", 3, 5).with_priority(4),
        ];
        assert_eq!(check_starvation(&processes), None);
    }

    #[test]
    fn test_warning_when_high_band_exceeds_threshold() {
        let processes = vec![
            Process::new(1, "HOG", 0, 15).with_priority(1),
            Process::new(2, "HOG2", 0, 6).with_priority(2),
            Process::new(3, "IDLE", 0, 3).with_priority(5),
            Process::new(4, "BG", 0, 3).with_priority(4),
        ];

        let warning = check_starvation(&processes).unwrap();
        assert_eq!(warning.high_priority_burst, 21);
        assert_eq!(warning.at_risk, vec![4, 3]);
        assert!(warning.to_string().contains("BG, IDLE"));
    }

    #[test]
    fn test_no_warning_without_low_band() {
        let processes = vec![
            Process::new(1, "A", 0, 30).with_priority(1),
            Process::new(2, "B", 0, 3).with_priority(3),
        ];
        assert_eq!(check_starvation(&processes), None);
    }
}
