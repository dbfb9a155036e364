/*!
 * Gantt Trace
 * Timeline of execution segments with merging of contiguous units
 */

use crate::core::types::{Pid, Ticks};
use crate::process::GanttSegment;

/// Execution timeline built one unit at a time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GanttTrace {
    segments: Vec<GanttSegment>,
}

impl GanttTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `pid` ran during unit `time`
    ///
    /// Extends the last segment when it belongs to the same process and ends
    /// exactly at `time`; otherwise opens a new one. Idle units are never
    /// recorded, so a gap always splits segments.
    pub fn record(&mut self, pid: Pid, time: Ticks) {
        if let Some(last) = self.segments.last_mut() {
            if last.process_id == pid && last.end() == time {
                last.duration += 1;
                return;
            }
        }

        self.segments.push(GanttSegment {
            process_id: pid,
            start: time,
            duration: 1,
        });
    }

    pub fn segments(&self) -> &[GanttSegment] {
        &self.segments
    }

    pub fn into_segments(self) -> Vec<GanttSegment> {
        self.segments
    }

    /// Units of actual execution (idle gaps excluded)
    pub fn busy_time(&self) -> Ticks {
        self.segments.iter().map(|s| s.duration).sum()
    }

    /// End of the last segment, 0 for an empty trace
    pub fn makespan(&self) -> Ticks {
        self.segments.last().map_or(0, GanttSegment::end)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_contiguous_units_merge() {
        let mut trace = GanttTrace::new();
        trace.record(1, 0);
        trace.record(1, 1);
        trace.record(2, 2);
        trace.record(1, 3);

        assert_eq!(
            trace.segments(),
            &[
                GanttSegment { process_id: 1, start: 0, duration: 2 },
                GanttSegment { process_id: 2, start: 2, duration: 1 },
                GanttSegment { process_id: 1, start: 3, duration: 1 },
            ]
        );
        assert_eq!(trace.busy_time(), 4);
        assert_eq!(trace.makespan(), 4);
    }

    #[test]
    fn test_idle_gap_splits_segment() {
        let mut trace = GanttTrace::new();
        trace.record(1, 0);
        trace.record(1, 2);

        assert_eq!(trace.len(), 2);
        assert_eq!(trace.busy_time(), 2);
        assert_eq!(trace.makespan(), 3);
    }
}
