/*!
 * Process Types
 * Process records and Gantt segments shared by the scheduling engine
 */

use crate::core::limits::UNSET_PRIORITY_LEVEL;
use crate::core::serde::is_none;
use crate::core::types::{Pid, Priority, Ticks};
use serde::{Deserialize, Serialize};

/// A process competing for the simulated CPU
///
/// The timing fields are only meaningful once `remaining_time == 0`; at that
/// point `turnaround_time == completion_time - arrival_time` and
/// `waiting_time == turnaround_time - burst_time`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Process {
    pub id: Pid,
    pub name: String,
    pub arrival_time: Ticks,
    pub burst_time: Ticks,
    #[serde(default, skip_serializing_if = "is_none")]
    pub priority: Option<Priority>,

    #[serde(default)]
    pub remaining_time: Ticks,
    #[serde(default)]
    pub waiting_time: Ticks,
    #[serde(default)]
    pub turnaround_time: Ticks,
    #[serde(default, skip_serializing_if = "is_none")]
    pub completion_time: Option<Ticks>,
    /// Time from arrival to first dispatch; `None` until the first run
    #[serde(default, skip_serializing_if = "is_none")]
    pub response_time: Option<Ticks>,
}

impl Process {
    pub fn new(id: Pid, name: impl Into<String>, arrival_time: Ticks, burst_time: Ticks) -> Self {
        Self {
            id,
            name: name.into(),
            arrival_time,
            burst_time,
            priority: None,
            remaining_time: burst_time,
            waiting_time: 0,
            turnaround_time: 0,
            completion_time: None,
            response_time: None,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Priority used for dispatch decisions; unset ranks as level 0
    #[inline]
    pub fn effective_priority(&self) -> Priority {
        self.priority.unwrap_or(UNSET_PRIORITY_LEVEL)
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.remaining_time == 0
    }

    #[inline]
    pub fn has_started(&self) -> bool {
        self.response_time.is_some()
    }

    /// Fresh copy with every simulation field cleared
    pub fn snapshot(&self) -> Self {
        Self::new(self.id, self.name.clone(), self.arrival_time, self.burst_time)
            .with_priority_opt(self.priority)
    }

    fn with_priority_opt(mut self, priority: Option<Priority>) -> Self {
        self.priority = priority;
        self
    }

    /// Run for one unit starting at `now`. Returns true when this unit
    /// finished the process.
    pub(crate) fn execute_unit(&mut self, now: Ticks) -> bool {
        debug_assert!(self.remaining_time > 0, "process {} already finished", self.id);

        if self.response_time.is_none() {
            self.response_time = Some(now - self.arrival_time);
        }

        self.remaining_time -= 1;
        if self.remaining_time == 0 {
            let completion = now + 1;
            self.completion_time = Some(completion);
            self.turnaround_time = completion - self.arrival_time;
            self.waiting_time = self.turnaround_time - self.burst_time;
            return true;
        }
        false
    }
}

/// A run of contiguous execution units by one process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GanttSegment {
    pub process_id: Pid,
    pub start: Ticks,
    pub duration: Ticks,
}

impl GanttSegment {
    /// First time unit after this segment
    #[inline]
    pub fn end(&self) -> Ticks {
        self.start + self.duration
    }
}
