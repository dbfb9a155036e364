/*!
 * Scheduler Types
 * Algorithm selection and per-tick records
 */

use crate::core::errors::SchedulerError;
use crate::core::types::{Pid, Ticks};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Scheduling engine result
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// CPU scheduling discipline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// First come, first served
    Fcfs,
    /// Shortest job first (non-preemptive)
    Sjf,
    /// Shortest remaining time first (preemptive)
    Srtf,
    /// Round robin with a fixed time quantum
    RoundRobin,
    /// Static priority, non-preemptive
    Priority,
    /// Multilevel feedback queue, simplified: the priority is a fixed queue
    /// level and processes are never promoted or demoted, so dispatch order
    /// equals `Priority`
    Mlfq,
}

impl Algorithm {
    /// Every algorithm, in presentation order
    pub const ALL: [Algorithm; 6] = [
        Self::Fcfs,
        Self::Sjf,
        Self::Srtf,
        Self::RoundRobin,
        Self::Priority,
        Self::Mlfq,
    ];

    /// Canonical short name
    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fcfs => "fcfs",
            Self::Sjf => "sjf",
            Self::Srtf => "srtf",
            Self::RoundRobin => "rr",
            Self::Priority => "priority",
            Self::Mlfq => "mlfq",
        }
    }

    pub const fn title(&self) -> &'static str {
        match self {
            Self::Fcfs => "First Come First Serve",
            Self::Sjf => "Shortest Job First",
            Self::Srtf => "Shortest Remaining Time First",
            Self::RoundRobin => "Round Robin",
            Self::Priority => "Priority Scheduling",
            Self::Mlfq => "Multilevel Feedback Queue",
        }
    }

    /// Whether the running process can lose the CPU before it finishes
    #[inline]
    pub const fn is_preemptive(&self) -> bool {
        matches!(self, Self::Srtf | Self::RoundRobin)
    }

    #[inline]
    pub const fn requires_quantum(&self) -> bool {
        matches!(self, Self::RoundRobin)
    }

    /// Whether the starvation diagnostic applies
    #[inline]
    pub const fn reports_starvation(&self) -> bool {
        matches!(self, Self::Priority)
    }
}

impl FromStr for Algorithm {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fcfs" | "fifo" => Ok(Self::Fcfs),
            "sjf" => Ok(Self::Sjf),
            "srtf" => Ok(Self::Srtf),
            "rr" | "round_robin" | "roundrobin" => Ok(Self::RoundRobin),
            "priority" | "prio" => Ok(Self::Priority),
            "mlfq" => Ok(Self::Mlfq),
            _ => Err(SchedulerError::InvalidAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Algorithm {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Algorithm {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// What happened during one engine tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TickRecord {
    /// Time unit that was simulated
    pub time: Ticks,
    /// Process that held the CPU, `None` when the CPU idled
    pub running: Option<Pid>,
    /// Process that finished at the end of this unit
    pub completed: Option<Pid>,
}

impl TickRecord {
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.running.is_none()
    }
}
