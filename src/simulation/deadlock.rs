/*!
 * Deadlock Scenarios
 * Staged request/wait replay with a detection or avoidance verdict
 */

use super::config::Strategy;
use crate::core::serde::is_none;
use crate::core::types::{Pid, ResourceId, SimResult, Units};
use crate::resources::{AllocationState, ProcessRecord, RequestStatus, Resource};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// What a scenario step does to the allocation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepAction {
    /// Acquire when available, otherwise block
    Request,
    /// Acquire immediately; fails when not available
    Allocate,
    /// Block on the resource regardless of availability
    Wait,
    Release,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ScenarioStep {
    pub action: StepAction,
    pub pid: Pid,
    pub resource: ResourceId,
    pub units: Units,
    #[serde(default, skip_serializing_if = "is_none")]
    pub description: Option<String>,
}

impl ScenarioStep {
    fn new(action: StepAction, pid: Pid, resource: ResourceId, units: Units) -> Self {
        Self {
            action,
            pid,
            resource,
            units,
            description: None,
        }
    }

    pub fn request(pid: Pid, resource: ResourceId, units: Units) -> Self {
        Self::new(StepAction::Request, pid, resource, units)
    }

    pub fn allocate(pid: Pid, resource: ResourceId, units: Units) -> Self {
        Self::new(StepAction::Allocate, pid, resource, units)
    }

    pub fn wait(pid: Pid, resource: ResourceId) -> Self {
        Self::new(StepAction::Wait, pid, resource, 1)
    }

    pub fn release(pid: Pid, resource: ResourceId, units: Units) -> Self {
        Self::new(StepAction::Release, pid, resource, units)
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A named, ordered list of steps over an initial allocation state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DeadlockScenario {
    pub name: String,
    pub resources: Vec<Resource>,
    pub processes: Vec<ProcessRecord>,
    pub steps: Vec<ScenarioStep>,
}

impl DeadlockScenario {
    pub fn initial_state(&self) -> SimResult<AllocationState> {
        Ok(AllocationState::new(self.resources.clone(), self.processes.clone())?)
    }
}

/// Effect a step had once applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepEffect {
    Acquired,
    Waiting,
    Released,
}

/// Log entry for one applied step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StepRecord {
    /// 1-based position in the scenario
    pub step: usize,
    pub action: StepAction,
    pub effect: StepEffect,
    pub message: String,
}

impl fmt::Display for StepRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "STEP {}: {}", self.step, self.message)
    }
}

/// Final judgement of a scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum Verdict {
    Detection {
        deadlocked: bool,
        /// Processes on the detected cycle, in wait order
        cycle: Vec<Pid>,
    },
    Avoidance {
        safe: bool,
        /// Safe completion order as process ids; `None` when no safe
        /// sequence exists
        sequence: Option<Vec<Pid>>,
    },
}

impl Verdict {
    /// True when the scenario ended deadlocked or unsafe
    pub fn is_hazard(&self) -> bool {
        match self {
            Self::Detection { deadlocked, .. } => *deadlocked,
            Self::Avoidance { safe, .. } => !safe,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(pids: &[Pid]) -> String {
            pids.iter().map(Pid::to_string).collect::<Vec<_>>().join(" -> ")
        }

        match self {
            Self::Detection { deadlocked: true, cycle } => {
                write!(f, "deadlock detected: circular wait {}", join(cycle))
            }
            Self::Detection { deadlocked: false, .. } => f.write_str("no deadlock"),
            Self::Avoidance {
                sequence: Some(sequence),
                ..
            } => write!(f, "safe sequence found: {}", join(sequence)),
            Self::Avoidance { sequence: None, .. } => f.write_str("unsafe state: no safe sequence"),
        }
    }
}

/// Everything a finished scenario produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DeadlockReport {
    pub scenario: String,
    pub strategy: Strategy,
    pub log: Vec<StepRecord>,
    pub verdict: Verdict,
    pub state: AllocationState,
}

/// Replays a scenario one step at a time
#[derive(Debug, Clone)]
pub struct DeadlockRun {
    scenario: DeadlockScenario,
    strategy: Strategy,
    state: AllocationState,
    cursor: usize,
    log: Vec<StepRecord>,
}

impl DeadlockRun {
    pub fn new(scenario: DeadlockScenario, strategy: Strategy) -> SimResult<Self> {
        let state = scenario.initial_state()?;
        Ok(Self {
            scenario,
            strategy,
            state,
            cursor: 0,
            log: Vec::new(),
        })
    }

    /// Apply the next step; `None` once every step has been applied
    ///
    /// A failing step leaves the state and cursor unchanged.
    pub fn step(&mut self) -> SimResult<Option<&StepRecord>> {
        let Some(step) = self.scenario.steps.get(self.cursor) else {
            return Ok(None);
        };

        let effect = match step.action {
            StepAction::Request => match self.state.request(step.pid, step.resource, step.units)? {
                RequestStatus::Acquired => StepEffect::Acquired,
                RequestStatus::Waiting => StepEffect::Waiting,
            },
            StepAction::Allocate => {
                self.state.allocate(step.pid, step.resource, step.units)?;
                StepEffect::Acquired
            }
            StepAction::Wait => {
                self.state.wait(step.pid, step.resource)?;
                StepEffect::Waiting
            }
            StepAction::Release => {
                self.state.release(step.pid, step.resource, step.units)?;
                StepEffect::Released
            }
        };

        let record = StepRecord {
            step: self.cursor + 1,
            action: step.action,
            effect,
            message: self.describe(step, effect),
        };
        debug!(step = record.step, effect = ?effect, "{}", record.message);

        self.cursor += 1;
        self.log.push(record);
        Ok(self.log.last())
    }

    fn describe(&self, step: &ScenarioStep, effect: StepEffect) -> String {
        let process = self
            .state
            .process(step.pid)
            .map_or_else(|| step.pid.to_string(), |p| p.name.clone());
        let resource = self
            .state
            .resource(step.resource)
            .map_or_else(|| step.resource.to_string(), |r| r.name.clone());

        let outcome = match effect {
            StepEffect::Acquired => format!("{process} acquired {} instance(s) of {resource}", step.units),
            StepEffect::Waiting => format!("{process} waiting for {resource}"),
            StepEffect::Released => format!("{process} released {} instance(s) of {resource}", step.units),
        };
        match &step.description {
            Some(description) => format!("{description} -> {outcome}"),
            None => outcome,
        }
    }

    /// Judge the current state with this run's strategy
    pub fn verdict(&self) -> SimResult<Verdict> {
        let verdict = match self.strategy {
            Strategy::Detection => {
                let cycle = self.state.find_cycle();
                Verdict::Detection {
                    deadlocked: cycle.is_some(),
                    cycle: cycle.unwrap_or_default(),
                }
            }
            Strategy::Avoidance => {
                let report = self.state.to_bankers_state()?.check_safety();
                let pids: Vec<Pid> = report
                    .sequence
                    .iter()
                    .map(|&i| self.state.processes()[i].id)
                    .collect();
                Verdict::Avoidance {
                    safe: report.safe,
                    sequence: report.safe.then_some(pids),
                }
            }
        };

        if verdict.is_hazard() {
            warn!(scenario = %self.scenario.name, "{}", verdict);
        } else {
            info!(scenario = %self.scenario.name, "{}", verdict);
        }
        Ok(verdict)
    }

    /// Apply every remaining step, then judge
    pub fn run(mut self) -> SimResult<DeadlockReport> {
        while self.step()?.is_some() {}
        let verdict = self.verdict()?;
        Ok(DeadlockReport {
            scenario: self.scenario.name,
            strategy: self.strategy,
            log: self.log,
            verdict,
            state: self.state,
        })
    }

    /// Back to the initial state with an empty log
    pub fn restart(&mut self) -> SimResult<()> {
        self.state = self.scenario.initial_state()?;
        self.cursor = 0;
        self.log.clear();
        Ok(())
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.cursor >= self.scenario.steps.len()
    }

    pub fn state(&self) -> &AllocationState {
        &self.state
    }

    pub fn log(&self) -> &[StepRecord] {
        &self.log
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn scenario(&self) -> &DeadlockScenario {
        &self.scenario
    }
}
