/*!
 * OS Visualizer Kernel Library
 * CPU scheduling and deadlock engines exposed as a library
 */

pub mod api;
pub mod banker;
pub mod core;
pub mod monitoring;
pub mod process;
pub mod resources;
pub mod scheduler;
pub mod simulation;

// Re-exports
pub use api::{check_safety, detect_deadlock, request_resources, run_schedule};
pub use banker::{Banker, BankersState, RequestDecision, SafetyReport, SafetyStep};
pub use crate::core::errors::{BankerError, ErrorKind, ResourceError, SchedulerError, SimError};
pub use crate::core::types::{Pid, Priority, ResourceId, SimResult, Ticks, Units};
pub use monitoring::{init_tracing, span_operation};
pub use process::{GanttSegment, Process};
pub use resources::{AllocationState, ProcessRecord, Resource, ResourceKind, WaitForGraph};
pub use scheduler::{Algorithm, Engine, Metrics, ScheduleOutcome, StarvationWarning, TickRecord};
pub use simulation::{
    compare_algorithms, DeadlockReport, DeadlockRun, DeadlockScenario, ScenarioStep, SchedulingRun,
    SimulationConfig, Strategy, Verdict,
};
