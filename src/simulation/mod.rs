/*!
 * Simulation Module
 * Drives scheduling runs and staged deadlock scenarios for a host
 */

pub mod config;
pub mod deadlock;
pub mod scenarios;
pub mod scheduling;

// Re-export public API
pub use config::{SimulationConfig, Strategy};
pub use deadlock::{
    DeadlockReport, DeadlockRun, DeadlockScenario, ScenarioStep, StepAction, StepEffect, StepRecord, Verdict,
};
pub use scenarios::{circular_wait, classic_bankers, default_workload, unsafe_bankers, MatrixExample};
pub use scheduling::{compare_algorithms, SchedulingRun};
