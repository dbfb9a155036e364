/*!
 * Scheduler Module
 * CPU scheduling engine, Gantt trace and run metrics
 */

mod entry;

pub mod engine;
pub mod starvation;
pub mod stats;
pub mod trace;
pub mod types;

// Re-export public API
pub use engine::{run_schedule, Engine, ScheduleOutcome};
pub use starvation::{check_starvation, StarvationWarning};
pub use stats::{Completeness, EngineStats, Metrics};
pub use trace::GanttTrace;
pub use types::{Algorithm, SchedulerResult, TickRecord};
