/*!
 * Process Module
 * Process records, Gantt segments and process-set validation
 */

pub mod types;
pub mod validation;

// Re-export for convenience
pub use types::{GanttSegment, Process};
pub use validation::validate_process_set;
