/*!
 * Resources Module
 * Resource model, live allocation state and wait-for graph analysis
 */

pub mod graph;
pub mod state;
pub mod types;

// Re-export public API
pub use graph::{detect_cycle, find_cycle, WaitForGraph};
pub use state::{AllocationState, RequestStatus};
pub use types::{ProcessRecord, ProcessState, Resource, ResourceKind, ResourceResult};
