/*!
 * API Module
 * External interfaces for hosts (CLI, services, UIs)
 */

pub mod engines;

// Re-export for convenience
pub use engines::{check_safety, detect_deadlock, request_resources, run_schedule};
