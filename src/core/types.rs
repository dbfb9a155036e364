/*!
 * Core Types
 * Common types used across the simulation engines
 */

/// Process ID type
pub type Pid = u32;

/// Resource ID type
pub type ResourceId = u32;

/// Discrete simulation time, in whole time units
pub type Ticks = u64;

/// Priority level (lower value dispatches first)
pub type Priority = u32;

/// Units of a resource (instances held, requested or available)
pub type Units = u32;

/// Common result type for simulation operations
pub type SimResult<T> = Result<T, super::errors::SimError>;
