/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use super::types::{Pid, ResourceId, Ticks, Units};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse error classification shared by every engine
///
/// `InvalidInput` is fatal to the run that produced it. The remaining kinds
/// are decisions: the engine leaves its state untouched and the caller may
/// retry with an adjusted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    ExceedsNeed,
    ExceedsAvailable,
    UnsafeState,
}

impl ErrorKind {
    /// Whether the caller may retry after adjusting its request
    #[inline]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InvalidInput)
    }
}

/// Scheduling-engine errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SchedulerError {
    #[error("Process set is empty")]
    #[diagnostic(
        code(scheduler::empty_process_set),
        help("Add at least one process before starting a scheduling run.")
    )]
    EmptyProcessSet,

    #[error("Process {pid} has non-positive burst time")]
    #[diagnostic(
        code(scheduler::non_positive_burst),
        help("Every process needs a burst time of at least 1 time unit.")
    )]
    NonPositiveBurst { pid: Pid },

    #[error("Duplicate process id {0}")]
    #[diagnostic(
        code(scheduler::duplicate_process_id),
        help("Process ids must be unique within one process set.")
    )]
    DuplicateProcessId(Pid),

    #[error("Round Robin requires a positive time quantum (got {0})")]
    #[diagnostic(
        code(scheduler::missing_quantum),
        help("Pass a quantum of at least 1 time unit when using Round Robin.")
    )]
    MissingQuantum(Ticks),

    #[error("Invalid scheduling algorithm: {0}")]
    #[diagnostic(
        code(scheduler::invalid_algorithm),
        help("Use fcfs, sjf, srtf, rr, priority, or mlfq.")
    )]
    InvalidAlgorithm(String),
}

/// Resource-allocation errors for the deadlock model
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ResourceError {
    #[error("Process {0} not found")]
    #[diagnostic(
        code(resource::unknown_process),
        help("The process is not part of this allocation state.")
    )]
    UnknownProcess(Pid),

    #[error("Resource {0} not found")]
    #[diagnostic(
        code(resource::unknown_resource),
        help("The resource is not part of this allocation state.")
    )]
    UnknownResource(ResourceId),

    #[error("Duplicate process id {0}")]
    #[diagnostic(code(resource::duplicate_process))]
    DuplicateProcess(Pid),

    #[error("Duplicate resource id {0}")]
    #[diagnostic(code(resource::duplicate_resource))]
    DuplicateResource(ResourceId),

    #[error("Resource {0} must have at least one instance")]
    #[diagnostic(
        code(resource::zero_instances),
        help("A resource with one instance models a mutex; more model a counted semaphore.")
    )]
    ZeroInstances(ResourceId),

    #[error("Resource {resource} reports {available} available of {instances} instances")]
    #[diagnostic(code(resource::available_exceeds_instances))]
    AvailableExceedsInstances {
        resource: ResourceId,
        available: Units,
        instances: Units,
    },

    #[error("Resource {resource} reports {available} available, expected {expected} from current allocations")]
    #[diagnostic(
        code(resource::inconsistent_availability),
        help("Available instances must equal total instances minus the units held by processes.")
    )]
    InconsistentAvailability {
        resource: ResourceId,
        available: Units,
        expected: Units,
    },

    #[error("Process {pid} requested {requested} of resource {resource}, only {available} available")]
    #[diagnostic(
        code(resource::insufficient_instances),
        help("Use a request step instead of a direct allocation to block until instances free up.")
    )]
    InsufficientInstances {
        pid: Pid,
        resource: ResourceId,
        requested: Units,
        available: Units,
    },

    #[error("Process {pid} released {requested} of resource {resource} but holds {held}")]
    #[diagnostic(code(resource::release_exceeds_held))]
    ReleaseExceedsHeld {
        pid: Pid,
        resource: ResourceId,
        requested: Units,
        held: Units,
    },

    #[error("Process {pid} operated on zero units of resource {resource}")]
    #[diagnostic(code(resource::zero_units))]
    ZeroUnits { pid: Pid, resource: ResourceId },
}

/// Banker's algorithm errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum BankerError {
    #[error("Matrix dimensions do not agree: {0}")]
    #[diagnostic(
        code(banker::dimension_mismatch),
        help("Allocation and max need one row per process and one column per resource.")
    )]
    DimensionMismatch(String),

    #[error("Invalid state: process {process} holds {allocation} of resource {resource}, above its maximum {max}")]
    #[diagnostic(
        code(banker::negative_need),
        help("Allocation can never exceed the declared maximum. Fix the input matrices.")
    )]
    NegativeNeed {
        process: usize,
        resource: usize,
        allocation: Units,
        max: Units,
    },

    #[error("Total instances of resource {resource} overflow: {available} available plus {allocated} allocated")]
    #[diagnostic(
        code(banker::total_overflow),
        help("Available plus allocated units of every resource must fit in a 32-bit count.")
    )]
    TotalOverflow {
        resource: usize,
        available: Units,
        allocated: u64,
    },

    #[error("Process index {index} out of range ({processes} processes)")]
    #[diagnostic(code(banker::process_out_of_range))]
    ProcessOutOfRange { index: usize, processes: usize },

    #[error("Request exceeds maximum need for resource {resource}: requested {requested}, need {need}")]
    #[diagnostic(
        code(banker::exceeds_need),
        help("A process may not request more than its remaining declared need.")
    )]
    ExceedsNeed {
        process: usize,
        resource: usize,
        requested: Units,
        need: Units,
    },

    #[error("Request exceeds available resources for resource {resource}: requested {requested}, available {available}")]
    #[diagnostic(
        code(banker::exceeds_available),
        help("Retry once other processes release instances.")
    )]
    ExceedsAvailable {
        process: usize,
        resource: usize,
        requested: Units,
        available: Units,
    },

    #[error("Request denied: granting it leaves no safe sequence (partial: {partial_sequence:?})")]
    #[diagnostic(
        code(banker::unsafe_state),
        help("The state was left unchanged. Retry with a smaller request or after releases.")
    )]
    UnsafeState { partial_sequence: Vec<usize> },
}

impl SchedulerError {
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidInput
    }
}

impl ResourceError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InsufficientInstances { .. } => ErrorKind::ExceedsAvailable,
            _ => ErrorKind::InvalidInput,
        }
    }
}

impl BankerError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ExceedsNeed { .. } => ErrorKind::ExceedsNeed,
            Self::ExceedsAvailable { .. } => ErrorKind::ExceedsAvailable,
            Self::UnsafeState { .. } => ErrorKind::UnsafeState,
            Self::DimensionMismatch(_)
            | Self::NegativeNeed { .. }
            | Self::TotalOverflow { .. }
            | Self::ProcessOutOfRange { .. } => ErrorKind::InvalidInput,
        }
    }
}

/// Unified simulation error type with miette diagnostics
#[derive(Error, Debug, Diagnostic)]
pub enum SimError {
    #[error("Scheduler error: {0}")]
    #[diagnostic(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error("Resource error: {0}")]
    #[diagnostic(transparent)]
    Resource(#[from] ResourceError),

    #[error("Banker error: {0}")]
    #[diagnostic(transparent)]
    Banker(#[from] BankerError),

    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(sim::configuration_error),
        help("Invalid configuration. Review OSVIZ_* variables or the config file.")
    )]
    Configuration(String),

    #[error("I/O error: {0}")]
    #[diagnostic(
        code(sim::io_error),
        help("Reading host input failed. Check the path and file permissions.")
    )]
    Io(String),
}

impl SimError {
    /// Classify into the four-way taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Scheduler(e) => e.kind(),
            Self::Resource(e) => e.kind(),
            Self::Banker(e) => e.kind(),
            Self::Configuration(_) | Self::Io(_) => ErrorKind::InvalidInput,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        self.kind().is_recoverable()
    }
}

impl From<std::io::Error> for SimError {
    fn from(err: std::io::Error) -> Self {
        SimError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::Configuration(err.to_string())
    }
}
