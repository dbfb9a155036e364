/*!
 * Resource Types
 * Resources and per-process allocation records for the deadlock model
 */

use crate::core::errors::ResourceError;
use crate::core::serde::is_empty_vec;
use crate::core::types::{Pid, ResourceId, Units};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Result type for resource-model operations
pub type ResourceResult<T> = Result<T, ResourceError>;

/// Kind of simulated hardware resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Cpu,
    Memory,
    Disk,
    Printer,
    #[default]
    Generic,
}

impl ResourceKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Memory => "memory",
            Self::Disk => "disk",
            Self::Printer => "printer",
            Self::Generic => "generic",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A counted resource
///
/// One instance behaves as a mutex, more as a counted semaphore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Resource {
    pub id: ResourceId,
    pub name: String,
    #[serde(default)]
    pub kind: ResourceKind,
    pub instances: Units,
    pub available_instances: Units,
}

impl Resource {
    /// New resource with every instance available
    pub fn new(id: ResourceId, name: impl Into<String>, kind: ResourceKind, instances: Units) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            instances,
            available_instances: instances,
        }
    }

    #[inline]
    pub fn is_mutex(&self) -> bool {
        self.instances == 1
    }

    pub fn validate(&self) -> ResourceResult<()> {
        if self.instances == 0 {
            return Err(ResourceError::ZeroInstances(self.id));
        }
        if self.available_instances > self.instances {
            return Err(ResourceError::AvailableExceedsInstances {
                resource: self.id,
                available: self.available_instances,
                instances: self.instances,
            });
        }
        Ok(())
    }
}

/// Run state of a process in the deadlock model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    #[default]
    Running,
    Waiting,
}

/// A process as seen by the resource graph: what it holds, what it is
/// blocked on and what it may ever claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessRecord {
    pub id: Pid,
    pub name: String,
    #[serde(default)]
    pub state: ProcessState,
    #[serde(default)]
    pub allocation: BTreeMap<ResourceId, Units>,
    #[serde(default, skip_serializing_if = "is_empty_vec")]
    pub waiting: Vec<ResourceId>,
    #[serde(default)]
    pub max_need: BTreeMap<ResourceId, Units>,
}

impl ProcessRecord {
    pub fn new(id: Pid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            state: ProcessState::Running,
            allocation: BTreeMap::new(),
            waiting: Vec::new(),
            max_need: BTreeMap::new(),
        }
    }

    /// Declare the maximum units of `resource` this process may claim
    pub fn with_max_need(mut self, resource: ResourceId, units: Units) -> Self {
        self.max_need.insert(resource, units);
        self
    }

    /// Start out holding `units` of `resource`
    pub fn holding(mut self, resource: ResourceId, units: Units) -> Self {
        self.allocation.insert(resource, units);
        self
    }

    /// Start out blocked on `resource`
    pub fn waiting_on(mut self, resource: ResourceId) -> Self {
        if !self.waiting.contains(&resource) {
            self.waiting.push(resource);
        }
        self.state = ProcessState::Waiting;
        self
    }

    #[inline]
    pub fn held(&self, resource: ResourceId) -> Units {
        self.allocation.get(&resource).copied().unwrap_or(0)
    }

    #[inline]
    pub fn max_need_of(&self, resource: ResourceId) -> Units {
        self.max_need.get(&resource).copied().unwrap_or(0)
    }

    #[inline]
    pub fn holds(&self, resource: ResourceId) -> bool {
        self.held(resource) > 0
    }

    #[inline]
    pub fn is_waiting(&self) -> bool {
        !self.waiting.is_empty()
    }
}
