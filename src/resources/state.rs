/*!
 * Allocation State
 * Live resource tables for staged deadlock scenarios
 */

use super::graph::WaitForGraph;
use super::types::{ProcessRecord, ProcessState, Resource, ResourceResult};
use crate::banker::{BankerResult, BankersState};
use crate::core::errors::ResourceError;
use crate::core::types::{Pid, ResourceId, Units};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

/// Outcome of a blocking request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Acquired,
    Waiting,
}

/// Resources plus the processes holding and waiting on them
///
/// Every mutation keeps `available + held == instances` for each resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "RawAllocationState")]
pub struct AllocationState {
    resources: Vec<Resource>,
    processes: Vec<ProcessRecord>,
}

// Wire shape; validated through `AllocationState::new`
#[derive(Deserialize)]
struct RawAllocationState {
    resources: Vec<Resource>,
    processes: Vec<ProcessRecord>,
}

impl TryFrom<RawAllocationState> for AllocationState {
    type Error = ResourceError;

    fn try_from(raw: RawAllocationState) -> Result<Self, Self::Error> {
        Self::new(raw.resources, raw.processes)
    }
}

impl AllocationState {
    /// Validate and take ownership of the tables
    pub fn new(resources: Vec<Resource>, processes: Vec<ProcessRecord>) -> ResourceResult<Self> {
        let mut resource_ids = HashSet::new();
        for resource in &resources {
            resource.validate()?;
            if !resource_ids.insert(resource.id) {
                return Err(ResourceError::DuplicateResource(resource.id));
            }
        }

        let mut pids = HashSet::new();
        for process in &processes {
            if !pids.insert(process.id) {
                return Err(ResourceError::DuplicateProcess(process.id));
            }
            for resource in process.allocation.keys().chain(process.waiting.iter()) {
                if !resource_ids.contains(resource) {
                    return Err(ResourceError::UnknownResource(*resource));
                }
            }
        }

        for resource in &resources {
            let held: u64 = processes.iter().map(|p| u64::from(p.held(resource.id))).sum();
            if held + u64::from(resource.available_instances) != u64::from(resource.instances) {
                return Err(ResourceError::InconsistentAvailability {
                    resource: resource.id,
                    available: resource.available_instances,
                    expected: u64::from(resource.instances).saturating_sub(held) as Units,
                });
            }
        }

        Ok(Self { resources, processes })
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn processes(&self) -> &[ProcessRecord] {
        &self.processes
    }

    pub fn resource(&self, id: ResourceId) -> Option<&Resource> {
        self.resources.iter().find(|r| r.id == id)
    }

    pub fn process(&self, pid: Pid) -> Option<&ProcessRecord> {
        self.processes.iter().find(|p| p.id == pid)
    }

    fn indices(&self, pid: Pid, resource: ResourceId) -> ResourceResult<(usize, usize)> {
        let p = self
            .processes
            .iter()
            .position(|p| p.id == pid)
            .ok_or(ResourceError::UnknownProcess(pid))?;
        let r = self
            .resources
            .iter()
            .position(|r| r.id == resource)
            .ok_or(ResourceError::UnknownResource(resource))?;
        Ok((p, r))
    }

    /// Grant `units` of `resource` immediately, or fail without changes
    pub fn allocate(&mut self, pid: Pid, resource: ResourceId, units: Units) -> ResourceResult<()> {
        let (p, r) = self.indices(pid, resource)?;
        if units == 0 {
            return Err(ResourceError::ZeroUnits { pid, resource });
        }

        let available = self.resources[r].available_instances;
        if available < units {
            return Err(ResourceError::InsufficientInstances {
                pid,
                resource,
                requested: units,
                available,
            });
        }

        self.resources[r].available_instances -= units;
        let process = &mut self.processes[p];
        *process.allocation.entry(resource).or_insert(0) += units;
        process.waiting.retain(|&w| w != resource);
        if process.waiting.is_empty() {
            process.state = ProcessState::Running;
        }

        debug!(
            pid = pid,
            resource = resource,
            units = units,
            available = self.resources[r].available_instances,
            "resource allocated"
        );
        Ok(())
    }

    /// Acquire when enough instances are free, otherwise block on `resource`
    pub fn request(&mut self, pid: Pid, resource: ResourceId, units: Units) -> ResourceResult<RequestStatus> {
        let (_, r) = self.indices(pid, resource)?;
        if units == 0 {
            return Err(ResourceError::ZeroUnits { pid, resource });
        }

        if self.resources[r].available_instances >= units {
            self.allocate(pid, resource, units)?;
            Ok(RequestStatus::Acquired)
        } else {
            self.wait(pid, resource)?;
            Ok(RequestStatus::Waiting)
        }
    }

    /// Block `pid` on `resource` regardless of availability
    pub fn wait(&mut self, pid: Pid, resource: ResourceId) -> ResourceResult<()> {
        let (p, _) = self.indices(pid, resource)?;
        let process = &mut self.processes[p];
        if !process.waiting.contains(&resource) {
            process.waiting.push(resource);
        }
        process.state = ProcessState::Waiting;

        info!(pid = pid, resource = resource, "process waiting");
        Ok(())
    }

    /// Return `units` of `resource` to the pool
    pub fn release(&mut self, pid: Pid, resource: ResourceId, units: Units) -> ResourceResult<()> {
        let (p, r) = self.indices(pid, resource)?;
        if units == 0 {
            return Err(ResourceError::ZeroUnits { pid, resource });
        }

        let held = self.processes[p].held(resource);
        if held < units {
            return Err(ResourceError::ReleaseExceedsHeld {
                pid,
                resource,
                requested: units,
                held,
            });
        }

        let process = &mut self.processes[p];
        if held == units {
            process.allocation.remove(&resource);
        } else {
            process.allocation.insert(resource, held - units);
        }
        self.resources[r].available_instances += units;

        debug!(pid = pid, resource = resource, units = units, "resource released");
        Ok(())
    }

    /// Processes holding at least one unit of `resource`
    pub fn holders(&self, resource: ResourceId) -> Vec<Pid> {
        self.processes
            .iter()
            .filter(|p| p.holds(resource))
            .map(|p| p.id)
            .collect()
    }

    pub fn wait_for_graph(&self) -> WaitForGraph {
        WaitForGraph::build(&self.processes, &self.resources)
    }

    #[inline]
    pub fn detect_cycle(&self) -> bool {
        self.wait_for_graph().has_cycle()
    }

    #[inline]
    pub fn find_cycle(&self) -> Option<Vec<Pid>> {
        self.wait_for_graph().find_cycle()
    }

    /// Project onto Banker's matrices: rows follow process order, columns
    /// follow resource order
    ///
    /// Fails with `NegativeNeed` when a process holds more than it declared.
    pub fn to_bankers_state(&self) -> BankerResult<BankersState> {
        let allocation = self
            .processes
            .iter()
            .map(|p| self.resources.iter().map(|r| p.held(r.id)).collect())
            .collect();
        let max = self
            .processes
            .iter()
            .map(|p| self.resources.iter().map(|r| p.max_need_of(r.id)).collect())
            .collect();
        let available = self.resources.iter().map(|r| r.available_instances).collect();

        BankersState::new(allocation, max, available)
    }
}
