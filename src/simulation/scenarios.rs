/*!
 * Scenario Catalogue
 * Built-in workloads and resource scenarios
 */

use super::deadlock::{DeadlockScenario, ScenarioStep};
use crate::banker::{BankerResult, BankersState};
use crate::core::types::Units;
use crate::process::Process;
use crate::resources::{ProcessRecord, Resource, ResourceKind};
use serde::{Deserialize, Serialize};

/// Four processes used by the scheduling comparison
pub fn default_workload() -> Vec<Process> {
    vec![
        Process::new(1, "P1", 0, 8).with_priority(3),
        Process::new(2, "P2", 1, 4).with_priority(1),
        Process::new(3, "P3", 2, 9).with_priority(2),
        Process::new(4, "P4", 3, 5).with_priority(4),
    ]
}

/// Raw Banker's matrices with a label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MatrixExample {
    pub name: String,
    pub allocation: Vec<Vec<Units>>,
    pub max: Vec<Vec<Units>>,
    pub available: Vec<Units>,
}

impl MatrixExample {
    pub fn to_state(&self) -> BankerResult<BankersState> {
        BankersState::new(self.allocation.clone(), self.max.clone(), self.available.clone())
    }
}

/// Five processes over three resources; safe
pub fn classic_bankers() -> MatrixExample {
    MatrixExample {
        name: "classic".to_string(),
        allocation: vec![vec![0, 1, 0], vec![2, 0, 0], vec![3, 0, 2], vec![2, 1, 1], vec![0, 0, 2]],
        max: vec![vec![7, 5, 3], vec![3, 2, 2], vec![9, 0, 2], vec![2, 2, 2], vec![4, 3, 3]],
        available: vec![3, 3, 2],
    }
}

/// Three processes over two resources with nothing available; unsafe
pub fn unsafe_bankers() -> MatrixExample {
    MatrixExample {
        name: "unsafe".to_string(),
        allocation: vec![vec![1, 0], vec![0, 1], vec![1, 1]],
        max: vec![vec![2, 1], vec![1, 2], vec![2, 2]],
        available: vec![0, 0],
    }
}

/// ALPHA, BETA, GAMMA and DELTA each take one resource, then each waits on
/// the next one's resource, closing a four-process circular wait
pub fn circular_wait() -> DeadlockScenario {
    let resources = vec![
        Resource::new(1, "CPU_CORE_1", ResourceKind::Cpu, 2),
        Resource::new(2, "MEMORY_BANK_A", ResourceKind::Memory, 3),
        Resource::new(3, "DISK_DRIVE_1", ResourceKind::Disk, 1),
        Resource::new(4, "PRINTER_LASER", ResourceKind::Printer, 1),
    ];

    let processes = vec![
        ProcessRecord::new(101, "ALPHA")
            .with_max_need(1, 2)
            .with_max_need(2, 1)
            .with_max_need(3, 1)
            .with_max_need(4, 0),
        ProcessRecord::new(102, "BETA")
            .with_max_need(1, 1)
            .with_max_need(2, 2)
            .with_max_need(3, 0)
            .with_max_need(4, 1),
        ProcessRecord::new(103, "GAMMA")
            .with_max_need(1, 1)
            .with_max_need(2, 1)
            .with_max_need(3, 1)
            .with_max_need(4, 0),
        ProcessRecord::new(104, "DELTA")
            .with_max_need(1, 0)
            .with_max_need(2, 1)
            .with_max_need(3, 0)
            .with_max_need(4, 1),
    ];

    let steps = vec![
        ScenarioStep::request(101, 1, 1).described("ALPHA requests CPU_CORE_1"),
        ScenarioStep::request(102, 2, 1).described("BETA requests MEMORY_BANK_A"),
        ScenarioStep::request(103, 3, 1).described("GAMMA requests DISK_DRIVE_1"),
        ScenarioStep::request(104, 4, 1).described("DELTA requests PRINTER_LASER"),
        ScenarioStep::wait(101, 2).described("ALPHA requests MEMORY_BANK_A (held by BETA)"),
        ScenarioStep::wait(102, 3).described("BETA requests DISK_DRIVE_1 (held by GAMMA)"),
        ScenarioStep::wait(103, 4).described("GAMMA requests PRINTER_LASER (held by DELTA)"),
        ScenarioStep::wait(104, 1).described("DELTA requests CPU_CORE_1 (held by ALPHA)"),
    ];

    DeadlockScenario {
        name: "circular_wait".to_string(),
        resources,
        processes,
        steps,
    }
}
