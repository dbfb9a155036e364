/*!
 * Wait-For Graph
 * Deadlock detection over live allocation state
 */

use super::types::{ProcessRecord, Resource};
use crate::core::types::{Pid, ResourceId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Directed graph with an edge A -> B whenever A waits on a resource B holds
///
/// Nodes are positions in the process slice it was built from. The graph is
/// derived fresh on every detection pass and never mutates its inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WaitForGraph {
    nodes: Vec<Pid>,
    edges: Vec<Vec<usize>>,
}

impl WaitForGraph {
    /// Build the graph; waits on resources missing from `resources` are
    /// ignored
    pub fn build(processes: &[ProcessRecord], resources: &[Resource]) -> Self {
        let known: HashSet<ResourceId> = resources.iter().map(|r| r.id).collect();

        let mut holders: HashMap<ResourceId, Vec<usize>> = HashMap::new();
        for (index, process) in processes.iter().enumerate() {
            for (&resource, &units) in &process.allocation {
                if units > 0 && known.contains(&resource) {
                    holders.entry(resource).or_default().push(index);
                }
            }
        }

        let mut edges = vec![Vec::new(); processes.len()];
        let mut seen = HashSet::new();
        for (index, process) in processes.iter().enumerate() {
            seen.clear();
            for resource in &process.waiting {
                let Some(owners) = holders.get(resource) else {
                    continue;
                };
                for &owner in owners {
                    if owner != index && seen.insert(owner) {
                        edges[index].push(owner);
                    }
                }
            }
        }

        Self {
            nodes: processes.iter().map(|p| p.id).collect(),
            edges,
        }
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }

    /// Edges as (waiter, holder) process id pairs
    pub fn edges(&self) -> Vec<(Pid, Pid)> {
        self.edges
            .iter()
            .enumerate()
            .flat_map(|(from, targets)| targets.iter().map(move |&to| (self.nodes[from], self.nodes[to])))
            .collect()
    }

    #[inline]
    pub fn has_cycle(&self) -> bool {
        self.find_cycle().is_some()
    }

    /// Processes on the first cycle found, in wait order
    ///
    /// Iterative three-colour DFS rooted at every unvisited node. Each node
    /// and edge is explored once, so the pass is O(P + E).
    pub fn find_cycle(&self) -> Option<Vec<Pid>> {
        let mut color = vec![Color::White; self.nodes.len()];
        // (node, index of the next edge to explore)
        let mut stack: Vec<(usize, usize)> = Vec::new();

        for root in 0..self.nodes.len() {
            if color[root] != Color::White {
                continue;
            }
            color[root] = Color::Gray;
            stack.push((root, 0));

            while let Some(top) = stack.last_mut() {
                let (node, next) = *top;
                let Some(&target) = self.edges[node].get(next) else {
                    color[node] = Color::Black;
                    stack.pop();
                    continue;
                };
                top.1 += 1;

                match color[target] {
                    Color::White => {
                        color[target] = Color::Gray;
                        stack.push((target, 0));
                    }
                    Color::Gray => {
                        // Back edge: the cycle is the stack suffix from target
                        let start = stack.iter().position(|&(n, _)| n == target).unwrap_or(0);
                        let cycle: Vec<Pid> = stack[start..].iter().map(|&(n, _)| self.nodes[n]).collect();
                        debug!(cycle = ?cycle, "wait-for cycle found");
                        return Some(cycle);
                    }
                    Color::Black => {}
                }
            }
        }
        None
    }
}

/// True when the wait-for graph of `processes` contains a cycle
pub fn detect_cycle(processes: &[ProcessRecord], resources: &[Resource]) -> bool {
    WaitForGraph::build(processes, resources).has_cycle()
}

/// Deadlocked processes in wait order, if any
pub fn find_cycle(processes: &[ProcessRecord], resources: &[Resource]) -> Option<Vec<Pid>> {
    WaitForGraph::build(processes, resources).find_cycle()
}
