//! Relocation dependency graph.
//!
//! Each relocating occupant needs its destination to be vacant. If the
//! destination currently holds another relocating occupant, that one has
//! to move first: an edge `k → blocker(k)`. Departing occupants never
//! block since departures run before any relocation.
//!
//! Every node has at most one outgoing edge (a destination holds at most
//! one occupant), so the graph is functional: each weak component is a
//! set of chains feeding into at most one cycle. In a well-formed
//! before/after pair no chain feeds into a cycle, since a cycle already
//! claims every destination it could be reached through.
//!
//! # Algorithm
//!
//! Three-color walk (unvisited / on path / done). Reaching a node that is
//! on the current path closes a cycle. Chains are ordered by emitting a
//! node only after its blocker.
//!
//! # Complexity
//! O(n) for n relocations.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.3 (DFS)

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

/// Functional dependency graph over relocation indices.
#[derive(Debug, Clone)]
pub(crate) struct DependencyGraph {
    blocker: Vec<Option<usize>>,
}

/// Cycles and chain order of a dependency graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Resolution {
    /// Non-cycle nodes, each after its blocker.
    pub chain_order: Vec<usize>,
    /// Cycles in discovery order; members follow blocker edges.
    pub cycles: Vec<Vec<usize>>,
}

impl DependencyGraph {
    /// Builds the graph from `(origin, destination)` per relocation.
    pub fn new(moves: &[(&str, &str)]) -> Self {
        let by_origin: HashMap<&str, usize> = moves
            .iter()
            .enumerate()
            .map(|(k, &(origin, _))| (origin, k))
            .collect();
        let blocker = moves
            .iter()
            .map(|&(_, destination)| by_origin.get(destination).copied())
            .collect();
        Self { blocker }
    }

    #[cfg(test)]
    fn from_edges(blocker: Vec<Option<usize>>) -> Self {
        Self { blocker }
    }

    pub fn len(&self) -> usize {
        self.blocker.len()
    }

    /// Detects cycles and orders the remaining nodes.
    pub fn resolve(&self) -> Resolution {
        let n = self.len();
        let mut marks = vec![Mark::Unvisited; n];
        let mut in_cycle = vec![false; n];
        let mut cycles = Vec::new();

        for start in 0..n {
            if marks[start] != Mark::Unvisited {
                continue;
            }
            let mut path = Vec::new();
            let mut cursor = Some(start);
            while let Some(node) = cursor {
                match marks[node] {
                    Mark::Unvisited => {
                        marks[node] = Mark::OnPath;
                        path.push(node);
                        cursor = self.blocker[node];
                    }
                    Mark::OnPath => {
                        // Back edge: everything from `node` onward is a cycle.
                        if let Some(at) = path.iter().position(|&p| p == node) {
                            let cycle = path[at..].to_vec();
                            for &member in &cycle {
                                in_cycle[member] = true;
                            }
                            cycles.push(cycle);
                        }
                        break;
                    }
                    Mark::Done => break,
                }
            }
            for node in path {
                marks[node] = Mark::Done;
            }
        }

        let chain_order = self.chain_order(&in_cycle);
        Resolution {
            chain_order,
            cycles,
        }
    }

    /// Non-cycle nodes ordered so that each follows its blocker.
    fn chain_order(&self, in_cycle: &[bool]) -> Vec<usize> {
        let n = self.len();
        let mut emitted = vec![false; n];
        let mut order = Vec::with_capacity(n);

        for start in 0..n {
            if emitted[start] || in_cycle[start] {
                continue;
            }
            let mut stack = Vec::new();
            let mut cursor = Some(start);
            while let Some(node) = cursor {
                if emitted[node] || in_cycle[node] {
                    break;
                }
                stack.push(node);
                cursor = self.blocker[node];
            }
            while let Some(node) = stack.pop() {
                emitted[node] = true;
                order.push(node);
            }
        }
        order
    }
}
