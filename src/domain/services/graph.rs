//! Resource dependency graph
//!
//! Pure ordering logic for provisioning. Nodes are applied in
//! dependency order and torn down in the exact reverse.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt::Display;

use thiserror::Error;

/// Graph construction and ordering errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("node '{0}' is declared twice")]
    DuplicateNode(String),

    #[error("'{node}' depends on unknown node '{dependency}'")]
    UnknownDependency { node: String, dependency: String },

    #[error("dependency cycle between: {}", .0.join(", "))]
    Cycle(Vec<String>),
}

#[derive(Debug, Clone)]
struct Node<N> {
    id: N,
    priority: u8,
    dependencies: Vec<usize>,
}

/// Directed acyclic graph of resources
///
/// Ties between ready nodes break on `priority` (lower first), then on
/// insertion order, so the produced order is deterministic.
#[derive(Debug, Clone)]
pub struct ResourceGraph<N> {
    nodes: Vec<Node<N>>,
}

impl<N> Default for ResourceGraph<N> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<N> ResourceGraph<N>
where
    N: Clone + PartialEq + Display,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &N) -> bool {
        self.index_of(id).is_some()
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.nodes.iter().map(|n| &n.id)
    }

    pub fn add_node(&mut self, id: N, priority: u8) -> Result<(), GraphError> {
        if self.contains(&id) {
            return Err(GraphError::DuplicateNode(id.to_string()));
        }
        self.nodes.push(Node {
            id,
            priority,
            dependencies: Vec::new(),
        });
        Ok(())
    }

    /// Declare that `node` cannot start before `dependency` completes
    pub fn add_dependency(&mut self, node: &N, dependency: &N) -> Result<(), GraphError> {
        let from = self.require(node, node)?;
        let to = self.require(node, dependency)?;
        if from == to {
            return Err(GraphError::Cycle(vec![node.to_string()]));
        }
        if !self.nodes[from].dependencies.contains(&to) {
            self.nodes[from].dependencies.push(to);
        }
        Ok(())
    }

    /// Direct dependencies of `id`
    pub fn dependencies_of(&self, id: &N) -> Vec<N> {
        match self.index_of(id) {
            Some(idx) => self.nodes[idx]
                .dependencies
                .iter()
                .map(|&d| self.nodes[d].id.clone())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Direct dependents of `id`
    pub fn dependents_of(&self, id: &N) -> Vec<N> {
        let Some(idx) = self.index_of(id) else {
            return Vec::new();
        };
        self.nodes
            .iter()
            .filter(|n| n.dependencies.contains(&idx))
            .map(|n| n.id.clone())
            .collect()
    }

    /// Every node that directly or indirectly depends on `id`
    pub fn transitive_dependents(&self, id: &N) -> Vec<N> {
        let Some(start) = self.index_of(id) else {
            return Vec::new();
        };
        let mut reached = vec![false; self.nodes.len()];
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            for (idx, node) in self.nodes.iter().enumerate() {
                if !reached[idx] && node.dependencies.contains(&current) {
                    reached[idx] = true;
                    stack.push(idx);
                }
            }
        }
        self.nodes
            .iter()
            .enumerate()
            .filter(|(idx, _)| reached[*idx])
            .map(|(_, n)| n.id.clone())
            .collect()
    }

    /// Order in which nodes can be applied (Kahn's algorithm)
    pub fn topological_order(&self) -> Result<Vec<N>, GraphError> {
        let mut in_degree: Vec<usize> = self.nodes.iter().map(|n| n.dependencies.len()).collect();
        let mut ready = BinaryHeap::new();
        for (idx, node) in self.nodes.iter().enumerate() {
            if in_degree[idx] == 0 {
                ready.push(Reverse((node.priority, idx)));
            }
        }

        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(Reverse((_, idx))) = ready.pop() {
            order.push(self.nodes[idx].id.clone());
            for (other, node) in self.nodes.iter().enumerate() {
                if node.dependencies.contains(&idx) {
                    in_degree[other] -= 1;
                    if in_degree[other] == 0 {
                        ready.push(Reverse((node.priority, other)));
                    }
                }
            }
        }

        if order.len() != self.nodes.len() {
            let stuck = self
                .nodes
                .iter()
                .enumerate()
                .filter(|(idx, _)| in_degree[*idx] > 0)
                .map(|(_, n)| n.id.to_string())
                .collect();
            return Err(GraphError::Cycle(stuck));
        }
        Ok(order)
    }

    /// Teardown order: exact reverse of the apply order
    pub fn reverse_order(&self) -> Result<Vec<N>, GraphError> {
        let mut order = self.topological_order()?;
        order.reverse();
        Ok(order)
    }

    fn index_of(&self, id: &N) -> Option<usize> {
        self.nodes.iter().position(|n| &n.id == id)
    }

    fn require(&self, node: &N, id: &N) -> Result<usize, GraphError> {
        self.index_of(id).ok_or_else(|| GraphError::UnknownDependency {
            node: node.to_string(),
            dependency: id.to_string(),
        })
    }
}
