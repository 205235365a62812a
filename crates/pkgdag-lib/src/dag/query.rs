//! Read-only queries over a built graph

use super::{DagError, Graph};
use crate::package::Package;
use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

impl Graph {
    /// Every vertex in topological order: dependents before their dependencies
    pub fn sorted(&self) -> Result<Vec<&Package>, DagError> {
        let order = toposort(&self.graph, None).map_err(|cycle| DagError::NotAcyclic {
            key: self.graph[cycle.node_id()].key(),
        })?;
        Ok(order.into_iter().map(|idx| &self.graph[idx]).collect())
    }

    /// Every vertex in build order: dependencies before their dependents
    pub fn reverse_sorted(&self) -> Result<Vec<&Package>, DagError> {
        let mut packages = self.sorted()?;
        packages.reverse();
        Ok(packages)
    }

    /// Keys of the immediate dependencies of `key`, sorted
    pub fn dependencies_of(&self, key: &str) -> Vec<String> {
        let Some(&idx) = self.node_map.get(key) else {
            return Vec::new();
        };
        let mut dependencies: Vec<String> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .map(|dep| self.graph[dep].key())
            .collect();
        dependencies.sort();
        dependencies
    }

    /// Every vertex key, sorted
    pub fn nodes(&self) -> Vec<String> {
        let mut nodes: Vec<String> = self.node_map.keys().cloned().collect();
        nodes.sort();
        nodes
    }

    /// Every vertex sharing `name`, in insertion order
    pub fn nodes_by_name(&self, name: &str) -> Vec<&Package> {
        self.by_name
            .get(name)
            .into_iter()
            .flatten()
            .filter_map(|key| self.package(key))
            .collect()
    }

    /// Origin package names from the definition store, sorted
    pub fn packages(&self) -> Vec<String> {
        self.packages.package_names()
    }

    /// Vertex key to the keys of every vertex with an edge into it
    pub fn predecessor_map(&self) -> HashMap<String, Vec<String>> {
        let mut map: HashMap<String, Vec<String>> = self
            .node_map
            .keys()
            .map(|key| (key.clone(), Vec::new()))
            .collect();
        for edge in self.graph.edge_references() {
            let dependent = self.graph[edge.source()].key();
            map.entry(self.graph[edge.target()].key())
                .or_default()
                .push(dependent);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    include!("query.test.rs");
}
