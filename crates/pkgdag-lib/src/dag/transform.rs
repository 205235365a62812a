//! Subgraph extraction and filtering
//!
//! Every transform returns a new, independent [`Graph`]; the receiver is
//! never modified.

use super::{DagError, Graph};
use crate::package::{LOCAL, Package};
use crate::store::PackageStore;
use petgraph::visit::EdgeRef;
use std::collections::HashSet;
use std::sync::Arc;

/// Vertex predicate used by [`Graph::filter`]
pub type Filter = Box<dyn Fn(&Package) -> bool + Send + Sync>;

/// Keep packages whose source is one of `sources`
pub fn filter_sources<I, S>(sources: I) -> Filter
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let sources: HashSet<String> = sources.into_iter().map(Into::into).collect();
    Box::new(move |pkg| sources.contains(pkg.source()))
}

/// Keep packages whose source is none of `sources`
pub fn filter_not_sources<I, S>(sources: I) -> Filter
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let sources: HashSet<String> = sources.into_iter().map(Into::into).collect();
    Box::new(move |pkg| !sources.contains(pkg.source()))
}

pub fn filter_local() -> Filter {
    filter_sources([LOCAL])
}

pub fn filter_not_local() -> Filter {
    filter_not_sources([LOCAL])
}

impl Graph {
    /// Rebuild the graph from the store closure of `roots`: each named
    /// package plus every local package it transitively depends on
    pub fn subgraph_with_roots<S: AsRef<str>>(&self, roots: &[S]) -> Result<Graph, DagError> {
        let packages = self.packages.sub(roots)?;
        Graph::build(Arc::new(packages), self.opts.clone())
    }

    /// Every vertex that transitively depends on one of `leaves`, with the
    /// edges along the way. A leaf is a package name or an exact vertex key.
    pub fn subgraph_with_leaves<S: AsRef<str>>(&self, leaves: &[S]) -> Result<Graph, DagError> {
        let predecessors = self.predecessor_map();
        let mut subgraph = Graph::empty(Arc::new(PackageStore::new()), self.opts.clone());

        let mut stack = Vec::new();
        for leaf in leaves {
            stack.extend(self.leaf_keys(leaf.as_ref())?);
        }

        let mut visited = HashSet::new();
        while let Some(key) = stack.pop() {
            if !visited.insert(key.clone()) {
                continue;
            }
            let pkg = self.vertex(&key)?;
            subgraph.add_vertex(pkg);

            for dependent in predecessors.get(&key).into_iter().flatten() {
                subgraph.add_vertex(self.vertex(dependent)?);
                let edge = self.edge(dependent, &key).cloned().unwrap_or_default();
                subgraph.add_edge(dependent, &key, edge)?;
                stack.push(dependent.clone());
            }
        }

        let origins: Vec<String> = subgraph
            .graph
            .node_weights()
            .filter_map(Package::local)
            .map(|local| local.origin_key())
            .collect();
        subgraph.packages = Arc::new(self.packages.subset_by_keys(&origins)?);
        Ok(subgraph)
    }

    /// Copy of the graph holding the vertices `predicate` accepts and every
    /// edge whose endpoints both survive, attributes included
    pub fn filter<F>(&self, predicate: F) -> Graph
    where
        F: Fn(&Package) -> bool,
    {
        let mut subgraph = Graph::empty(self.packages.clone(), self.opts.clone());

        for pkg in self.graph.node_weights() {
            if predicate(pkg) {
                subgraph.add_vertex(pkg.clone());
            }
        }

        for edge in self.graph.edge_references() {
            let source = subgraph.node_map.get(&self.graph[edge.source()].key()).copied();
            let target = subgraph.node_map.get(&self.graph[edge.target()].key()).copied();
            if let (Some(source), Some(target)) = (source, target) {
                subgraph.graph.add_edge(source, target, edge.weight().clone());
            }
        }
        subgraph
    }

    fn leaf_keys(&self, leaf: &str) -> Result<Vec<String>, DagError> {
        if self.contains(leaf) {
            return Ok(vec![leaf.to_string()]);
        }
        match self.by_name.get(leaf) {
            Some(keys) if !keys.is_empty() => Ok(keys.clone()),
            _ => Err(DagError::PackageNotFound {
                name: leaf.to_string(),
            }),
        }
    }

    fn vertex(&self, key: &str) -> Result<Package, DagError> {
        self.package(key)
            .cloned()
            .ok_or_else(|| DagError::PackageNotFound {
                name: key.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    include!("transform.test.rs");
}
