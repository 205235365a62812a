//! Package dependency DAG
//!
//! This module builds a directed acyclic graph over a set of local package
//! definitions and the upstream repositories they reference. An edge
//! `A → B` means "A depends on B": B has to be available before A builds.
//!
//! Construction resolves each declared dependency against ranked
//! candidates, probes every proposed edge for cycles before committing it,
//! and repairs a rejected edge with a single rotation (see [`cycle`]). The
//! finished graph is read-only; subgraph and filter operations return new
//! graphs.

mod build;
mod cycle;
mod query;
mod transform;

pub use transform::{Filter, filter_local, filter_not_local, filter_not_sources, filter_sources};

use crate::package::Package;
use crate::repository::{
    IndexError, IndexLoader, KeyError, KeyFetcher, RemoteIndexLoader, ResolveError,
};
use crate::store::{PackageStore, StoreError};
use petgraph::algo::{astar, has_path_connecting};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::trace;

/// Architecture used when none is configured
pub const DEFAULT_ARCH: &str = "x86_64";

/// Errors raised while building or querying a graph
#[derive(Debug, Error)]
pub enum DagError {
    #[error("empty package name in environment packages for {package}")]
    InvalidDependencyName { package: String },

    #[error("unable to load repositories for {package}: {source}")]
    RepositoryLoad { package: String, source: IndexError },

    #[error("failed to get key material for {key}: {source}")]
    KeyMaterial { key: String, source: KeyError },

    #[error("{package}: unable to resolve dependency {dependency}: {source}")]
    UnresolvedDependency {
        package: String,
        dependency: String,
        source: ResolveError,
    },

    #[error("{package}: unfulfilled dependency {dependency}")]
    UnfulfilledDependency { package: String, dependency: String },

    #[error("unresolvable cycle: {from} -> {to}, caused by: {}", .path.join(" -> "))]
    IrreparableCycle {
        from: String,
        to: String,
        /// Shortest path from `to` back to `from` at the time of the repair
        path: Vec<String>,
    },

    #[error("unable to re-add dependency {dependency} of {culprit}: {source}")]
    CycleRepair {
        culprit: String,
        dependency: String,
        source: Box<DagError>,
    },

    #[error("edge {from} -> {to} would create a cycle")]
    CycleRejected { from: String, to: String },

    #[error("internal consistency error: {message}")]
    InternalConsistency { message: String },

    #[error("graph is not acyclic: cycle through {key}")]
    NotAcyclic { key: String },

    #[error("unable to find package {name}")]
    PackageNotFound { name: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("unable to build graph:\n{}", join_errors(.errors))]
    Construction { errors: Vec<DagError> },
}

impl DagError {
    /// Errors that abort construction immediately instead of being collected
    pub fn is_fatal(&self) -> bool {
        match self {
            DagError::RepositoryLoad { .. }
            | DagError::KeyMaterial { .. }
            | DagError::InternalConsistency { .. } => true,
            DagError::CycleRepair { source, .. } => source.is_fatal(),
            _ => false,
        }
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        DagError::InternalConsistency {
            message: message.into(),
        }
    }
}

fn join_errors(errors: &[DagError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Attributes carried by a dependency edge
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyEdge {
    /// Dependency name that produced the edge; subpackage edges have none
    pub target_origin: Option<String>,
}

impl DependencyEdge {
    pub fn origin(dependency: &str) -> Self {
        Self {
            target_origin: Some(dependency.to_string()),
        }
    }
}

/// Options applied to every package during construction
#[derive(Clone)]
pub struct GraphOptions {
    /// Repositories added to every package's declared repositories
    pub repositories: Vec<String>,
    /// Keyring entries added to every package's declared keyring
    pub keys: Vec<String>,
    /// Record unresolvable dependencies as dangling vertices instead of failing
    pub allow_unresolved: bool,
    pub arch: String,
    loader: Arc<dyn IndexLoader>,
    key_fetcher: KeyFetcher,
}

impl GraphOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repositories<I, S>(mut self, repositories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.repositories
            .extend(repositories.into_iter().map(Into::into));
        self
    }

    pub fn with_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn allow_unresolved(mut self, allow: bool) -> Self {
        self.allow_unresolved = allow;
        self
    }

    pub fn with_arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = arch.into();
        self
    }

    pub fn with_index_loader(mut self, loader: Arc<dyn IndexLoader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn with_key_fetcher(mut self, key_fetcher: KeyFetcher) -> Self {
        self.key_fetcher = key_fetcher;
        self
    }
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            repositories: Vec::new(),
            keys: Vec::new(),
            allow_unresolved: false,
            arch: DEFAULT_ARCH.to_string(),
            loader: Arc::new(RemoteIndexLoader::default()),
            key_fetcher: KeyFetcher::default(),
        }
    }
}

impl fmt::Debug for GraphOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphOptions")
            .field("repositories", &self.repositories)
            .field("keys", &self.keys)
            .field("allow_unresolved", &self.allow_unresolved)
            .field("arch", &self.arch)
            .finish_non_exhaustive()
    }
}

/// Dependency graph over local and upstream packages
#[derive(Debug, Clone)]
pub struct Graph {
    /// Directed graph: nodes = packages, edges = "depends on"
    graph: DiGraph<Package, DependencyEdge>,
    /// Vertex key to node index
    node_map: HashMap<String, NodeIndex>,
    /// Package name to every vertex key sharing it
    by_name: HashMap<String, Vec<String>>,
    packages: Arc<PackageStore>,
    opts: GraphOptions,
}

impl Graph {
    fn empty(packages: Arc<PackageStore>, opts: GraphOptions) -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
            by_name: HashMap::new(),
            packages,
            opts,
        }
    }

    /// Add a vertex (idempotent); returns its index and whether it was new
    fn add_vertex(&mut self, pkg: Package) -> (NodeIndex, bool) {
        let key = pkg.key();
        if let Some(&idx) = self.node_map.get(&key) {
            trace!("Vertex already exists: {}", key);
            return (idx, false);
        }

        self.by_name
            .entry(pkg.name().to_string())
            .or_default()
            .push(key.clone());
        let idx = self.graph.add_node(pkg);
        self.node_map.insert(key, idx);
        (idx, true)
    }

    fn index_of(&self, key: &str) -> Result<NodeIndex, DagError> {
        self.node_map
            .get(key)
            .copied()
            .ok_or_else(|| DagError::internal(format!("vertex {key} is not in the graph")))
    }

    /// Whether committing `from → to` would close a cycle
    fn creates_cycle(&self, from: NodeIndex, to: NodeIndex) -> bool {
        from == to || has_path_connecting(&self.graph, to, from, None)
    }

    /// Commit `from → to` unless it would create a cycle. An existing edge
    /// is kept with its original attributes; returns whether an edge was added.
    fn connect(
        &mut self,
        from: NodeIndex,
        to: NodeIndex,
        edge: DependencyEdge,
    ) -> Result<bool, DagError> {
        if self.graph.find_edge(from, to).is_some() {
            return Ok(false);
        }
        if self.creates_cycle(from, to) {
            return Err(DagError::CycleRejected {
                from: self.graph[from].key(),
                to: self.graph[to].key(),
            });
        }
        self.graph.add_edge(from, to, edge);
        Ok(true)
    }

    fn add_edge(&mut self, from: &str, to: &str, edge: DependencyEdge) -> Result<bool, DagError> {
        let from = self.index_of(from)?;
        let to = self.index_of(to)?;
        self.connect(from, to, edge)
    }

    fn remove_edge(&mut self, from: &str, to: &str) -> Result<DependencyEdge, DagError> {
        let from_idx = self.index_of(from)?;
        let to_idx = self.index_of(to)?;
        self.graph
            .find_edge(from_idx, to_idx)
            .and_then(|edge| self.graph.remove_edge(edge))
            .ok_or_else(|| DagError::internal(format!("no edge {from} -> {to} to remove")))
    }

    /// Shortest directed path from `from` to `to` as vertex keys, both ends included
    pub fn shortest_path(&self, from: &str, to: &str) -> Option<Vec<String>> {
        let start = *self.node_map.get(from)?;
        let goal = *self.node_map.get(to)?;
        let (_, path) = astar(&self.graph, start, |n| n == goal, |_| 1usize, |_| 0)?;
        Some(path.into_iter().map(|idx| self.graph[idx].key()).collect())
    }

    /// Vertex stored under `key`
    pub fn package(&self, key: &str) -> Option<&Package> {
        self.node_map.get(key).map(|&idx| &self.graph[idx])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.node_map.contains_key(key)
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.edge(from, to).is_some()
    }

    /// Attributes of the edge `from → to`
    pub fn edge(&self, from: &str, to: &str) -> Option<&DependencyEdge> {
        let from = *self.node_map.get(from)?;
        let to = *self.node_map.get(to)?;
        self.graph
            .find_edge(from, to)
            .map(|edge| &self.graph[edge])
    }

    /// Dependency name recorded on the edge `from → to`
    pub fn edge_origin(&self, from: &str, to: &str) -> Option<&str> {
        self.edge(from, to)?.target_origin.as_deref()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Definition store this graph was built from
    pub fn store(&self) -> &PackageStore {
        &self.packages
    }

    pub fn options(&self) -> &GraphOptions {
        &self.opts
    }
}

#[cfg(test)]
mod tests {
    include!("mod.test.rs");
}
