//! Single-rotation cycle repair
//!
//! When every candidate for a dependency would close a cycle, the shortest
//! existing path back from the wanted target to the dependent is located.
//! Its last hop is removed, the wanted edge is committed in its place, and
//! the dependency that produced the removed hop is resolved again. If that
//! second resolution is also cyclic the repair is abandoned.

use super::{DagError, DependencyEdge, Graph};
use crate::repository::PackageResolver;
use tracing::debug;

/// An edge `source → target` rejected only because it would close a cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct PendingCycle {
    pub source: String,
    pub target: String,
}

impl Graph {
    pub(super) fn resolve_cycle(
        &mut self,
        pending: &PendingCycle,
        dependency: &str,
        resolver: &PackageResolver,
        local_source: &str,
    ) -> Result<(), DagError> {
        let path = self
            .shortest_path(&pending.target, &pending.source)
            .filter(|path| path.len() >= 2)
            .ok_or_else(|| {
                DagError::internal(format!(
                    "there is no path from {} to {}",
                    pending.target, pending.source
                ))
            })?;

        let culprit = path[path.len() - 2].clone();
        let removed_target = path[path.len() - 1].clone();
        let original_dependency = self
            .edge_origin(&culprit, &removed_target)
            .map(str::to_string)
            .ok_or_else(|| {
                DagError::internal(format!(
                    "edge {culprit} -> {removed_target} has no target origin"
                ))
            })?;

        debug!(
            "Rotating {} -> {} ({}) out for {} -> {}",
            culprit, removed_target, original_dependency, pending.source, pending.target
        );
        self.remove_edge(&culprit, &removed_target)?;

        let irreparable = || DagError::IrreparableCycle {
            from: pending.source.clone(),
            to: pending.target.clone(),
            path: path.clone(),
        };

        match self.add_edge(
            &pending.source,
            &pending.target,
            DependencyEdge::origin(dependency),
        ) {
            Ok(_) => {}
            // another path still links target back to source
            Err(DagError::CycleRejected { .. }) => return Err(irreparable()),
            Err(e) => return Err(e),
        }

        let culprit_pkg = self
            .package(&culprit)
            .cloned()
            .ok_or_else(|| DagError::internal(format!("vertex {culprit} disappeared")))?;

        match self.add_appropriate_package(resolver, &culprit_pkg, &original_dependency, local_source)
        {
            Ok(None) => Ok(()),
            Ok(Some(_)) => Err(irreparable()),
            Err(source) => Err(DagError::CycleRepair {
                culprit,
                dependency: original_dependency,
                source: Box::new(source),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    include!("cycle.test.rs");
}
