//! Graph construction

use super::cycle::PendingCycle;
use super::{DagError, DependencyEdge, Graph, GraphOptions};
use crate::package::{DanglingPackage, ExternalPackage, LOCAL, Package, package_key};
use crate::repository::{Candidate, KeyRing, PackageResolver, RepositoryIndex};
use crate::store::{LocalKind, LocalPackage, PackageStore};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, trace, warn};

impl Graph {
    /// Build the dependency graph over every origin package in `packages`.
    ///
    /// Packages are processed in store order. Each origin becomes a vertex,
    /// other versions of its subpackages depend on it, and each declared
    /// build-time dependency is resolved to one committed edge. Per-package
    /// failures are collected and returned together as
    /// [`DagError::Construction`]; repository, key material and internal
    /// consistency failures abort at once.
    pub fn build(packages: Arc<PackageStore>, opts: GraphOptions) -> Result<Self, DagError> {
        let mut graph = Graph::empty(packages.clone(), opts);
        let mut indexes: HashMap<String, Arc<RepositoryIndex>> = HashMap::new();
        let mut errors = Vec::new();

        let local = Arc::new(packages.local_repository(&graph.opts.arch));

        for config in packages.packages() {
            debug!("Adding package {}", config.key());
            let origin = Package::Origin(config.clone());
            let (_, added) = graph.add_vertex(origin.clone());
            if !added {
                trace!("Origin {} already present", config.key());
            }

            graph.add_subpackages(config, &origin, &mut errors);

            let lookup = graph.load_repositories(config, &mut indexes)?;
            let resolver =
                PackageResolver::new(lookup.into_iter().chain([local.clone()]).collect());
            let local_source = local.source.as_str();

            for dependency in config.dependencies() {
                if dependency.is_empty() {
                    errors.push(DagError::InvalidDependencyName {
                        package: config.name.clone(),
                    });
                    continue;
                }

                let pending = match graph.add_appropriate_package(
                    &resolver,
                    &origin,
                    dependency,
                    local_source,
                ) {
                    Ok(pending) => pending,
                    Err(e) if e.is_fatal() => return Err(e),
                    Err(e) => {
                        errors.push(e);
                        continue;
                    }
                };

                let Some(pending) = pending else { continue };
                if let Err(e) = graph.resolve_cycle(&pending, dependency, &resolver, local_source)
                {
                    if e.is_fatal() {
                        return Err(e);
                    }
                    let path = match &e {
                        DagError::IrreparableCycle { path, .. } => path.clone(),
                        _ => graph
                            .shortest_path(&pending.target, &pending.source)
                            .unwrap_or_default(),
                    };
                    error!(
                        from = %pending.source,
                        to = %pending.target,
                        path = %path.join(" -> "),
                        "unresolvable cycle"
                    );
                    errors.push(e);
                }
            }
        }

        if !errors.is_empty() {
            return Err(DagError::Construction { errors });
        }

        debug!(
            "Built graph with {} vertices and {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph)
    }

    /// Other versions of each subpackage of `config` depend on `config`
    fn add_subpackages(
        &mut self,
        config: &LocalPackage,
        origin: &Package,
        errors: &mut Vec<DagError>,
    ) {
        let origin_key = origin.key();
        for subpackage in config.subpackages() {
            for record in self.packages.config(&subpackage.name, false) {
                if record.version == config.version {
                    continue;
                }
                let sub = Package::Origin(record);
                let sub_key = sub.key();
                self.add_vertex(sub);
                if let Err(e) = self.add_edge(&sub_key, &origin_key, DependencyEdge::default()) {
                    errors.push(e);
                }
            }
        }
    }

    /// Indexes visible to `config`: its declared repositories plus the
    /// configured extras. Indexes not yet in `indexes` are loaded in one batch.
    /// The keyring is always fetched, so bad key material fails the build even
    /// when every index is already cached.
    fn load_repositories(
        &self,
        config: &LocalPackage,
        indexes: &mut HashMap<String, Arc<RepositoryIndex>>,
    ) -> Result<Vec<Arc<RepositoryIndex>>, DagError> {
        let mut repositories: Vec<&String> = Vec::new();
        for repository in config.repositories().iter().chain(&self.opts.repositories) {
            if !repositories.contains(&repository) {
                repositories.push(repository);
            }
        }

        let missing: Vec<String> = repositories
            .iter()
            .filter(|repository| !indexes.contains_key(repository.as_str()))
            .map(|repository| repository.to_string())
            .collect();

        let keys = self.key_material(config)?;
        if !missing.is_empty() {
            debug!(
                "Loading {} repositories for {}",
                missing.len(),
                config.key()
            );
            let loaded = self
                .opts
                .loader
                .load_indexes(&missing, &keys, &self.opts.arch)
                .map_err(|source| DagError::RepositoryLoad {
                    package: format!("{}-{}", config.name, config.version),
                    source,
                })?;
            for index in loaded {
                indexes.insert(index.source.clone(), Arc::new(index));
            }
        }

        Ok(repositories
            .into_iter()
            .filter_map(|repository| indexes.get(repository.as_str()).cloned())
            .collect())
    }

    fn key_material(&self, config: &LocalPackage) -> Result<KeyRing, DagError> {
        let mut keys = KeyRing::new();
        for key in config.keyring().iter().chain(&self.opts.keys) {
            if keys.contains_key(key) {
                continue;
            }
            let material = self
                .opts
                .key_fetcher
                .fetch(key)
                .map_err(|source| DagError::KeyMaterial {
                    key: key.clone(),
                    source,
                })?;
            if let Some(bytes) = material {
                keys.insert(key.clone(), bytes);
            }
        }
        Ok(keys)
    }

    /// Resolve `dependency` of `origin` to one committed edge.
    ///
    /// Candidates are taken in resolver order and the first one that does
    /// not close a cycle wins. When every usable candidate is cyclic, the
    /// first of them is handed back as a [`PendingCycle`].
    pub(super) fn add_appropriate_package(
        &mut self,
        resolver: &PackageResolver,
        origin: &Package,
        dependency: &str,
        local_source: &str,
    ) -> Result<Option<PendingCycle>, DagError> {
        let candidates = match resolver.resolve(dependency) {
            Ok(candidates) => candidates,
            Err(_) if self.opts.allow_unresolved => {
                self.add_dangling_package(origin, dependency)?;
                return Ok(None);
            }
            Err(source) => {
                return Err(DagError::UnresolvedDependency {
                    package: origin.to_string(),
                    dependency: dependency.to_string(),
                    source,
                });
            }
        };

        let origin_key = origin.key();
        let origin_idx = self.index_of(&origin_key)?;
        let mut cycle_target: Option<String> = None;

        for candidate in candidates {
            // never satisfy a dependency with the exact package being built
            if candidate.name == origin.name() && candidate.version == origin.version() {
                trace!("Skipping self candidate {} for {}", candidate.name, origin_key);
                continue;
            }

            let pkg = if candidate.repository == local_source {
                self.local_candidate(&candidate)?
            } else {
                Package::External(ExternalPackage {
                    name: candidate.name,
                    version: candidate.version,
                    repository: candidate.repository,
                })
            };
            let target_key = pkg.key();
            if target_key == origin_key {
                trace!("{} provides its own dependency {}", origin_key, dependency);
                continue;
            }

            let (target_idx, _) = self.add_vertex(pkg);
            match self.connect(origin_idx, target_idx, DependencyEdge::origin(dependency)) {
                Ok(_) => {
                    trace!("{} -> {} ({})", origin_key, target_key, dependency);
                    return Ok(None);
                }
                Err(DagError::CycleRejected { .. }) => {
                    debug!(
                        "Candidate {} for {} of {} would create a cycle",
                        target_key, dependency, origin_key
                    );
                    cycle_target.get_or_insert(target_key);
                }
                Err(e) => return Err(e),
            }
        }

        if let Some(target) = cycle_target {
            return Ok(Some(PendingCycle {
                source: origin_key,
                target,
            }));
        }
        if !self.opts.allow_unresolved {
            return Err(DagError::UnfulfilledDependency {
                package: origin.to_string(),
                dependency: dependency.to_string(),
            });
        }
        self.add_dangling_package(origin, dependency)?;
        Ok(None)
    }

    /// Local record named by a candidate from the local repository.
    /// Subpackages are built by their origin, so the origin is returned.
    fn local_candidate(&self, candidate: &Candidate) -> Result<Package, DagError> {
        let key = package_key(&candidate.name, &candidate.version, LOCAL);
        let record = self.packages.config_by_key(&key).ok_or_else(|| {
            DagError::internal(format!(
                "unable to find package {}-{} in local repository",
                candidate.name, candidate.version
            ))
        })?;

        if record.kind == LocalKind::Origin {
            return Ok(Package::Origin(record));
        }
        self.packages
            .config_by_key(&record.origin_key())
            .map(Package::Origin)
            .ok_or_else(|| {
                DagError::internal(format!("origin of subpackage {key} is not in the store"))
            })
    }

    fn add_dangling_package(&mut self, origin: &Package, dependency: &str) -> Result<(), DagError> {
        warn!(
            "{}: recording unresolved dependency {}",
            origin.key(),
            dependency
        );
        let (target_idx, _) = self.add_vertex(Package::Dangling(DanglingPackage {
            name: dependency.to_string(),
        }));
        let origin_idx = self.index_of(&origin.key())?;
        self.connect(origin_idx, target_idx, DependencyEdge::origin(dependency))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    include!("build.test.rs");
}
