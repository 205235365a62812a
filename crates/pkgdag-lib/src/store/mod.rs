//! Package-definition store
//!
//! Holds the build definitions that make up one resolution run and answers
//! lookups by name, provide, and vertex key. Definitions are YAML documents
//! with a `package` header, optional `subpackages`, and an `environment`
//! listing the repositories, keyring entries and build-time packages.

use crate::package::{LOCAL, package_key, split_dependency};
use crate::repository::{IndexEntry, RepositoryIndex};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, trace};

/// Errors raised while loading or querying definitions
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse YAML: {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_saphyr::Error,
    },

    #[error("Invalid definition for '{package}': {reason}")]
    Invalid { package: String, reason: String },

    #[error("Duplicate package definition {key}")]
    Duplicate { key: String },

    #[error("Unable to find package {name}")]
    PackageNotFound { name: String },
}

/// A build definition as written on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    pub package: PackageInfo,
    #[serde(default)]
    pub subpackages: Vec<Subpackage>,
    #[serde(default)]
    pub environment: Environment,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PackageInfo {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub epoch: u64,
    #[serde(default)]
    pub dependencies: PackageDependencies,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PackageDependencies {
    /// Virtual names satisfied by this package, `name` or `name=version`
    #[serde(default)]
    pub provides: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subpackage {
    pub name: String,
    #[serde(default)]
    pub dependencies: PackageDependencies,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Environment {
    #[serde(default)]
    pub contents: Contents,
}

/// Build environment contents
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Contents {
    #[serde(default)]
    pub repositories: Vec<String>,
    #[serde(default)]
    pub keyring: Vec<String>,
    /// Build-time dependency names
    #[serde(default)]
    pub packages: Vec<String>,
}

impl Definition {
    pub fn new(name: impl Into<String>, version: impl Into<String>, epoch: u64) -> Self {
        Self {
            package: PackageInfo {
                name: name.into(),
                version: version.into(),
                epoch,
                dependencies: PackageDependencies::default(),
            },
            subpackages: Vec::new(),
            environment: Environment::default(),
        }
    }

    /// `<version>-r<epoch>`
    pub fn full_version(&self) -> String {
        format!("{}-r{}", self.package.version, self.package.epoch)
    }

    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.environment
            .contents
            .packages
            .extend(deps.into_iter().map(Into::into));
        self
    }

    pub fn with_subpackages<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subpackages
            .extend(names.into_iter().map(|name| Subpackage {
                name: name.into(),
                dependencies: PackageDependencies::default(),
            }));
        self
    }

    pub fn with_provides<I, S>(mut self, provides: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.package
            .dependencies
            .provides
            .extend(provides.into_iter().map(Into::into));
        self
    }

    pub fn with_repositories<I, S>(mut self, repositories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.environment
            .contents
            .repositories
            .extend(repositories.into_iter().map(Into::into));
        self
    }

    pub fn with_keyring<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.environment
            .contents
            .keyring
            .extend(keys.into_iter().map(Into::into));
        self
    }

    fn validate(&self) -> Result<(), StoreError> {
        let invalid = |reason: &str| StoreError::Invalid {
            package: self.package.name.clone(),
            reason: reason.to_string(),
        };
        if self.package.name.is_empty() {
            return Err(invalid("package name is empty"));
        }
        if self.package.version.is_empty() {
            return Err(invalid("package version is empty"));
        }
        if self.subpackages.iter().any(|sub| sub.name.is_empty()) {
            return Err(invalid("subpackage name is empty"));
        }
        Ok(())
    }
}

/// Whether a local record is an origin package or a subpackage of one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalKind {
    Origin,
    Subpackage,
}

/// One buildable record: an origin package or one of its subpackages.
/// Subpackages share the origin's full version and definition.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalPackage {
    pub name: String,
    /// Full version, `<version>-r<epoch>`
    pub version: String,
    pub kind: LocalKind,
    pub provides: Vec<String>,
    pub definition: Arc<Definition>,
}

impl LocalPackage {
    pub fn key(&self) -> String {
        package_key(&self.name, &self.version, LOCAL)
    }

    /// Key of the origin package this record is built by
    pub fn origin_key(&self) -> String {
        package_key(&self.definition.package.name, &self.version, LOCAL)
    }

    pub fn subpackages(&self) -> &[Subpackage] {
        &self.definition.subpackages
    }

    pub fn repositories(&self) -> &[String] {
        &self.definition.environment.contents.repositories
    }

    pub fn keyring(&self) -> &[String] {
        &self.definition.environment.contents.keyring
    }

    /// Declared build-time dependency names
    pub fn dependencies(&self) -> &[String] {
        &self.definition.environment.contents.packages
    }
}

/// In-memory collection of local package definitions
#[derive(Debug, Clone, Default)]
pub struct PackageStore {
    origins: Vec<Arc<LocalPackage>>,
    records: Vec<Arc<LocalPackage>>,
    by_key: HashMap<String, Arc<LocalPackage>>,
    by_name: HashMap<String, Vec<Arc<LocalPackage>>>,
    by_provide: HashMap<String, Vec<Arc<LocalPackage>>>,
}

impl PackageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from definitions, keeping their order
    pub fn from_definitions<I>(definitions: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = Definition>,
    {
        let mut store = Self::new();
        for definition in definitions {
            store.insert(Arc::new(definition))?;
        }
        Ok(store)
    }

    /// Load every `*.yaml`/`*.yml` file in `dir`, in file name order
    pub fn load_dir(dir: &Path) -> Result<Self, StoreError> {
        debug!("Loading definitions from: {}", dir.display());

        let read_err = |source| StoreError::Read {
            path: dir.to_path_buf(),
            source,
        };
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(read_err)? {
            let path = entry.map_err(read_err)?.path();
            let is_yaml = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext == "yaml" || ext == "yml");
            if is_yaml && path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        let mut store = Self::new();
        for path in paths {
            trace!("Parsing definition: {}", path.display());
            let content = std::fs::read_to_string(&path).map_err(|source| StoreError::Read {
                path: path.clone(),
                source,
            })?;
            let definition: Definition =
                serde_saphyr::from_str(&content).map_err(|source| StoreError::Parse {
                    path: path.clone(),
                    source,
                })?;
            store.insert(Arc::new(definition))?;
        }

        debug!(
            "Loaded {} origin packages ({} records)",
            store.origins.len(),
            store.records.len()
        );
        Ok(store)
    }

    fn insert(&mut self, definition: Arc<Definition>) -> Result<(), StoreError> {
        definition.validate()?;
        let version = definition.full_version();

        let origin = Arc::new(LocalPackage {
            name: definition.package.name.clone(),
            version: version.clone(),
            kind: LocalKind::Origin,
            provides: definition.package.dependencies.provides.clone(),
            definition: definition.clone(),
        });
        let subpackages = definition.subpackages.iter().map(|sub| {
            Arc::new(LocalPackage {
                name: sub.name.clone(),
                version: version.clone(),
                kind: LocalKind::Subpackage,
                provides: sub.dependencies.provides.clone(),
                definition: definition.clone(),
            })
        });

        let records: Vec<_> = std::iter::once(origin.clone()).chain(subpackages).collect();
        for record in &records {
            if self.by_key.contains_key(&record.key()) {
                return Err(StoreError::Duplicate { key: record.key() });
            }
        }

        for record in records {
            self.by_key.insert(record.key(), record.clone());
            self.by_name
                .entry(record.name.clone())
                .or_default()
                .push(record.clone());
            for provide in &record.provides {
                let (name, _) = split_dependency(provide);
                self.by_provide
                    .entry(name.to_string())
                    .or_default()
                    .push(record.clone());
            }
            self.records.push(record);
        }
        self.origins.push(origin);
        Ok(())
    }

    /// Origin packages in load order
    pub fn packages(&self) -> &[Arc<LocalPackage>] {
        &self.origins
    }

    /// Every record, origins and subpackages
    pub fn records(&self) -> &[Arc<LocalPackage>] {
        &self.records
    }

    /// All records answering to `name`. With `exact`, only origin packages
    /// named `name`; otherwise subpackages and provides match too.
    pub fn config(&self, name: &str, exact: bool) -> Vec<Arc<LocalPackage>> {
        let mut found: Vec<Arc<LocalPackage>> = self
            .by_name
            .get(name)
            .into_iter()
            .flatten()
            .filter(|record| !exact || record.kind == LocalKind::Origin)
            .cloned()
            .collect();

        if !exact {
            for record in self.by_provide.get(name).into_iter().flatten() {
                if !found.iter().any(|f| Arc::ptr_eq(f, record)) {
                    found.push(record.clone());
                }
            }
        }
        found
    }

    pub fn config_by_key(&self, key: &str) -> Option<Arc<LocalPackage>> {
        self.by_key.get(key).cloned()
    }

    /// Subset holding `names` and, transitively, every local package their
    /// build-time dependencies resolve to
    pub fn sub<S: AsRef<str>>(&self, names: &[S]) -> Result<PackageStore, StoreError> {
        let mut queue = VecDeque::new();
        for name in names {
            let found = self.config(name.as_ref(), false);
            if found.is_empty() {
                return Err(StoreError::PackageNotFound {
                    name: name.as_ref().to_string(),
                });
            }
            queue.extend(found);
        }

        let mut selected = HashSet::new();
        while let Some(record) = queue.pop_front() {
            let origin_key = record.origin_key();
            if !selected.insert(origin_key) {
                continue;
            }
            for dep in record.dependencies() {
                let (dep_name, _) = split_dependency(dep);
                queue.extend(self.config(dep_name, false));
            }
        }

        self.select(|origin| selected.contains(&origin.key()))
    }

    /// Subset holding exactly the origin packages behind `names`; unknown
    /// names are ignored
    pub fn subset<S: AsRef<str>>(&self, names: &[S]) -> Result<PackageStore, StoreError> {
        let wanted: HashSet<String> = names
            .iter()
            .flat_map(|name| self.config(name.as_ref(), true))
            .map(|record| record.origin_key())
            .collect();
        self.select(|origin| wanted.contains(&origin.key()))
    }

    /// Subset holding exactly the origin packages whose keys are `keys`
    pub fn subset_by_keys<S: AsRef<str>>(&self, keys: &[S]) -> Result<PackageStore, StoreError> {
        let wanted: HashSet<&str> = keys.iter().map(|key| key.as_ref()).collect();
        self.select(|origin| wanted.contains(origin.key().as_str()))
    }

    fn select<F>(&self, keep: F) -> Result<PackageStore, StoreError>
    where
        F: Fn(&LocalPackage) -> bool,
    {
        let mut store = Self::new();
        for origin in self.origins.iter().filter(|origin| keep(origin)) {
            store.insert(origin.definition.clone())?;
        }
        Ok(store)
    }

    /// Origin package names, sorted and deduplicated
    pub fn package_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.origins.iter().map(|o| o.name.clone()).collect();
        names.sort();
        names.dedup();
        names
    }

    /// Repository view over every local record, with [`LOCAL`] as its source
    pub fn local_repository(&self, arch: &str) -> RepositoryIndex {
        RepositoryIndex {
            source: LOCAL.to_string(),
            arch: arch.to_string(),
            entries: self
                .records
                .iter()
                .map(|record| IndexEntry {
                    name: record.name.clone(),
                    version: record.version.clone(),
                    provides: record.provides.clone(),
                })
                .collect(),
            signing_keys: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.origins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }
}

#[cfg(test)]
mod tests {
    include!("mod.test.rs");
}
