//! Package model
//!
//! Every vertex in the dependency graph is a [`Package`]: a locally built
//! record, a package supplied by an upstream repository index, or a
//! placeholder for a dependency that could not be resolved.

use crate::store::LocalPackage;
use std::fmt;
use std::sync::Arc;

/// Source identifier of the synthetic repository built from local definitions
pub const LOCAL: &str = "local";

/// Build the vertex key for a `(name, version, source)` triple
pub fn package_key(name: &str, version: &str, source: &str) -> String {
    format!("{name}:{version}@{source}")
}

/// Split a dependency or provide of the form `name=version` into its parts;
/// bare names carry no version pin
pub fn split_dependency(dep: &str) -> (&str, Option<&str>) {
    match dep.split_once('=') {
        Some((name, version)) => (name, Some(version)),
        None => (dep, None),
    }
}

/// A package supplied by an upstream repository index
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExternalPackage {
    pub name: String,
    pub version: String,
    /// URI of the repository that supplied the package
    pub repository: String,
}

/// Placeholder for a dependency that was declared but could not be resolved
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DanglingPackage {
    pub name: String,
}

/// A vertex in the dependency graph
#[derive(Debug, Clone)]
pub enum Package {
    /// Built from a local definition (origin package or one of its subpackages)
    Origin(Arc<LocalPackage>),
    External(ExternalPackage),
    Dangling(DanglingPackage),
}

impl Package {
    pub fn name(&self) -> &str {
        match self {
            Package::Origin(local) => &local.name,
            Package::External(external) => &external.name,
            Package::Dangling(dangling) => &dangling.name,
        }
    }

    /// Full version string; empty for dangling packages
    pub fn version(&self) -> &str {
        match self {
            Package::Origin(local) => &local.version,
            Package::External(external) => &external.version,
            Package::Dangling(_) => "",
        }
    }

    /// [`LOCAL`] for origin packages, the repository URI for external
    /// packages, empty for dangling packages
    pub fn source(&self) -> &str {
        match self {
            Package::Origin(_) => LOCAL,
            Package::External(external) => &external.repository,
            Package::Dangling(_) => "",
        }
    }

    /// Vertex key; identical `(name, version, source)` means identical vertex
    pub fn key(&self) -> String {
        package_key(self.name(), self.version(), self.source())
    }

    /// The local record backing this package, if it has one
    pub fn local(&self) -> Option<&Arc<LocalPackage>> {
        match self {
            Package::Origin(local) => Some(local),
            _ => None,
        }
    }

    pub fn is_dangling(&self) -> bool {
        matches!(self, Package::Dangling(_))
    }
}

impl PartialEq for Package {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
            && self.version() == other.version()
            && self.source() == other.source()
    }
}

impl Eq for Package {}

impl From<ExternalPackage> for Package {
    fn from(external: ExternalPackage) -> Self {
        Package::External(external)
    }
}

impl From<DanglingPackage> for Package {
    fn from(dangling: DanglingPackage) -> Self {
        Package::Dangling(dangling)
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Package::Origin(local) => write!(f, "{}-{}", local.name, local.version),
            Package::External(external) => write!(
                f,
                "{}-{} ({})",
                external.name, external.version, external.repository
            ),
            Package::Dangling(dangling) => write!(f, "{} (unresolved)", dangling.name),
        }
    }
}

#[cfg(test)]
mod tests {
    include!("mod.test.rs");
}
