//! # pkgdag Library
//!
//! Dependency graph construction over package build definitions.
//!
//! ## Core Modules
//!
//! - [`package`] - Graph vertex model (local, external, dangling packages)
//! - [`store`] - Package-definition store loaded from YAML files
//! - [`repository`] - Repository indexes, candidate resolution, key material
//! - [`dag`] - Graph construction, cycle repair, queries and transforms
//! - [`primitives`] - Logging types and configuration errors
//! - [`logger`] - Structured logging setup
//! - [`application`] - CLI interface and configuration management
//!
//! ## Quick Start
//!
//! ```no_run
//! use pkgdag_lib::{Graph, GraphOptions, PackageStore};
//! use std::sync::Arc;
//!
//! let store = PackageStore::load_dir(std::path::Path::new("packages")).unwrap();
//! let graph = Graph::build(Arc::new(store), GraphOptions::default()).unwrap();
//! for pkg in graph.reverse_sorted().unwrap() {
//!     println!("{}", pkg.key());
//! }
//! ```

pub mod application;
pub mod dag;
pub mod logger;
pub mod package;
pub mod primitives;
pub mod repository;
pub mod store;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export commonly used types for convenience
pub use application::{AppConfig, Cli, Commands, execute_command};
pub use dag::{DagError, DependencyEdge, Graph, GraphOptions};
pub use logger::Logger;
pub use package::{LOCAL, Package};
pub use primitives::{ConfigError, LogFormat, LogLevel, LogOutput, LoggerError};
pub use repository::{IndexLoader, KeyFetcher, PackageResolver, RepositoryIndex};
pub use store::{Definition, PackageStore};

// Private imports for the main function
use anyhow::Result;
use application::CliConfig;

pub fn main() -> Result<()> {
    // Load CLI configuration
    let config = CliConfig::load()?;

    // Execute the command
    execute_command(config)
}
