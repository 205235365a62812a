//! # Repository Module
//!
//! Upstream repository plumbing used by graph construction.
//!
//! ## Modules
//!
//! - [`index`] - Repository indexes and bulk index loaders
//! - [`resolver`] - Ranked candidate resolution over loaded indexes
//! - [`keys`] - Signing key material retrieval

pub mod index;
pub mod keys;
pub mod resolver;

pub use index::{
    INDEX_FILE, IndexEntry, IndexError, IndexLoader, KeyRing, MockIndexLoader, RemoteIndexLoader,
    RepositoryIndex,
};
pub use keys::{KeyError, KeyFetcher};
pub use resolver::{Candidate, PackageResolver, ResolveError, compare_versions};
