//! Repository indexes and the loaders that fetch them
//!
//! A remote repository publishes `<uri>/<arch>/index.json`:
//!
//! ```json
//! { "packages": [ { "name": "glibc", "version": "2.38-r1", "provides": ["so:libc.so.6=6"] } ] }
//! ```
//!
//! The URI may be `http(s)://`, `file://`, or a plain directory path.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, trace};

/// Index file name under `<uri>/<arch>/`
pub const INDEX_FILE: &str = "index.json";

/// Key identifier to key bytes, as handed to an [`IndexLoader`]
pub type KeyRing = BTreeMap<String, Vec<u8>>;

/// Repository index loading errors
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("HTTP request for {url} failed: {source}")]
    RequestFailed {
        url: String,
        source: reqwest::Error,
    },

    #[error("Failed to build HTTP client: {source}")]
    ClientFailed { source: reqwest::Error },

    #[error("Failed to read index {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse index {location}: {source}")]
    ParseFailed {
        location: String,
        source: serde_json::Error,
    },

    #[error("Repository not available: {uri}")]
    NotAvailable { uri: String },
}

/// One package listed in a repository index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub provides: Vec<String>,
}

/// A loaded repository index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepositoryIndex {
    /// Repository URI; also the source of every package resolved from it
    pub source: String,
    pub arch: String,
    pub entries: Vec<IndexEntry>,
    /// Identifiers of the key material that was supplied while loading
    pub signing_keys: Vec<String>,
}

impl RepositoryIndex {
    pub fn new(source: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            arch: arch.into(),
            ..Self::default()
        }
    }

    /// Add an entry (builder style)
    pub fn with_entry(mut self, name: &str, version: &str, provides: &[&str]) -> Self {
        self.entries.push(IndexEntry {
            name: name.to_string(),
            version: version.to_string(),
            provides: provides.iter().map(|p| p.to_string()).collect(),
        });
        self
    }
}

#[derive(Debug, Deserialize)]
struct IndexDocument {
    #[serde(default)]
    packages: Vec<IndexEntry>,
}

fn is_http(uri: &str) -> bool {
    uri.starts_with("https://") || uri.starts_with("http://")
}

/// Loads repository indexes in bulk
pub trait IndexLoader: Send + Sync {
    /// Load the index of every repository in `uris` for `arch`. The
    /// returned indexes carry their repository URI as `source`.
    fn load_indexes(
        &self,
        uris: &[String],
        keys: &KeyRing,
        arch: &str,
    ) -> Result<Vec<RepositoryIndex>, IndexError>;
}

/// Loader reading `index.json` over HTTP(S) or from the filesystem
#[derive(Debug, Clone)]
pub struct RemoteIndexLoader {
    timeout: Duration,
}

impl RemoteIndexLoader {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn index_location(uri: &str, arch: &str) -> String {
        format!("{}/{}/{}", uri.trim_end_matches('/'), arch, INDEX_FILE)
    }

    fn fetch(&self, client: &reqwest::blocking::Client, url: &str) -> Result<Vec<u8>, IndexError> {
        let request_err = |source| IndexError::RequestFailed {
            url: url.to_string(),
            source,
        };
        let response = client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(request_err)?;
        Ok(response.bytes().map_err(request_err)?.to_vec())
    }

    fn read(location: &str) -> Result<Vec<u8>, IndexError> {
        let path = PathBuf::from(location.strip_prefix("file://").unwrap_or(location));
        std::fs::read(&path).map_err(|source| IndexError::ReadFailed { path, source })
    }
}

impl Default for RemoteIndexLoader {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

impl IndexLoader for RemoteIndexLoader {
    fn load_indexes(
        &self,
        uris: &[String],
        keys: &KeyRing,
        arch: &str,
    ) -> Result<Vec<RepositoryIndex>, IndexError> {
        let client = if uris.iter().any(|uri| is_http(uri)) {
            Some(
                reqwest::blocking::Client::builder()
                    .timeout(self.timeout)
                    .build()
                    .map_err(|source| IndexError::ClientFailed { source })?,
            )
        } else {
            None
        };
        let mut indexes = Vec::with_capacity(uris.len());

        for uri in uris {
            let location = Self::index_location(uri, arch);
            trace!("Loading repository index: {}", location);

            let data = match &client {
                Some(client) if is_http(&location) => self.fetch(client, &location)?,
                _ => Self::read(&location)?,
            };

            let document: IndexDocument =
                serde_json::from_slice(&data).map_err(|source| IndexError::ParseFailed {
                    location: location.clone(),
                    source,
                })?;

            debug!(
                "Loaded {} packages from {} ({} keys)",
                document.packages.len(),
                uri,
                keys.len()
            );
            indexes.push(RepositoryIndex {
                source: uri.clone(),
                arch: arch.to_string(),
                entries: document.packages,
                signing_keys: keys.keys().cloned().collect(),
            });
        }

        Ok(indexes)
    }
}

/// In-memory loader for tests and offline runs; records every load call
#[derive(Debug, Default)]
pub struct MockIndexLoader {
    indexes: HashMap<String, RepositoryIndex>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl MockIndexLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `index` for its `source` URI
    pub fn with_index(mut self, index: RepositoryIndex) -> Self {
        self.indexes.insert(index.source.clone(), index);
        self
    }

    /// URI batches requested so far, in call order
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl IndexLoader for MockIndexLoader {
    fn load_indexes(
        &self,
        uris: &[String],
        keys: &KeyRing,
        arch: &str,
    ) -> Result<Vec<RepositoryIndex>, IndexError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(uris.to_vec());
        }

        uris.iter()
            .map(|uri| {
                let mut index = self
                    .indexes
                    .get(uri)
                    .cloned()
                    .ok_or_else(|| IndexError::NotAvailable { uri: uri.clone() })?;
                index.arch = arch.to_string();
                index.signing_keys = keys.keys().cloned().collect();
                Ok(index)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    include!("index.test.rs");
}
