//! Key material retrieval for repository signing keys
//!
//! Keys are identified either by a local path (bare or `file://`) or by an
//! `https://` URL. A local key that does not exist is not an error: the
//! fetch yields no material and the repository is loaded without it.

use reqwest::Url;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, trace};

/// Key material retrieval errors
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("key scheme {scheme} not supported")]
    SchemeNotSupported { scheme: String },

    #[error("failed to parse key {key} as URI")]
    InvalidUri { key: String },

    #[error("failed to read key {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("unable to get key at {url}: {source}")]
    RequestFailed { url: String, source: reqwest::Error },
}

/// Fetches signing key bytes from local files or HTTPS
#[derive(Debug, Clone)]
pub struct KeyFetcher {
    timeout: Duration,
}

impl KeyFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Fetch the key behind `identifier`; `Ok(None)` for a missing local file
    pub fn fetch(&self, identifier: &str) -> Result<Option<Vec<u8>>, KeyError> {
        let url = match Url::parse(identifier) {
            Ok(url) => url,
            // relative or absolute paths without a scheme
            Err(_) => return read_local(Path::new(identifier)),
        };

        match url.scheme() {
            "https" => self.fetch_url(url.as_str()).map(Some),
            "file" => {
                let path = url.to_file_path().map_err(|()| KeyError::InvalidUri {
                    key: identifier.to_string(),
                })?;
                read_local(&path)
            }
            scheme => Err(KeyError::SchemeNotSupported {
                scheme: scheme.to_string(),
            }),
        }
    }

    fn fetch_url(&self, url: &str) -> Result<Vec<u8>, KeyError> {
        trace!("Fetching key material: {}", url);
        let request_err = |source| KeyError::RequestFailed {
            url: url.to_string(),
            source,
        };

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(request_err)?;
        let response = client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(request_err)?;
        let bytes = response.bytes().map_err(request_err)?;

        debug!("Fetched {} bytes of key material from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}

impl Default for KeyFetcher {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

fn read_local(path: &Path) -> Result<Option<Vec<u8>>, KeyError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("Key file {} does not exist, skipping", path.display());
            Ok(None)
        }
        Err(source) => Err(KeyError::ReadFailed {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    include!("keys.test.rs");
}
