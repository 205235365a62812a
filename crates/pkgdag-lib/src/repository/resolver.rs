//! Package resolution against a set of repository indexes
//!
//! Candidates are ordered highest version first. The sort is stable, so
//! equal versions keep the order of the indexes the resolver was built
//! with, then the order of entries within an index. Resolution is
//! therefore deterministic for a given index list.

use super::RepositoryIndex;
use crate::package::split_dependency;
use std::cmp::Ordering;
use std::sync::Arc;
use thiserror::Error;

/// Resolution errors
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no candidates for '{dependency}'")]
    NoCandidates { dependency: String },

    #[error("invalid dependency name '{dependency}'")]
    InvalidName { dependency: String },
}

/// A package that can satisfy a dependency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub version: String,
    /// Source of the index the candidate was found in
    pub repository: String,
}

/// Resolver over an ordered set of indexes
#[derive(Debug, Clone, Default)]
pub struct PackageResolver {
    indexes: Vec<Arc<RepositoryIndex>>,
}

impl PackageResolver {
    pub fn new(indexes: Vec<Arc<RepositoryIndex>>) -> Self {
        Self { indexes }
    }

    pub fn indexes(&self) -> &[Arc<RepositoryIndex>] {
        &self.indexes
    }

    /// Resolve `dependency` (`name` or `name=version`) to every matching
    /// package, highest version first. A package matches by name or by a
    /// `provides` entry; a version pin applies to the package version.
    pub fn resolve(&self, dependency: &str) -> Result<Vec<Candidate>, ResolveError> {
        let (name, pin) = split_dependency(dependency);
        if name.is_empty() {
            return Err(ResolveError::InvalidName {
                dependency: dependency.to_string(),
            });
        }

        let mut candidates: Vec<Candidate> = self
            .indexes
            .iter()
            .flat_map(|index| {
                index
                    .entries
                    .iter()
                    .filter(move |entry| {
                        entry.name == name
                            || entry
                                .provides
                                .iter()
                                .any(|provide| split_dependency(provide).0 == name)
                    })
                    .filter(move |entry| pin.is_none_or(|version| entry.version == version))
                    .map(move |entry| Candidate {
                        name: entry.name.clone(),
                        version: entry.version.clone(),
                        repository: index.source.clone(),
                    })
            })
            .collect();

        if candidates.is_empty() {
            return Err(ResolveError::NoCandidates {
                dependency: dependency.to_string(),
            });
        }

        candidates.sort_by(|a, b| compare_versions(&b.version, &a.version));
        Ok(candidates)
    }
}

/// Suffix tags that mark a version as older than its plain release
const PRE_RELEASE: &[&str] = &["alpha", "beta", "pre", "rc"];

/// Compare `<version>-r<epoch>` strings: the version part segment by
/// segment (numeric runs numerically, other runs lexically), then the epoch.
/// `1.0_rc1` sorts below `1.0`, while `1.0_p1` and `1.0.1` sort above it.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let (a_version, a_epoch) = split_epoch(a);
    let (b_version, b_epoch) = split_epoch(b);

    let mut a_segments = segments(a_version);
    let mut b_segments = segments(b_version);
    loop {
        match (a_segments.next(), b_segments.next()) {
            (None, None) => break,
            (Some(x), None) => return trailing(x),
            (None, Some(y)) => return trailing(y).reverse(),
            (Some(x), Some(y)) => {
                let ordering = compare_segment(x, y);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
    }
    a_epoch.cmp(&b_epoch)
}

fn split_epoch(version: &str) -> (&str, u64) {
    match version.rsplit_once("-r") {
        Some((base, epoch)) => match epoch.parse() {
            Ok(epoch) => (base, epoch),
            Err(_) => (version, 0),
        },
        None => (version, 0),
    }
}

/// Runs of digits or of letters; separators are dropped
fn segments(version: &str) -> impl Iterator<Item = &str> {
    let mut rest = version;
    std::iter::from_fn(move || {
        rest = rest.trim_start_matches(|c: char| !c.is_ascii_alphanumeric());
        let first = rest.chars().next()?;
        let end = if first.is_ascii_digit() {
            rest.find(|c: char| !c.is_ascii_digit())
        } else {
            rest.find(|c: char| !c.is_ascii_alphabetic())
        }
        .unwrap_or(rest.len());
        let (segment, tail) = rest.split_at(end);
        rest = tail;
        Some(segment)
    })
}

fn is_pre_release(segment: &str) -> bool {
    PRE_RELEASE.contains(&segment)
}

/// Ordering of a version that still has `segment` left against one that
/// ran out of segments
fn trailing(segment: &str) -> Ordering {
    if is_pre_release(segment) {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}

fn compare_segment(a: &str, b: &str) -> Ordering {
    let a_numeric = a.bytes().all(|c| c.is_ascii_digit());
    let b_numeric = b.bytes().all(|c| c.is_ascii_digit());
    match (a_numeric, b_numeric) {
        (true, true) => {
            let a = a.trim_start_matches('0');
            let b = b.trim_start_matches('0');
            a.len().cmp(&b.len()).then_with(|| a.cmp(b))
        }
        // a release number outranks a suffix such as "rc" or "beta"
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => is_pre_release(b)
            .cmp(&is_pre_release(a))
            .then_with(|| a.cmp(b)),
    }
}

#[cfg(test)]
mod tests {
    include!("resolver.test.rs");
}
