//! Filesystem fixtures
//!
//! A [`DefinitionDir`] is a temporary directory holding definition files
//! and, optionally, repositories in the `<repo>/<arch>/index.json` layout.
//! Everything is removed when the fixture drops.

use super::definition_yaml;
use crate::repository::{INDEX_FILE, RepositoryIndex};
use crate::store::Definition;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary definition directory with automatic cleanup
pub struct DefinitionDir {
    temp_dir: TempDir,
}

impl DefinitionDir {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let temp_dir = tempfile::tempdir()?;
        Ok(Self { temp_dir })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `definition` to `<name>.yaml`
    pub fn write_definition(
        &self,
        definition: &Definition,
    ) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let file = format!("{}.yaml", definition.package.name);
        self.write_file(&file, &definition_yaml(definition))
    }

    /// Write raw content to a file relative to the directory root
    pub fn write_file(
        &self,
        file_path: &str,
        content: &str,
    ) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let full_path = self.path().join(file_path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&full_path, content)?;
        Ok(full_path)
    }

    /// Publish `index` as a local repository under `repo_dir`; returns the
    /// repository URI to reference from definitions
    pub fn write_repository(
        &self,
        repo_dir: &str,
        index: &RepositoryIndex,
    ) -> Result<String, Box<dyn std::error::Error>> {
        let document = serde_json::json!({ "packages": index.entries });
        let file = format!("{}/{}/{}", repo_dir, index.arch, INDEX_FILE);
        self.write_file(&file, &serde_json::to_string_pretty(&document)?)?;
        Ok(self.path().join(repo_dir).to_string_lossy().to_string())
    }
}

#[cfg(test)]
mod tests {
    include!("filesystem.test.rs");
}
