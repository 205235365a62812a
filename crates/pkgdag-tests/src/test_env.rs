//! Hermetic test environment for E2E testing
//!
//! A [`TestEnvironment`] owns a temporary definition directory plus the
//! configuration the CLI would build for it, so tests drive the same
//! `load_graph` and command paths as the binary without touching the
//! real working directory.

use anyhow::{Context, Result, anyhow};
use pkgdag_lib::application::{AppConfig, Commands, execute_command_with_writer, load_graph};
use pkgdag_lib::dag::Graph;
use pkgdag_lib::repository::RepositoryIndex;
use pkgdag_lib::store::Definition;
use pkgdag_lib::testing::DefinitionDir;
use std::path::Path;

/// Hermetic definition directory with its CLI configuration
pub struct TestEnvironment {
    dir: DefinitionDir,
    config: AppConfig,
}

impl TestEnvironment {
    /// Create an empty environment
    pub fn new() -> Result<Self> {
        let dir = DefinitionDir::new().map_err(fixture_error)?;
        let mut config = AppConfig {
            workdir: Some(dir.path().to_path_buf()),
            ..AppConfig::default()
        };
        config.validate()?;
        Ok(Self { dir, config })
    }

    /// Create an environment holding `definitions`
    pub fn with_definitions(definitions: Vec<Definition>) -> Result<Self> {
        let env = Self::new()?;
        for definition in &definitions {
            env.write_definition(definition)?;
        }
        Ok(env)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut AppConfig {
        &mut self.config
    }

    pub fn write_definition(&self, definition: &Definition) -> Result<()> {
        self.dir
            .write_definition(definition)
            .map_err(fixture_error)
            .with_context(|| format!("Failed to write {}", definition.package.name))?;
        Ok(())
    }

    /// Write a raw file, e.g. a malformed definition
    pub fn write_file(&self, file_path: &str, content: &str) -> Result<()> {
        self.dir
            .write_file(file_path, content)
            .map_err(fixture_error)?;
        Ok(())
    }

    /// Publish `index` as an on-disk repository; returns its URI
    pub fn write_repository(&self, repo_dir: &str, index: &RepositoryIndex) -> Result<String> {
        self.dir
            .write_repository(repo_dir, index)
            .map_err(fixture_error)
    }

    /// Build the graph the way the CLI does
    pub fn graph(&self) -> Result<Graph> {
        load_graph(&self.config)
    }

    /// Build the graph and run `command`; returns the printed lines
    pub fn run(&self, command: Commands) -> Result<Vec<String>> {
        let graph = self.graph()?;
        let mut out = Vec::new();
        execute_command_with_writer(command, &graph, &mut out)?;

        let text = String::from_utf8(out).context("Command output is not UTF-8")?;
        Ok(text.lines().map(str::to_string).collect())
    }
}

fn fixture_error(err: Box<dyn std::error::Error>) -> anyhow::Error {
    anyhow!("fixture setup failed: {err}")
}
