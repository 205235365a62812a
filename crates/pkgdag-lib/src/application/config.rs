//! Application configuration management
//!
//! Handles config loading, validation, and environment variable processing
//! following the precedence: defaults -> .env -> env vars -> CLI args.

use super::env::EnvironmentConfig;
use crate::dag::{DEFAULT_ARCH, GraphOptions};
use crate::primitives::*;
use crate::repository::{KeyFetcher, RemoteIndexLoader};
use clap::Parser;
use serde::Deserialize;
use std::collections::HashSet;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Default configuration values
pub mod defaults {
    use crate::primitives::{LogFormat, LogOutput};

    pub const LOG_LEVEL: u8 = 0; // Error-only logging by default
    pub const LOG_FORMAT: LogFormat = LogFormat::Text;
    pub const LOG_OUTPUT: LogOutput = LogOutput::Stderr;
    pub const NET_TIMEOUT: u64 = 30;
    pub const ARCH: &str = crate::dag::DEFAULT_ARCH;
}

/// Default value functions for configuration fields
mod default_fns {
    use super::defaults;
    use crate::primitives::{LogFormat, LogOutput};

    pub fn log_level() -> u8 {
        defaults::LOG_LEVEL
    }

    pub fn log_format() -> LogFormat {
        defaults::LOG_FORMAT
    }

    pub fn log_output() -> LogOutput {
        defaults::LOG_OUTPUT
    }

    pub fn net_timeout() -> u64 {
        defaults::NET_TIMEOUT
    }

    pub fn arch() -> String {
        defaults::ARCH.to_string()
    }
}

/// Application configuration structure
#[derive(Debug, Clone, Parser, Deserialize)]
pub struct AppConfig {
    /// Directory holding the package definition files
    #[arg(short, long, global = true, visible_alias = "dir", env = "PKGDAG_WORKDIR")]
    #[serde(default)]
    pub workdir: Option<PathBuf>,

    /// Target architecture used to locate repository indexes
    #[arg(short, long, global = true, env = "PKGDAG_ARCH", default_value = defaults::ARCH)]
    #[serde(default = "default_fns::arch")]
    pub arch: String,

    /// Extra repository applied to every package (repeatable)
    #[arg(
        short,
        long = "repository",
        global = true,
        env = "PKGDAG_REPOSITORIES",
        value_delimiter = ','
    )]
    #[serde(default)]
    pub repositories: Vec<String>,

    /// Extra keyring entry applied to every package (repeatable)
    #[arg(
        short,
        long = "keyring",
        global = true,
        env = "PKGDAG_KEYRINGS",
        value_delimiter = ','
    )]
    #[serde(default)]
    pub keyrings: Vec<String>,

    /// Record unresolvable dependencies as dangling packages instead of failing
    #[arg(long, global = true, env = "PKGDAG_ALLOW_UNRESOLVED")]
    #[serde(default)]
    pub allow_unresolved: bool,

    /// Network timeout in seconds for index and key downloads
    #[arg(long, global = true, env = "PKGDAG_NET_TIMEOUT", default_value_t = defaults::NET_TIMEOUT)]
    #[serde(default = "default_fns::net_timeout")]
    pub net_timeout: u64,

    /// Verbosity level (0=error, 1=warn, 2=info, 3=debug, 4=trace)
    #[arg(long, global = true, env = "PKGDAG_LOG_LEVEL", default_value_t = defaults::LOG_LEVEL)]
    #[serde(default = "default_fns::log_level")]
    pub log_level: u8,

    /// Output format (text, json, yaml)
    #[arg(
        long,
        global = true,
        env = "PKGDAG_LOG_FORMAT",
        value_enum,
        default_value_t = defaults::LOG_FORMAT
    )]
    #[serde(default = "default_fns::log_format")]
    pub log_format: LogFormat,

    /// Log output stream (stderr, stdout)
    #[arg(
        long,
        global = true,
        env = "PKGDAG_LOG_OUTPUT",
        value_enum,
        default_value_t = defaults::LOG_OUTPUT
    )]
    #[serde(default = "default_fns::log_output")]
    pub log_output: LogOutput,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workdir: None,
            arch: default_fns::arch(),
            repositories: Vec::new(),
            keyrings: Vec::new(),
            allow_unresolved: false,
            net_timeout: default_fns::net_timeout(),
            log_level: default_fns::log_level(),
            log_format: default_fns::log_format(),
            log_output: default_fns::log_output(),
        }
    }
}

impl AppConfig {
    /// Create LoggerConfig from AppConfig and the color environment
    pub fn to_logger_config(&self, env: &EnvironmentConfig) -> LoggerConfig {
        let is_tty = match self.log_output {
            LogOutput::Stderr => std::io::stderr().is_terminal(),
            LogOutput::Stdout => std::io::stdout().is_terminal(),
        };
        LoggerConfig {
            level: LogLevel::from_verbosity(self.log_level),
            format: self.log_format,
            output: self.log_output,
            ansi: env.color_enabled(is_tty),
        }
    }

    /// Construction options for the dependency graph
    pub fn graph_options(&self) -> GraphOptions {
        let timeout = Duration::from_secs(self.net_timeout);
        GraphOptions::new()
            .with_repositories(self.repositories.iter().cloned())
            .with_keys(self.keyrings.iter().cloned())
            .allow_unresolved(self.allow_unresolved)
            .with_arch(self.arch.clone())
            .with_index_loader(Arc::new(RemoteIndexLoader::new(timeout)))
            .with_key_fetcher(KeyFetcher::new(timeout))
    }

    /// Definition directory; set once [`AppConfig::validate`] has run
    pub fn definitions_dir(&self) -> Result<&Path, ConfigError> {
        self.workdir
            .as_deref()
            .ok_or_else(|| ConfigError::ValidationFailed {
                reason: "working directory is not set".to_string(),
            })
    }

    /// Merge this config with another, taking non-default values from other
    pub fn merge_with(mut self, other: Self) -> Self {
        // For Option fields, take other if it's Some
        if other.workdir.is_some() {
            self.workdir = other.workdir;
        }

        // Lists extend rather than replace
        self.repositories.extend(other.repositories);
        self.keyrings.extend(other.keyrings);

        // For primitive fields, take other if it's not the default
        if other.arch != DEFAULT_ARCH {
            self.arch = other.arch;
        }
        if other.allow_unresolved {
            self.allow_unresolved = true;
        }
        if other.net_timeout != default_fns::net_timeout() {
            self.net_timeout = other.net_timeout;
        }
        if other.log_level != default_fns::log_level() {
            self.log_level = other.log_level;
        }

        // For enums, detect if it's non-default
        if !matches!(other.log_format, LogFormat::Text) {
            self.log_format = other.log_format;
        }
        if !matches!(other.log_output, LogOutput::Stderr) {
            self.log_output = other.log_output;
        }

        self
    }

    /// Validate the final configuration
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        let workdir = match self.workdir.take() {
            Some(dir) => dir,
            None => std::env::current_dir()?,
        };
        if !workdir.is_dir() {
            return Err(ConfigError::InvalidWorkDir {
                path: workdir.display().to_string(),
            });
        }
        self.workdir = Some(workdir);

        if self.arch.trim().is_empty() {
            return Err(ConfigError::ValidationFailed {
                reason: "architecture must not be empty".to_string(),
            });
        }
        if self.net_timeout == 0 {
            return Err(ConfigError::ValidationFailed {
                reason: "network timeout must be at least one second".to_string(),
            });
        }

        dedup_in_order(&mut self.repositories);
        dedup_in_order(&mut self.keyrings);
        Ok(())
    }
}

/// Drop repeated entries, keeping each first occurrence in place
fn dedup_in_order(items: &mut Vec<String>) {
    let mut seen = HashSet::new();
    items.retain(|item| seen.insert(item.clone()));
}

#[cfg(test)]
mod tests {
    include!("config.test.rs");
}
