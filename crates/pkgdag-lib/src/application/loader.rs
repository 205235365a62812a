//! Configuration loading
//!
//! Coordinates loading configuration from its sources:
//! defaults -> .env files -> env vars -> CLI.

use crate::primitives::ConfigError;
use clap::Parser;
use tracing::trace;

use super::cli::{Cli, CliConfig};
use super::config::AppConfig;

/// Env files consulted in order; earlier files win
pub const ENV_FILES: &[&str] = &[".env.local", ".env"];

/// Load `.env.local` and `.env` from the current directory into the process
/// environment. Missing files are skipped; variables already set are kept.
pub fn load_env_files() -> Result<(), ConfigError> {
    for env_file in ENV_FILES {
        match dotenvy::from_filename(env_file) {
            Ok(path) => trace!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => {
                return Err(ConfigError::EnvFileError {
                    file: env_file.to_string(),
                    source: e,
                });
            }
        }
    }
    Ok(())
}

impl CliConfig {
    /// Load configuration from the environment and command line arguments
    pub fn load() -> Result<Self, ConfigError> {
        // .env values must be in place before clap reads PKGDAG_* variables
        load_env_files()?;
        Self::from_cli(Cli::parse())
    }

    /// Merge parsed arguments over the defaults and validate the result
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let mut app_config = AppConfig::default().merge_with(cli.config);
        app_config.validate()?;

        Ok(Self {
            app_config,
            command: cli.command,
        })
    }
}

#[cfg(test)]
mod tests {
    include!("loader.test.rs");
}
