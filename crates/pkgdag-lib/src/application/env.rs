//! Environment variable handling for application configuration
//!
//! Reads the conventional color and CI variables. Everything `PKGDAG_*` is
//! handled by the CLI parser itself.

use crate::primitives::ConfigError;
use serde::Deserialize;

/// Environment variables that affect application behavior
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvironmentConfig {
    /// NO_COLOR environment variable (any value = disable color)
    pub no_color: Option<String>,
    /// FORCE_COLOR environment variable (0/false = disable, 1/2/3/true = enable)
    pub force_color: Option<String>,
    /// CI environment variable (any value = CI mode)
    pub ci: Option<String>,
}

impl EnvironmentConfig {
    /// Load environment configuration from current environment
    pub fn load() -> Result<Self, ConfigError> {
        Ok(envy::from_env()?)
    }

    /// Whether log output should carry ANSI colors
    ///
    /// Precedence: CI < NO_COLOR < FORCE_COLOR, falling back to `is_tty`
    pub fn color_enabled(&self, is_tty: bool) -> bool {
        let mut color = is_tty;

        if self.ci.is_some() {
            color = false;
        }

        if self.no_color.as_deref().is_some_and(|v| !v.is_empty()) {
            color = false;
        }

        if let Some(force_color) = &self.force_color {
            match force_color.as_str() {
                "0" | "false" => color = false,
                "1" | "2" | "3" | "true" => color = true,
                _ => {} // Invalid values ignored
            }
        }

        color
    }
}

#[cfg(test)]
mod tests {
    include!("env.test.rs");
}
