use super::*;
use crate::application::Commands;
use tempfile::TempDir;

#[test]
fn test_from_cli_validates_workdir() {
    let dir = TempDir::new().unwrap();
    let workdir = dir.path().to_string_lossy().to_string();
    let cli = Cli::try_parse_from(["pkgdag", "--workdir", workdir.as_str(), "--log-level", "2", "packages"])
        .unwrap();

    let config = CliConfig::from_cli(cli).unwrap();
    assert_eq!(config.app_config.workdir.as_deref(), Some(dir.path()));
    assert_eq!(config.app_config.log_level, 2);
    assert!(matches!(config.command, Commands::Packages));
}

#[test]
fn test_from_cli_rejects_missing_workdir() {
    let dir = TempDir::new().unwrap();
    let workdir = dir.path().join("gone").to_string_lossy().to_string();
    let cli = Cli::try_parse_from(["pkgdag", "--workdir", workdir.as_str(), "packages"]).unwrap();

    assert!(matches!(
        CliConfig::from_cli(cli),
        Err(ConfigError::InvalidWorkDir { .. })
    ));
}

