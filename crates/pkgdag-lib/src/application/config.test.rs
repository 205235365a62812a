use super::*;
use tempfile::TempDir;

#[test]
fn test_config_defaults() {
    let config = AppConfig::default();
    assert_eq!(config.log_level, 0);
    assert_eq!(config.net_timeout, 30);
    assert_eq!(config.arch, "x86_64");
    assert!(!config.allow_unresolved);
    assert!(config.repositories.is_empty());
}

#[test]
fn test_config_merging() {
    let base = AppConfig {
        repositories: vec!["https://base.example".to_string()],
        ..AppConfig::default()
    };
    let override_config = AppConfig {
        log_level: 4,
        arch: "aarch64".to_string(),
        allow_unresolved: true,
        repositories: vec!["https://cli.example".to_string()],
        log_format: LogFormat::Json,
        ..AppConfig::default()
    };

    let merged = base.merge_with(override_config);
    assert_eq!(merged.log_level, 4);
    assert_eq!(merged.arch, "aarch64");
    assert!(merged.allow_unresolved);
    assert_eq!(
        merged.repositories,
        ["https://base.example", "https://cli.example"]
    );
    assert_eq!(merged.log_format, LogFormat::Json);
    assert_eq!(merged.net_timeout, 30);
}

#[test]
fn test_cli_arguments_parse_into_config() {
    let config = AppConfig::try_parse_from([
        "pkgdag",
        "--dir",
        "/srv/defs",
        "-r",
        "https://one.example,https://two.example",
        "--keyring",
        "/keys/a.pub",
        "--allow-unresolved",
        "--log-format",
        "pretty",
    ])
    .unwrap();

    assert_eq!(config.workdir, Some(PathBuf::from("/srv/defs")));
    assert_eq!(config.repositories, ["https://one.example", "https://two.example"]);
    assert_eq!(config.keyrings, ["/keys/a.pub"]);
    assert!(config.allow_unresolved);
    assert_eq!(config.log_format, LogFormat::Yaml);
}

#[test]
fn test_validate_defaults_and_checks_workdir() {
    let dir = TempDir::new().unwrap();
    let mut config = AppConfig {
        workdir: Some(dir.path().to_path_buf()),
        repositories: vec!["https://a".to_string(), "https://a".to_string()],
        ..AppConfig::default()
    };
    config.validate().unwrap();
    assert_eq!(config.definitions_dir().unwrap(), dir.path());
    assert_eq!(config.repositories, ["https://a"]);

    let mut missing = AppConfig {
        workdir: Some(dir.path().join("missing")),
        ..AppConfig::default()
    };
    assert!(matches!(
        missing.validate(),
        Err(ConfigError::InvalidWorkDir { .. })
    ));

    let mut zero_timeout = AppConfig {
        workdir: Some(dir.path().to_path_buf()),
        net_timeout: 0,
        ..AppConfig::default()
    };
    assert!(matches!(
        zero_timeout.validate(),
        Err(ConfigError::ValidationFailed { .. })
    ));
}

#[test]
fn test_definitions_dir_requires_validation() {
    let config = AppConfig::default();
    assert!(config.definitions_dir().is_err());
}

#[test]
fn test_graph_options_follow_config() {
    let config = AppConfig {
        arch: "riscv64".to_string(),
        repositories: vec!["https://repo.example".to_string()],
        keyrings: vec!["/keys/repo.pub".to_string()],
        allow_unresolved: true,
        ..AppConfig::default()
    };

    let opts = config.graph_options();
    assert_eq!(opts.arch, "riscv64");
    assert_eq!(opts.repositories, ["https://repo.example"]);
    assert_eq!(opts.keys, ["/keys/repo.pub"]);
    assert!(opts.allow_unresolved);
}

#[test]
fn test_logger_config_follows_verbosity() {
    let config = AppConfig {
        log_level: 3,
        log_output: LogOutput::Stdout,
        ..AppConfig::default()
    };
    let env = EnvironmentConfig {
        no_color: Some("1".to_string()),
        force_color: None,
        ci: None,
    };

    let logger = config.to_logger_config(&env);
    assert_eq!(logger.level, LogLevel::Debug);
    assert_eq!(logger.output, LogOutput::Stdout);
    assert!(!logger.ansi);
}

#[test]
fn test_validate_drops_repeated_entries_in_order() {
    let dir = TempDir::new().unwrap();
    let mut config = AppConfig {
        workdir: Some(dir.path().to_path_buf()),
        repositories: ["https://b", "https://a", "https://b", "https://c", "https://a"]
            .map(String::from)
            .to_vec(),
        keyrings: ["/keys/x.pub", "/keys/y.pub", "/keys/x.pub"]
            .map(String::from)
            .to_vec(),
        ..AppConfig::default()
    };
    config.validate().unwrap();

    assert_eq!(config.repositories, ["https://b", "https://a", "https://c"]);
    assert_eq!(config.keyrings, ["/keys/x.pub", "/keys/y.pub"]);
}
