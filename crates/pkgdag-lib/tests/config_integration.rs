use pkgdag_lib::application::config::AppConfig;
use pkgdag_lib::primitives::{ConfigError, LogFormat};

#[test]
fn test_config_default_creation() {
    let config = AppConfig::default();

    assert!(config.log_level <= 4);
    assert_eq!(config.net_timeout, 30);
    assert_eq!(config.arch, "x86_64");
    assert!(!config.allow_unresolved);
    assert!(config.repositories.is_empty());
}

#[test]
fn test_config_merging_integration() {
    let base_config = AppConfig {
        repositories: vec!["https://mirror.example/main".to_string()],
        ..AppConfig::default()
    };
    let override_config = AppConfig {
        log_level: 3,
        log_format: LogFormat::Json,
        repositories: vec!["https://mirror.example/community".to_string()],
        allow_unresolved: true,
        ..AppConfig::default()
    };

    let merged = base_config.merge_with(override_config);

    assert_eq!(merged.log_level, 3);
    assert!(matches!(merged.log_format, LogFormat::Json));
    assert!(merged.allow_unresolved);
    assert_eq!(
        merged.repositories,
        ["https://mirror.example/main", "https://mirror.example/community"]
    );

    // Default values should remain for non-overridden fields
    assert_eq!(merged.net_timeout, 30);
}

#[test]
fn test_validated_config_drives_graph_options() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig {
        workdir: Some(dir.path().to_path_buf()),
        arch: "aarch64".to_string(),
        keyrings: vec!["a.rsa.pub".to_string(), "a.rsa.pub".to_string()],
        net_timeout: 5,
        ..AppConfig::default()
    };
    config.validate().unwrap();

    assert_eq!(config.definitions_dir().unwrap(), dir.path());
    assert_eq!(config.keyrings, ["a.rsa.pub"]);

    let opts = config.graph_options();
    assert_eq!(opts.arch, "aarch64");
    assert_eq!(opts.keys, ["a.rsa.pub"]);
}

#[test]
fn test_missing_workdir_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig {
        workdir: Some(dir.path().join("missing")),
        ..AppConfig::default()
    };

    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidWorkDir { .. })
    ));
}
