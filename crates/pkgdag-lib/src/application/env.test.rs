use super::*;
use std::env;

fn env_config(no_color: Option<&str>, force_color: Option<&str>, ci: Option<&str>) -> EnvironmentConfig {
    EnvironmentConfig {
        no_color: no_color.map(str::to_string),
        force_color: force_color.map(str::to_string),
        ci: ci.map(str::to_string),
    }
}

#[test]
fn test_tty_decides_without_variables() {
    assert!(env_config(None, None, None).color_enabled(true));
    assert!(!env_config(None, None, None).color_enabled(false));
}

#[test]
fn test_no_color_disables() {
    assert!(!env_config(Some("1"), None, None).color_enabled(true));
    // an empty NO_COLOR is ignored
    assert!(env_config(Some(""), None, None).color_enabled(true));
}

#[test]
fn test_ci_disables() {
    assert!(!env_config(None, None, Some("true")).color_enabled(true));
}

#[test]
fn test_force_color_wins() {
    assert!(env_config(Some("1"), Some("1"), Some("true")).color_enabled(false));
    assert!(!env_config(None, Some("0"), None).color_enabled(true));
    assert!(env_config(None, Some("bogus"), None).color_enabled(true));
}

#[test]
fn test_load_reads_force_color() {
    unsafe {
        env::set_var("FORCE_COLOR", "2");
    }

    let config = EnvironmentConfig::load().unwrap();
    assert_eq!(config.force_color.as_deref(), Some("2"));

    unsafe {
        env::remove_var("FORCE_COLOR");
    }
}
