use super::*;

#[test]
fn test_filter_directives_scope_own_crates() {
    let directives = filter_directives(LogLevel::Debug);
    assert!(directives.starts_with("pkgdag=debug,pkgdag_lib=debug"));
    assert!(directives.contains("reqwest=warn"));
    assert!(directives.ends_with(",debug"));
}

#[test]
fn test_filter_directives_parse() {
    for level in [LogLevel::Error, LogLevel::Trace] {
        let filter = EnvFilter::try_new(filter_directives(level));
        assert!(filter.is_ok(), "directives for {:?} should parse", level);
    }
}

#[test]
fn test_logger_not_initialized_initially() {
    // Other tests in this binary never install the global logger
    assert!(!Logger::is_initialized() || Logger::global().is_some());
}
