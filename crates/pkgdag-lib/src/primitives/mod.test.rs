use super::*;

macro_rules! test_enum_completeness {
    ($enum_type:ty, $test_name:ident) => {
        #[test]
        fn $test_name() {
            for variant in <$enum_type>::value_variants() {
                let possible_value = variant
                    .to_possible_value()
                    .expect("PossibleValue should exist for all variants");
                let parsed: $enum_type = possible_value.get_name().parse().unwrap();
                assert_eq!(parsed, *variant, "Round-trip should preserve variant");
            }
        }
    };
}

test_enum_completeness!(LogLevel, test_log_level_completeness);
test_enum_completeness!(LogFormat, test_log_format_completeness);
test_enum_completeness!(LogOutput, test_log_output_completeness);

#[test]
fn test_log_format_aliases() {
    let mappings = [
        ("text", LogFormat::Text),
        ("plain", LogFormat::Text),
        ("json", LogFormat::Json),
        ("yml", LogFormat::Yaml),
        ("pretty", LogFormat::Yaml),
    ];
    for (input, expected) in mappings {
        assert_eq!(input.parse::<LogFormat>().unwrap(), expected, "input '{}'", input);
    }
}

#[test]
fn test_invalid_value_reports_parse_error() {
    let err = "loud".parse::<LogLevel>().unwrap_err();
    match err {
        ConfigError::ParseError { value, reason } => {
            assert_eq!(value, "loud");
            assert_eq!(reason, "invalid log level");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_verbosity_mapping() {
    assert_eq!(LogLevel::from_verbosity(0), LogLevel::Error);
    assert_eq!(LogLevel::from_verbosity(2), LogLevel::Info);
    assert_eq!(LogLevel::from_verbosity(9), LogLevel::Trace);
    assert_eq!(LogLevel::from_verbosity(1).as_directive(), "warn");
}
