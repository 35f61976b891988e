//! Tests for logging configuration and format parsing
//!
//! Tests the pure functions in the logging module that handle
//! log format parsing and configuration from environment variables.

use nats_box::observability::logging::{build_filter, parse_level, LogFormat, LogSettings};
use tracing::Level;

#[test]
fn test_log_format_parse_json() {
    assert_eq!(LogFormat::parse("json"), LogFormat::Json);
    assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
    assert_eq!(LogFormat::parse("Json"), LogFormat::Json);
}

#[test]
fn test_log_format_parse_compact() {
    assert_eq!(LogFormat::parse("compact"), LogFormat::Compact);
    assert_eq!(LogFormat::parse("COMPACT"), LogFormat::Compact);
}

#[test]
fn test_log_format_parse_invalid_defaults_to_plain() {
    // The bare message layout is what users of the tools expect to read
    assert_eq!(LogFormat::parse("invalid"), LogFormat::Plain);
    assert_eq!(LogFormat::parse(""), LogFormat::Plain);
    assert_eq!(LogFormat::parse("yaml"), LogFormat::Plain);
    assert_eq!(LogFormat::parse("123"), LogFormat::Plain);
}

#[test]
fn test_log_format_parse_whitespace() {
    assert_eq!(LogFormat::parse("  json  "), LogFormat::Json);
    assert_eq!(LogFormat::parse("json\n"), LogFormat::Json);
    assert_eq!(LogFormat::parse("\tcompact"), LogFormat::Compact);
}

#[test]
fn test_log_level_parsing() {
    let test_cases = vec![
        ("ERROR", Level::ERROR),
        ("WARN", Level::WARN),
        ("INFO", Level::INFO),
        ("debug", Level::DEBUG),
        ("TRACE", Level::TRACE),
        ("verbose", Level::INFO),
        ("", Level::INFO),
    ];

    for (input, expected) in test_cases {
        assert_eq!(parse_level(input), expected, "Failed for input: {input:?}");
    }
}

#[test]
fn test_settings_carry_timestamp_flag() {
    let settings = LogSettings::from_lookup(|_| None, true);
    assert!(settings.timestamps);
    assert_eq!(settings.level, Level::INFO);
    assert_eq!(settings.format, LogFormat::Plain);
}

#[test]
fn test_settings_read_log_variables() {
    let settings = LogSettings::from_lookup(
        |key| match key {
            "LOG_LEVEL" => Some("warn".to_string()),
            "LOG_FORMAT" => Some("compact".to_string()),
            _ => None,
        },
        false,
    );
    assert_eq!(settings.level, Level::WARN);
    assert_eq!(settings.format, LogFormat::Compact);
    assert!(!settings.timestamps);
}

#[test]
fn test_settings_ignore_unrelated_variables() {
    let settings = LogSettings::from_lookup(
        |key| match key {
            "NATS_URL" => Some("nats://localhost:4222".to_string()),
            _ => None,
        },
        false,
    );
    assert_eq!(settings, LogSettings::from_lookup(|_| None, false));
}

#[test]
fn test_rust_log_overrides_level_filter() {
    let settings = LogSettings::from_lookup(
        |key| match key {
            "LOG_LEVEL" => Some("error".to_string()),
            "RUST_LOG" => Some("nats_box=trace".to_string()),
            _ => None,
        },
        false,
    );
    let filter = build_filter(&settings).to_string().to_lowercase();
    assert_eq!(filter, "nats_box=trace");
}
