//! Structured logging system using tracing crate
//!
//! The tools report everything except a request's reply through the log, on
//! stderr. By default the lines are bare messages, so `nats-sub` output reads
//! `[#1] Received on [foo]: 'bar'`.
//!
//! ## Log Format Options
//!
//! The output format is controlled by the `LOG_FORMAT` environment variable:
//!
//! - `plain` - Bare message lines (default)
//! - `json` - Structured JSON format for log aggregation systems
//! - `compact` - Level-tagged terminal format
//!
//! ## Environment Variables
//!
//! - `LOG_LEVEL`: Log level (ERROR, WARN, INFO, DEBUG, TRACE) - defaults to INFO
//! - `LOG_FORMAT`: Output format (plain, json, compact) - defaults to plain
//! - `RUST_LOG`: Override log filtering (follows env_logger format)
//!
//! The `-t` flag adds a `YYYY/MM/DD HH:MM:SS` local timestamp to each line.

use std::fmt::{self, Write as _};
use tracing::Level;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::{fmt as tracing_fmt, prelude::*, EnvFilter};

/// Timestamp layout used with `-t`
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogFormat {
    /// Message only, no level or target
    Plain,
    /// JSON format for structured logging (machine-readable)
    Json,
    /// Compact format with level tags (terminal-friendly)
    Compact,
}

impl LogFormat {
    /// Parse log format from string
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => LogFormat::Json,
            "compact" => LogFormat::Compact,
            _ => LogFormat::Plain,
        }
    }
}

/// Logging configuration resolved from flags and environment
#[derive(Debug, Clone, PartialEq)]
pub struct LogSettings {
    pub level: Level,
    pub format: LogFormat,
    pub timestamps: bool,
    /// `RUST_LOG` directives, replacing the level-based filter
    pub filter: Option<String>,
}

impl LogSettings {
    /// Resolve settings through an environment lookup
    pub fn from_lookup<F>(env: F, timestamps: bool) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let level = parse_level(&env("LOG_LEVEL").unwrap_or_else(|| "INFO".to_string()));
        let format = LogFormat::parse(&env("LOG_FORMAT").unwrap_or_default());
        let filter = env("RUST_LOG").filter(|directives| !directives.trim().is_empty());

        Self {
            level,
            format,
            timestamps,
            filter,
        }
    }
}

/// Parse a log level name; unknown names fall back to INFO
pub fn parse_level(s: &str) -> Level {
    match s.trim().to_uppercase().as_str() {
        "ERROR" => Level::ERROR,
        "WARN" => Level::WARN,
        "INFO" => Level::INFO,
        "DEBUG" => Level::DEBUG,
        "TRACE" => Level::TRACE,
        _ => Level::INFO,
    }
}

/// Local wall-clock timer for `-t`
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTimer;

impl FormatTime for LogTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", chrono::Local::now().format(TIMESTAMP_FORMAT))
    }
}

/// Build the event filter for the given settings
pub fn build_filter(settings: &LogSettings) -> EnvFilter {
    // Allow RUST_LOG to override
    if let Some(directives) = &settings.filter {
        return EnvFilter::new(directives);
    }

    let mut filter = EnvFilter::new(settings.level.to_string());
    // Reduce noise from dependencies
    for directive in ["async_nats=warn", "tokio=warn"] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }
    filter
}

/// Initialize logging with the given settings
pub fn init_logging(settings: LogSettings) {
    let subscriber = tracing_subscriber::registry().with(build_filter(&settings));

    match (settings.format, settings.timestamps) {
        (LogFormat::Plain, false) => {
            let fmt_layer = tracing_fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_level(false)
                .with_target(false)
                .without_time();
            subscriber.with(fmt_layer).init();
        }
        (LogFormat::Plain, true) => {
            let fmt_layer = tracing_fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_level(false)
                .with_target(false)
                .with_timer(LogTimer);
            subscriber.with(fmt_layer).init();
        }
        (LogFormat::Compact, false) => {
            let fmt_layer = tracing_fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time();
            subscriber.with(fmt_layer).init();
        }
        (LogFormat::Compact, true) => {
            let fmt_layer = tracing_fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_timer(LogTimer);
            subscriber.with(fmt_layer).init();
        }
        (LogFormat::Json, _) => {
            let fmt_layer = tracing_fmt::layer().json().with_writer(std::io::stderr);
            subscriber.with(fmt_layer).init();
        }
    }
}
