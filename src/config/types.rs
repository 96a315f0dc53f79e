//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! of the diagnostic binary.

use clap::{Parser, ValueEnum};

use crate::config::constants::{PRESSURE_CONFIG_ENV, SIGNAL_CLIENT_TIMEOUT_SECS};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Command-line options for the `pressure_gate` diagnostic binary.
///
/// Drives a burst of simulated outbound requests through an
/// [`OutboundGate`](crate::dispatch::OutboundGate) and reports what the gate
/// decided for each of them.
#[derive(Debug, Clone, Parser)]
#[command(name = "pressure_gate", about = "Exercise the outbound admission gate")]
pub struct Opt {
    /// Requests per second admitted by the rate limiter (<= 0 disables limiting)
    #[arg(long, default_value_t = -1, allow_hyphen_values = true)]
    pub quota: i64,

    /// Let requests through (with a warning) when the quota is exhausted
    #[arg(long)]
    pub downgrade: bool,

    /// Pressure decelerator configuration as a JSON document
    #[arg(long, env = PRESSURE_CONFIG_ENV, default_value = "")]
    pub pressure_config: String,

    /// Base URL of the pressure signal service
    #[arg(long, conflicts_with = "fixed_sleep_ms")]
    pub signal_url: Option<String>,

    /// Answer every key with this sleep time instead of calling a service
    #[arg(long, default_value_t = 0)]
    pub fixed_sleep_ms: i32,

    /// Signal keys, used round-robin across requests
    #[arg(long, value_delimiter = ',', default_value = "default")]
    pub keys: Vec<String>,

    /// Number of simulated requests
    #[arg(long, default_value_t = 10)]
    pub requests: usize,

    /// Signal service timeout in seconds
    #[arg(long, default_value_t = SIGNAL_CLIENT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Tenant name propagated to the signal service
    #[arg(long)]
    pub tenant: Option<String>,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}
