//! Command-line and environment configuration for the service.

use std::time::Duration;

use clap::{Parser, ValueEnum};

/// Output format for log events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable single-line events.
    #[default]
    Compact,
    /// One JSON object per event.
    Json,
}

/// Runtime configuration. Every flag can also be set from the environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "reqline-server", version, about = "Execute reqline requests over HTTP")]
pub struct Config {
    /// Interface to bind.
    #[arg(long, env = "REQLINE_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Timeout for each outbound request, in milliseconds.
    #[arg(long, env = "REQLINE_TIMEOUT_MS", default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// `tracing` filter directive, e.g. `info,reqline_core=debug`.
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_filter: String,

    #[arg(long, env = "REQLINE_LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

impl Config {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            timeout_ms: 10_000,
            log_filter: "info".to_string(),
            log_format: LogFormat::Compact,
        }
    }
}
