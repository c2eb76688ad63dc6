//! Runtime configuration for the endpoint monitor
//!
//! The check interval and the UP/DOWN thresholds are fixed. Only ambient
//! settings (request timeout, probe concurrency, log format) come from the
//! environment.

use std::env;
use std::time::Duration;

/// Pause between the end of one cycle and the start of the next
pub const CHECK_INTERVAL: Duration = Duration::from_secs(15);

/// Slowest response still classified as UP
pub const LATENCY_THRESHOLD_MS: f64 = 500.0;

/// Output format of the log subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl From<&str> for LogFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Upper bound on a single probe, connection through the last body byte
    pub http_timeout: Duration,

    /// Probes allowed in flight within one cycle
    pub max_concurrent_checks: usize,

    /// Log line format
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_timeout: Duration::from_secs(10),
            max_concurrent_checks: 1,
            log_format: LogFormat::Text,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup, falling back
    /// to defaults for anything missing or unparseable
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(timeout) = lookup("HTTP_TIMEOUT_SECONDS") {
            if let Ok(seconds) = timeout.trim().parse::<u64>() {
                config.http_timeout = Duration::from_secs(seconds);
            }
        }

        if let Some(concurrency) = lookup("MAX_CONCURRENT_CHECKS") {
            if let Ok(n) = concurrency.trim().parse() {
                config.max_concurrent_checks = n;
            }
        }

        if let Some(format) = lookup("LOG_FORMAT") {
            config.log_format = LogFormat::from(format.trim());
        }

        config
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.http_timeout.is_zero() {
            return Err("http_timeout must be greater than 0".to_string());
        }

        if self.max_concurrent_checks == 0 {
            return Err("max_concurrent_checks must be greater than 0".to_string());
        }

        Ok(())
    }
}
