//! Telemetry configuration read from the environment.

use std::env;
use std::str::FromStr;

use crate::error::TelemetryError;

/// Default filter directive when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Output format of log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Bunyan-style JSON, one object per line
    Json,
    /// Human readable terminal output
    #[default]
    Pretty,
}

impl FromStr for LogFormat {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" | "text" => Ok(Self::Pretty),
            other => Err(TelemetryError::InvalidFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Filter directive used when `RUST_LOG` is unset or invalid.
    pub filter: String,
    pub format: LogFormat,
    /// Running under `cargo test`.
    pub test_mode: bool,
    /// `TEST_LOG` was set, so test logs are shown.
    pub test_log: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryConfig {
    pub fn new() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            format: LogFormat::default(),
            test_mode: false,
            test_log: false,
        }
    }

    /// Read `RUST_LOG`, `LOG_FORMAT` and `TEST_LOG`. An unknown `LOG_FORMAT`
    /// falls back to pretty output.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::new();
        if let Some(filter) = lookup("RUST_LOG").filter(|value| !value.trim().is_empty()) {
            config.filter = filter;
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            config.format = format.parse().unwrap_or_default();
        }
        config.test_log = lookup("TEST_LOG").is_some();
        config
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    /// Test runs stay quiet unless `TEST_LOG` is set.
    pub fn should_suppress_logs(&self) -> bool {
        self.test_mode && !self.test_log
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = TelemetryConfig::from_lookup(lookup(&[]));
        assert_eq!(config, TelemetryConfig::new());
        assert_eq!(config.filter, "info");
        assert_eq!(config.format, LogFormat::Pretty);
    }

    #[test]
    fn reads_filter_and_format() {
        let config = TelemetryConfig::from_lookup(lookup(&[
            ("RUST_LOG", "site_config=debug"),
            ("LOG_FORMAT", "JSON"),
        ]));
        assert_eq!(config.filter, "site_config=debug");
        assert_eq!(config.format, LogFormat::Json);

        let config = TelemetryConfig::from_lookup(lookup(&[("LOG_FORMAT", "xml")]));
        assert_eq!(config.format, LogFormat::Pretty);
    }

    #[test]
    fn tests_are_quiet_unless_asked() {
        let quiet = TelemetryConfig::from_lookup(lookup(&[])).with_test_mode(true);
        assert!(quiet.should_suppress_logs());

        let loud = TelemetryConfig::from_lookup(lookup(&[("TEST_LOG", "1")])).with_test_mode(true);
        assert!(!loud.should_suppress_logs());
        assert!(!TelemetryConfig::new().should_suppress_logs());
    }
}
