//! Structured logging for the site configuration tools.
//!
//! Provides:
//! - JSON (bunyan-style) or pretty terminal output, always on stderr
//! - `log` crate records forwarded into `tracing`
//! - Quiet test runs unless `TEST_LOG` is set
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use telemetry::init_default;
//!
//! fn main() {
//!     init_default("site-admin");
//!     tracing::info!("Application started");
//! }
//! ```
//!
//! # Configuration
//!
//! Environment variables:
//! - `RUST_LOG` - Log filter directive (default: "info")
//! - `LOG_FORMAT` - Output format: "json" or "pretty" (default: "pretty")
//! - `TEST_LOG` - If set, enables logs in test mode

pub mod config;
pub mod error;
pub mod layers;

pub use config::{DEFAULT_FILTER, LogFormat, TelemetryConfig};
pub use error::{Result, TelemetryError};

// Re-export tracing macros for convenience
pub use tracing::{debug, error, info, trace, warn};

use tracing_log::LogTracer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Initialize telemetry with default settings from environment variables.
pub fn init_default(name: &str) {
    init_with_config(name, TelemetryConfig::from_env());
}

/// Initialize telemetry with a custom default filter. `RUST_LOG` still wins
/// when set.
///
/// ```rust,no_run
/// telemetry::init_with_filter("site-admin", "warn");
/// ```
pub fn init_with_filter(name: &str, default_filter: &str) {
    let mut config = TelemetryConfig::from_env();
    if std::env::var_os("RUST_LOG").is_none() {
        config = config.with_filter(default_filter);
    }
    init_with_config(name, config);
}

/// Initialize telemetry with full configuration control. A second call is
/// ignored.
///
/// ```rust,no_run
/// use telemetry::{LogFormat, TelemetryConfig};
///
/// let config = TelemetryConfig::new()
///     .with_filter("debug")
///     .with_format(LogFormat::Json);
///
/// telemetry::init_with_config("site-admin", config);
/// ```
pub fn init_with_config(name: &str, config: TelemetryConfig) {
    let _ = try_init_with_config(name, config);
}

/// Like [`init_with_config`], reporting whether the subscriber was installed.
pub fn try_init_with_config(name: &str, config: TelemetryConfig) -> Result<()> {
    // Redirect log crate to tracing
    let _ = LogTracer::init();

    let env_filter = filter_for(&config);
    let installed = match config.format {
        LogFormat::Json => {
            let (storage_layer, formatting_layer) = layers::JsonLayer::layers(name);
            let subscriber = Registry::default()
                .with(env_filter)
                .with(storage_layer)
                .with(formatting_layer);
            tracing::subscriber::set_global_default(subscriber)
        }
        LogFormat::Pretty => {
            let formatting_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_file(false)
                .with_line_number(false);
            let subscriber = Registry::default()
                .with(env_filter)
                .with(formatting_layer);
            tracing::subscriber::set_global_default(subscriber)
        }
    };
    installed.map_err(|err| TelemetryError::Install(err.to_string()))
}

/// Initialize telemetry for tests.
///
/// Logs are suppressed unless `TEST_LOG` is set.
pub fn init_test() {
    let config = TelemetryConfig::from_env().with_test_mode(true);
    if config.should_suppress_logs() {
        return;
    }

    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = LogTracer::init();
        let subscriber = Registry::default()
            .with(filter_for(&config))
            .with(fmt::layer().with_target(true).with_test_writer());
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

fn filter_for(config: &TelemetryConfig) -> EnvFilter {
    EnvFilter::try_new(&config.filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
