//! Tracing subscriber installation

use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Output format for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable single-line output
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Subscriber settings
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset (e.g. `"sfclient_infra=debug"`)
    pub default_directive: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { default_directive: "info".to_string(), format: LogFormat::Text }
    }
}

/// Install a global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `config.default_directive`. Calling this
/// more than once is harmless: later calls return `false` and leave the first
/// subscriber in place.
///
/// # Returns
/// `true` if this call installed the subscriber
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.default_directive))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = match config.format {
        LogFormat::Text => {
            tracing_subscriber::registry().with(filter).with(fmt::layer()).try_init().is_ok()
        }
        LogFormat::Json => {
            tracing_subscriber::registry().with(filter).with(fmt::layer().json()).try_init().is_ok()
        }
    };

    if installed {
        tracing::debug!(format = ?config.format, "tracing subscriber installed");
    }

    installed
}
