//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! Logs always go to stderr; stdout belongs to the menu.

use std::io;

use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::errors::{CliError, CliResult};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Single-line human-readable format.
    #[default]
    Compact,
    /// JSON format for machine parsing.
    Json,
}

/// Resolved logging settings.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: Level,
    pub format: LogFormat,
}

impl LogConfig {
    /// Raises `level` by one step per `-v`.
    ///
    /// - 0: configured level
    /// - 1: info
    /// - 2: debug
    /// - 3+: trace
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        let requested = match verbosity {
            0 => return self,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };
        // `Level` orders TRACE as the greatest.
        self.level = self.level.max(requested);
        self
    }
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over `level`.
pub fn init_logging(config: &LogConfig) -> CliResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str().to_lowercase()));

    let result = match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(io::stderr))
            .try_init(),
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .compact()
                    .without_time()
                    .with_target(false)
                    .with_writer(io::stderr),
            )
            .try_init(),
    };

    result.map_err(|e| CliError::config_error(format!("Failed to initialize logging: {}", e)))
}
