//! Tracing and logging setup.

use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,

    /// Log format.
    pub format: LogFormat,

    /// Include span open/close events.
    pub span_events: bool,
}

/// Log format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format.
    Text,

    /// JSON format.
    Json,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
            span_events: false,
        }
    }
}

impl LogConfig {
    /// Parses the configured level.
    pub fn level(&self) -> crate::Result<Level> {
        self.level
            .parse()
            .map_err(|_| {
                crate::ConfigError::invalid_value(
                    "logging.level",
                    format!("unknown level '{}'", self.level),
                )
            })
    }
}

/// Initializes the global tracing subscriber.
///
/// `RUST_LOG` directives override the configured level. Returns an error if
/// the level does not parse or a subscriber is already installed.
pub fn try_init_tracing(config: &LogConfig) -> crate::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(config.level()?.into())
        .from_env_lossy();

    let span_events = if config.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let installed = match config.format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_span_events(span_events),
            )
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_span_events(span_events),
            )
            .try_init(),
    };

    installed.map_err(|e| crate::ConfigError::Install(format!("tracing already initialized: {e}")))
}

/// Initializes the global tracing subscriber, ignoring a second call.
pub fn init_tracing(config: &LogConfig) {
    if let Err(e) = try_init_tracing(config) {
        tracing::debug!(error = %e, "tracing subscriber not installed");
    }
}
