//! Tracing setup shared by the bot binary and its plugins.
//!
//! Logs always go to stderr: stdout carries the bot's replies.
//!
//! ```ignore
//! use pynik_core::tracing::{init_tracing, TracingConfig};
//!
//! init_tracing(TracingConfig::console())?;
//! ```

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, prelude::*};

/// Crates whose events the default filter lets through.
const LOG_TARGETS: &[&str] = &["pynik", "pynik_bot", "pynik_core", "pynik_plugins"];

#[derive(Debug, Error)]
pub enum TracingError {
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error("invalid log filter: {0}")]
    EnvFilter(#[from] tracing_subscriber::filter::ParseError),
}

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingOutputFormat {
    /// One human-readable line per event.
    #[default]
    Compact,
    /// One JSON object per event.
    Json,
}

/// Logging options for [`init_tracing`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// Level for the bot crates when neither `filter` nor `RUST_LOG` is set.
    pub level: Level,
    pub output_format: TracingOutputFormat,
    /// Adds file and line to every event.
    pub include_location: bool,
    /// Adds the module path to every event.
    pub include_target: bool,
    pub include_timestamp: bool,
    /// Explicit filter directive; wins over `RUST_LOG`.
    pub filter: Option<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self::console()
    }
}

impl TracingConfig {
    /// Warnings and errors only, no decoration.
    #[must_use]
    pub fn console() -> Self {
        Self {
            level: Level::WARN,
            output_format: TracingOutputFormat::Compact,
            include_location: false,
            include_target: false,
            include_timestamp: false,
            filter: None,
        }
    }

    /// Everything down to `debug`, with module paths and source locations.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            level: Level::DEBUG,
            include_location: true,
            include_target: true,
            ..Self::console()
        }
    }

    /// Timestamped JSON lines at `info`, for running unattended.
    #[must_use]
    pub fn service() -> Self {
        Self {
            level: Level::INFO,
            output_format: TracingOutputFormat::Json,
            include_location: true,
            include_target: true,
            include_timestamp: true,
            filter: None,
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Builds the event filter: the explicit directive, else `RUST_LOG`,
    /// else [`default_directive`] at `level`.
    pub fn env_filter(&self) -> Result<EnvFilter, TracingError> {
        match self.filter {
            Some(ref directive) => Ok(EnvFilter::try_new(directive)?),
            None => Ok(EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_directive(self.level)))),
        }
    }

    fn output_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_file(self.include_location)
            .with_line_number(self.include_location)
            .with_target(self.include_target);

        match (self.output_format, self.include_timestamp) {
            (TracingOutputFormat::Json, _) => layer.json().boxed(),
            (TracingOutputFormat::Compact, true) => layer.compact().boxed(),
            (TracingOutputFormat::Compact, false) => layer.compact().without_time().boxed(),
        }
    }
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Fails if a global subscriber is already installed or the filter
/// directive does not parse.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let filter = config.env_filter()?;
    let subscriber = tracing_subscriber::registry()
        .with(config.output_layer())
        .with(filter);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Filter directive enabling `level` for every bot crate.
pub fn default_directive(level: Level) -> String {
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}
