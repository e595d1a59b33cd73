//! Bot error types.

use thiserror::Error;

use pynik_core::TracingError;
use pynik_plugins::PluginError;

/// Result type for bot operations.
pub type BotResult<T> = Result<T, BotError>;

/// Errors that can occur in the bot.
#[derive(Debug, Error)]
pub enum BotError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A command failed.
    #[error(transparent)]
    Plugin(#[from] PluginError),

    /// Logging could not be set up.
    #[error("tracing setup failed: {0}")]
    Tracing(#[from] TracingError),
}
