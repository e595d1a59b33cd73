//! Error types for plugin operations.
//!
//! User mistakes (an unknown schedule ID, a malformed argument) are not
//! errors: commands answer them with a reply. A [`PluginError`] is raised
//! when the command itself cannot complete, and it is handed to the caller
//! of the dispatcher as-is.

use std::fmt;

use pynik_core::FeedError;
use thiserror::Error;

/// The category of a plugin error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluginErrorCode {
    /// Connection failed, timed out, or the body could not be read.
    NetworkError,
    /// The server answered 404.
    NotFound,
    /// The server answered with a 5xx status.
    ServerError,
    /// The server answered with an unexpected status.
    InvalidResponse,
    /// The URL could not be parsed.
    BadRequest,
    /// A fetched calendar feed could not be parsed.
    InvalidFeed,
    /// Persisted data could not be read or written.
    StorageError,
    /// Missing or invalid settings.
    ConfigurationError,
    /// Unexpected state, bug.
    InternalError,
}

impl PluginErrorCode {
    /// Returns a stable name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NetworkError => "network_error",
            Self::NotFound => "not_found",
            Self::ServerError => "server_error",
            Self::InvalidResponse => "invalid_response",
            Self::BadRequest => "bad_request",
            Self::InvalidFeed => "invalid_feed",
            Self::StorageError => "storage_error",
            Self::ConfigurationError => "configuration_error",
            Self::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for PluginErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error raised while running a command.
#[derive(Debug, Error)]
pub struct PluginError {
    code: PluginErrorCode,
    message: String,
    /// The command that raised the error (e.g. "schedule").
    command: Option<String>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl PluginError {
    /// Creates a new plugin error with the given code and message.
    pub fn new(code: PluginErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            command: None,
            source: None,
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PluginErrorCode::NetworkError, message)
    }

    /// Creates a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(PluginErrorCode::NotFound, message)
    }

    /// Creates a server error.
    pub fn server(message: impl Into<String>) -> Self {
        Self::new(PluginErrorCode::ServerError, message)
    }

    /// Creates an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(PluginErrorCode::InvalidResponse, message)
    }

    /// Creates a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(PluginErrorCode::BadRequest, message)
    }

    /// Creates an invalid feed error.
    pub fn invalid_feed(message: impl Into<String>) -> Self {
        Self::new(PluginErrorCode::InvalidFeed, message)
    }

    /// Creates a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(PluginErrorCode::StorageError, message)
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(PluginErrorCode::ConfigurationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(PluginErrorCode::InternalError, message)
    }

    /// Sets the command name for this error.
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Sets the source error for this error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> PluginErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the command name, if set.
    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }
}

impl fmt::Display for PluginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref command) = self.command {
            write!(f, "[{}] ", command)?;
        }
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl From<FeedError> for PluginError {
    fn from(err: FeedError) -> Self {
        Self::invalid_feed(err.to_string()).with_source(err)
    }
}

impl From<serde_json::Error> for PluginError {
    fn from(err: serde_json::Error) -> Self {
        Self::storage(format!("invalid stored data: {}", err)).with_source(err)
    }
}

impl From<std::io::Error> for PluginError {
    fn from(err: std::io::Error) -> Self {
        Self::storage(err.to_string()).with_source(err)
    }
}

/// A specialized Result type for plugin operations.
pub type PluginResult<T> = Result<T, PluginError>;
