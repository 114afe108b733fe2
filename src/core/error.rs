//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Logger or appender name rejected by the name grammar
    #[error("Invalid {kind} name: '{name}'")]
    InvalidName { kind: &'static str, name: String },

    /// Level string that does not parse
    #[error("Unknown level for logger '{logger}': '{level}'")]
    UnknownLevel { logger: String, level: String },

    /// Logger referencing an appender nobody defined
    #[error("Unknown appender '{appender}' referenced by logger '{logger}'")]
    UnknownAppender { logger: String, appender: String },

    /// File appender error with path
    #[error("File appender error for '{path}': {message}")]
    FileAppenderError { path: String, message: String },

    /// File rotation error
    #[error("File rotation failed for '{path}': {message}")]
    FileRotationError { path: String, message: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create an invalid name error; `kind` is "logger" or "appender"
    pub fn invalid_name(kind: &'static str, name: impl Into<String>) -> Self {
        LoggerError::InvalidName {
            kind,
            name: name.into(),
        }
    }

    pub fn unknown_level(logger: impl Into<String>, level: impl Into<String>) -> Self {
        LoggerError::UnknownLevel {
            logger: logger.into(),
            level: level.into(),
        }
    }

    pub fn unknown_appender(logger: impl Into<String>, appender: impl Into<String>) -> Self {
        LoggerError::UnknownAppender {
            logger: logger.into(),
            appender: appender.into(),
        }
    }

    /// Create a file appender error
    pub fn file_appender(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileAppenderError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a file rotation error
    pub fn file_rotation(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileRotationError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}

/// Reports a failed sink write on standard error.
///
/// The record is dropped; the logging call site never sees the failure.
pub fn report_appender_error(appender: &str, err: &LoggerError) {
    eprintln!("[LOGGER ERROR] appender '{}' dropped a record: {}", appender, err);
}
