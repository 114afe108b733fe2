//! Level-checked logging macros.
//!
//! The level is checked before anything else is evaluated: when it is disabled, neither the
//! message arguments nor the field expressions are touched. Fields follow a `;`.
//!
//! # Examples
//!
//! ```
//! use rust_hierarchical_logger::prelude::*;
//! use rust_hierarchical_logger::{info, warn};
//!
//! let logger = Logger::builder("app.server")
//!     .appender(ConsoleAppender::new("stdout"))
//!     .build();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! // With fields
//! warn!(logger, "Slow request"; Field::string("path", "/users"), Field::uint64("ms", 1250));
//! ```

/// Log a message at the given level.
///
/// # Examples
///
/// ```
/// # use rust_hierarchical_logger::prelude::*;
/// # let logger = Logger::noop();
/// use rust_hierarchical_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500; Field::bool("retry", false));
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $fmt:literal $(, $arg:expr)* $(; $($field:expr),* $(,)?)?) => {{
        let logger = &$logger;
        let level = $level;
        if logger.is_enabled(level) {
            logger.log_args(level, format_args!($fmt $(, $arg)*), [$($($field),*)?]);
        }
    }};
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use rust_hierarchical_logger::prelude::*;
/// # let logger = Logger::noop();
/// use rust_hierarchical_logger::debug;
/// debug!(logger, "Debug information");
/// debug!(logger, "Counter value: {}", 10; Field::int("counter", 10));
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use rust_hierarchical_logger::prelude::*;
/// # let logger = Logger::noop();
/// use rust_hierarchical_logger::info;
/// info!(logger, "Application started"; Field::string("version", "1.2.0"));
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use rust_hierarchical_logger::prelude::*;
/// # let logger = Logger::noop();
/// use rust_hierarchical_logger::warn;
/// warn!(logger, "Disk usage at {}%", 85);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use rust_hierarchical_logger::prelude::*;
/// # let logger = Logger::noop();
/// use rust_hierarchical_logger::error;
/// let err = std::io::Error::new(std::io::ErrorKind::Other, "connection reset");
/// error!(logger, "Request failed"; Field::error(&err));
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::appender::testing::MemoryAppender;
    use crate::core::{Appender, Field, LogLevel, Logger};
    use std::cell::Cell;
    use std::sync::Arc;

    fn capture(level: LogLevel) -> (Logger, Arc<MemoryAppender>) {
        let memory = Arc::new(MemoryAppender::new("memory"));
        let logger = Logger::new("app.macros", level, vec![memory.clone() as Arc<dyn Appender>]);
        (logger, memory)
    }

    #[test]
    fn test_log_macro() {
        let (logger, memory) = capture(LogLevel::Debug);
        log!(logger, LogLevel::Info, "Test message");
        log!(logger, LogLevel::Info, "Value: {}", 42);
        log!(logger, LogLevel::Info, "Fields"; Field::int("a", 1), Field::int("b", 2),);

        let lines = memory.lines();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains(r#""message":"Test message"}"#));
        assert!(lines[1].contains(r#""message":"Value: 42"}"#));
        assert!(lines[2].contains(r#""message":"Fields","a":1,"b":2}"#));
    }

    #[test]
    fn test_level_macros() {
        let (logger, memory) = capture(LogLevel::Debug);
        debug!(logger, "Debug: {}", "details");
        info!(logger, "Info: {}", "information");
        warn!(logger, "Warning: {}", "caution"; Field::bool("flag", true));
        error!(logger, "Error: {}", "failure");

        let lines = memory.lines();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains(r#""level":"debug","message":"Debug: details""#));
        assert!(lines[1].contains(r#""level":"info""#));
        assert!(lines[2].contains(r#""message":"Warning: caution","flag":true"#));
        assert!(lines[3].contains(r#""level":"error""#));
    }

    #[test]
    fn test_disabled_level_evaluates_nothing() {
        let (logger, memory) = capture(LogLevel::Warn);
        let evaluated = Cell::new(0);
        let expensive = || {
            evaluated.set(evaluated.get() + 1);
            Field::string("dump", "large")
        };

        debug!(logger, "Skipped {}", { evaluated.set(evaluated.get() + 1); 1 }; expensive());
        info!(logger, "Skipped"; expensive());
        assert_eq!(evaluated.get(), 0);
        assert!(memory.lines().is_empty());

        warn!(logger, "Kept"; expensive());
        assert_eq!(evaluated.get(), 1);
        assert_eq!(memory.lines().len(), 1);
    }
}
