//! # Rust Hierarchical Logger
//!
//! A structured, leveled logging engine that writes one JSON object per line.
//!
//! ## Features
//!
//! - **Structured fields**: typed key/value pairs rendered without intermediate allocation
//! - **Hierarchical configuration**: dotted logger names inherit levels and appenders
//! - **Appenders**: console and size-rotated file sinks, plus custom ones via a registry
//! - **Thread Safe**: loggers are immutable values, shared freely between threads
//!
//! ## Example
//!
//! ```
//! use rust_hierarchical_logger::prelude::*;
//!
//! let handler = Handler::new(&Config::default(), &AppenderRegistry::new()).unwrap();
//! let logger = handler
//!     .logger("app.server")
//!     .with([Field::string("region", "eu-west-1")]);
//!
//! logger.info("Server started", [Field::uint16("port", 8080)]);
//! rust_hierarchical_logger::debug!(logger, "not emitted at info level"; Field::bool("x", true));
//! ```

pub mod appenders;
pub mod core;
pub mod encoder;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, FileAppender, RotationStrategy};
    pub use crate::core::{
        Appender, AppenderRegistry, Config, ConfigAppender, ConfigLogger, Field, FieldValue,
        Handler, LogEntry, LogLevel, Logger, LoggerBuilder, LoggerError, Result,
    };
    pub use crate::encoder::{ArrayEncoder, ObjectEncoder};
}

pub use appenders::{ConsoleAppender, FileAppender, RotationStrategy};
pub use core::{
    Appender, AppenderKind, AppenderRegistry, Config, ConfigAppender, ConfigLogger, Field,
    FieldValue, Handler, LogEntry, LogLevel, Logger, LoggerBuilder, LoggerError, PooledEntry,
    Result,
};
pub use encoder::{
    ArrayEncoder, ArrayMarshaler, Encoder, JsonEncoder, ObjectEncoder, ObjectMarshaler,
    LEVEL_KEY, LOGGER_KEY, MESSAGE_KEY, TIME_KEY,
};
