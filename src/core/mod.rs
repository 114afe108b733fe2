//! Core logger types and traits

pub mod appender;
pub mod config;
pub mod error;
pub mod field;
pub mod handler;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod name;
pub mod pool;
pub mod registry;
pub mod timestamp;

pub use appender::Appender;
pub use config::{AppenderKind, Config, ConfigAppender, ConfigLogger};
pub use error::{LoggerError, Result};
pub use field::{Field, FieldValue};
pub use handler::Handler;
pub use log_entry::{LogEntry, PooledEntry};
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder};
pub use name::{is_appender_name_valid, is_logger_name_valid};
pub use registry::AppenderRegistry;
