//! Appender implementations

pub mod console;
pub mod file;

pub use console::ConsoleAppender;
pub use file::{FileAppender, RotationStrategy};

pub use crate::core::Appender;

use crate::core::config::{AppenderKind, ConfigAppender};
use crate::core::error::{LoggerError, Result};
use crate::core::name::is_appender_name_valid;
use std::sync::Arc;

/// Builds the appender described by one configuration entry.
///
/// Console appenders write to standard output.
///
/// # Errors
///
/// Returns error if the name or options are invalid, or if the file cannot be opened.
pub fn new_appender(name: &str, config: &ConfigAppender) -> Result<Arc<dyn Appender>> {
    if !is_appender_name_valid(name) {
        return Err(LoggerError::invalid_name("appender", name));
    }
    config.validate(name)?;

    match config.kind {
        AppenderKind::Console => Ok(Arc::new(ConsoleAppender::new(name))),
        AppenderKind::File => {
            let path = config.path.as_deref().unwrap_or_default();
            let appender = FileAppender::new(name, path)?
                .with_max_bytes(config.max_bytes.unwrap_or(0))
                .with_strategy(RotationStrategy::from_backup(config.backup.unwrap_or(false)));
            Ok(Arc::new(appender))
        }
    }
}
