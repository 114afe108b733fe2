//! Console appender implementation

use crate::core::error::{report_appender_error, LoggerError, Result};
use crate::core::{Appender, LogEntry};
use crate::encoder::{write_entry, JsonEncoder};
use parking_lot::Mutex;
use std::io::Write;

/// Writes JSON lines to standard output, or to any writer given at construction.
pub struct ConsoleAppender {
    name: String,
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleAppender {
    /// Creates an appender writing to standard output.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_writer(name, std::io::stdout())
    }

    /// Creates an appender writing to the given stream.
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_hierarchical_logger::appenders::ConsoleAppender;
    ///
    /// let appender = ConsoleAppender::with_writer("stderr", std::io::stderr());
    /// ```
    pub fn with_writer(name: impl Into<String>, out: impl Write + Send + 'static) -> Self {
        Self {
            name: name.into(),
            out: Mutex::new(Box::new(out)),
        }
    }
}

impl Appender for ConsoleAppender {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&self, entry: &LogEntry) {
        let mut encoder = JsonEncoder::acquire();
        let bytes = write_entry(entry, &mut *encoder);

        let mut out = self.out.lock();
        if let Err(err) = out.write_all(bytes) {
            report_appender_error(&self.name, &LoggerError::from(err));
        }
    }

    fn close(&self) -> Result<()> {
        self.out.lock().flush()?;
        Ok(())
    }
}
