//! Appender trait for log output destinations

use super::{error::Result, log_entry::LogEntry};

/// A named sink that persists encoded entries.
///
/// Appenders are shared between loggers and threads, so `write` takes `&self` and
/// implementations synchronize their own I/O. A failed write never reaches the caller: it is
/// reported through [`report_appender_error`](super::error::report_appender_error) and the
/// record is dropped.
pub trait Appender: Send + Sync {
    fn name(&self) -> &str;

    fn write(&self, entry: &LogEntry);

    /// Releases the underlying resource. Calling it on a closed appender is a no-op.
    fn close(&self) -> Result<()>;
}
