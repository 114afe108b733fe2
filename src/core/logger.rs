//! Logger facade
//!
//! A [`Logger`] is an immutable value bound to a name, a level, a set of appenders and
//! contextual fields. Cloning is cheap and [`Logger::with`] returns a new logger, so a logger can
//! be shared freely between threads.

use super::{
    appender::Appender, field::Field, log_entry::LogEntry, log_level::LogLevel,
    name::is_logger_name_valid,
};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

#[derive(Clone)]
pub struct Logger {
    name: Arc<str>,
    level: LogLevel,
    appenders: Arc<[Arc<dyn Appender>]>,
    fields: Arc<[Field]>,
}

impl Logger {
    /// Creates a logger without contextual fields.
    ///
    /// # Panics
    ///
    /// Panics if `name` does not match the logger name grammar.
    pub fn new(name: &str, level: LogLevel, appenders: Vec<Arc<dyn Appender>>) -> Self {
        if !is_logger_name_valid(name) {
            panic!("invalid logger name format: {}", name);
        }
        Self {
            name: Arc::from(name),
            level,
            appenders: Arc::from(appenders),
            fields: Arc::from(Vec::new()),
        }
    }

    /// A disabled logger without appenders.
    #[must_use]
    pub fn noop() -> Self {
        Self::new("noop", LogLevel::NoLevel, Vec::new())
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use rust_hierarchical_logger::prelude::*;
    ///
    /// let logger = Logger::builder("app.server")
    ///     .level(LogLevel::Debug)
    ///     .appender(ConsoleAppender::new("stdout"))
    ///     .field(Field::string("region", "eu-west-1"))
    ///     .build();
    /// assert!(logger.is_enabled(LogLevel::Debug));
    /// ```
    #[must_use]
    pub fn builder(name: &str) -> LoggerBuilder {
        LoggerBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn appenders(&self) -> &[Arc<dyn Appender>] {
        &self.appenders
    }

    /// Whether a record at `level` would reach the appenders.
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        self.level.enables(level)
    }

    /// Emits a record if `level` is enabled.
    ///
    /// Contextual fields come first, so a call-site field with the same name replaces the
    /// contextual value in place.
    pub fn log(&self, level: LogLevel, message: &str, fields: impl IntoIterator<Item = Field>) {
        if !self.is_enabled(level) {
            return;
        }

        let mut entry = LogEntry::acquire(&self.name, level, message);
        entry.merge_fields(self.fields.iter().cloned());
        entry.merge_fields(fields);

        for appender in self.appenders.iter() {
            dispatch(appender.as_ref(), &entry);
        }
    }

    /// Emits a record whose message is built from format arguments; used by the macros.
    pub fn log_args(
        &self,
        level: LogLevel,
        args: fmt::Arguments<'_>,
        fields: impl IntoIterator<Item = Field>,
    ) {
        if !self.is_enabled(level) {
            return;
        }
        match args.as_str() {
            Some(message) => self.log(level, message, fields),
            None => self.log(level, &args.to_string(), fields),
        }
    }

    pub fn debug(&self, message: &str, fields: impl IntoIterator<Item = Field>) {
        self.log(LogLevel::Debug, message, fields);
    }

    pub fn info(&self, message: &str, fields: impl IntoIterator<Item = Field>) {
        self.log(LogLevel::Info, message, fields);
    }

    pub fn warn(&self, message: &str, fields: impl IntoIterator<Item = Field>) {
        self.log(LogLevel::Warn, message, fields);
    }

    pub fn error(&self, message: &str, fields: impl IntoIterator<Item = Field>) {
        self.log(LogLevel::Error, message, fields);
    }

    /// Returns a new logger carrying these fields after the current ones.
    #[must_use]
    pub fn with(&self, fields: impl IntoIterator<Item = Field>) -> Logger {
        Logger {
            name: Arc::clone(&self.name),
            level: self.level,
            appenders: Arc::clone(&self.appenders),
            fields: self.fields.iter().cloned().chain(fields).collect(),
        }
    }

    /// Same level, appenders and fields under another name.
    pub(crate) fn with_name(&self, name: &str) -> Logger {
        Logger {
            name: Arc::from(name),
            level: self.level,
            appenders: Arc::clone(&self.appenders),
            fields: Arc::clone(&self.fields),
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level)
            .field(
                "appenders",
                &self.appenders.iter().map(|a| a.name()).collect::<Vec<_>>(),
            )
            .field("fields", &self.fields.len())
            .finish()
    }
}

/// Hands the entry to one appender; a panicking appender does not stop the others.
fn dispatch(appender: &dyn Appender, entry: &LogEntry) {
    let result = panic::catch_unwind(AssertUnwindSafe(|| appender.write(entry)));
    if let Err(payload) = result {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        eprintln!(
            "[LOGGER CRITICAL] appender '{}' panicked: {}. Other appenders continue to function.",
            appender.name(),
            message
        );
    }
}

/// Builder for a standalone [`Logger`].
pub struct LoggerBuilder {
    name: String,
    level: LogLevel,
    appenders: Vec<Arc<dyn Appender>>,
    fields: Vec<Field>,
}

impl LoggerBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            level: LogLevel::Info,
            appenders: Vec::new(),
            fields: Vec::new(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appenders.push(Arc::new(appender));
        self
    }

    /// Adds an appender shared with other loggers.
    #[must_use = "builder methods return a new value"]
    pub fn shared_appender(mut self, appender: Arc<dyn Appender>) -> Self {
        self.appenders.push(appender);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Build the Logger
    ///
    /// # Panics
    ///
    /// Panics if the name does not match the logger name grammar.
    pub fn build(self) -> Logger {
        Logger::new(&self.name, self.level, self.appenders).with(self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::appender::testing::MemoryAppender;
    use crate::core::error::Result;

    fn capture(level: LogLevel) -> (Logger, Arc<MemoryAppender>) {
        let memory = Arc::new(MemoryAppender::new("memory"));
        let logger = Logger::new("app.test", level, vec![memory.clone() as Arc<dyn Appender>]);
        (logger, memory)
    }

    #[test]
    fn test_level_gating() {
        let (logger, memory) = capture(LogLevel::Warn);

        logger.debug("debug", []);
        logger.info("info", []);
        logger.warn("warn", []);
        logger.error("error", []);

        let lines = memory.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains(r#""level":"warning","message":"warn""#));
        assert!(lines[1].contains(r#""level":"error","message":"error""#));
    }

    #[test]
    fn test_disabled_logger_emits_nothing() {
        let (logger, memory) = capture(LogLevel::NoLevel);
        logger.error("error", [Field::int("code", 1)]);
        assert!(memory.lines().is_empty());
        assert!(!logger.is_enabled(LogLevel::Error));
    }

    #[test]
    fn test_with_returns_new_logger() {
        let (logger, memory) = capture(LogLevel::Debug);
        let scoped = logger.with([Field::string("request", "r-1"), Field::int("attempt", 1)]);

        assert!(logger.fields().is_empty());
        assert_eq!(scoped.fields().len(), 2);
        assert_eq!(scoped.name(), "app.test");

        scoped.info("retry", [Field::int("attempt", 2), Field::bool("last", true)]);
        logger.info("plain", []);

        let lines = memory.lines();
        assert!(lines[0].ends_with("\"message\":\"retry\",\"request\":\"r-1\",\"attempt\":2,\"last\":true}\n"));
        assert!(lines[1].ends_with("\"message\":\"plain\"}\n"));
    }

    #[test]
    fn test_with_name_keeps_bindings() {
        let (logger, _memory) = capture(LogLevel::Info);
        let logger = logger.with([Field::bool("ctx", true)]);
        let renamed = logger.with_name("app.test.child");

        assert_eq!(renamed.name(), "app.test.child");
        assert_eq!(renamed.level(), LogLevel::Info);
        assert_eq!(renamed.fields().len(), 1);
        assert_eq!(renamed.appenders().len(), 1);
    }

    #[test]
    fn test_log_args_formats_message() {
        let (logger, memory) = capture(LogLevel::Info);
        logger.log_args(LogLevel::Info, format_args!("port {}", 8080), []);
        assert!(memory.lines()[0].contains(r#""message":"port 8080""#));
    }

    struct PanickingAppender;

    impl Appender for PanickingAppender {
        fn name(&self) -> &str {
            "panicking"
        }

        fn write(&self, _: &LogEntry) {
            panic!("sink exploded");
        }

        fn close(&self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_panicking_appender_is_isolated() {
        let memory = Arc::new(MemoryAppender::new("memory"));
        let logger = Logger::new(
            "app.test",
            LogLevel::Info,
            vec![
                Arc::new(PanickingAppender) as Arc<dyn Appender>,
                memory.clone() as Arc<dyn Appender>,
            ],
        );

        logger.info("still delivered", []);
        assert_eq!(memory.lines().len(), 1);
    }

    #[test]
    fn test_noop_logger() {
        let logger = Logger::noop();
        assert_eq!(logger.level(), LogLevel::NoLevel);
        assert!(logger.appenders().is_empty());
        logger.error("ignored", [Field::null("x")]);
    }

    #[test]
    fn test_builder() {
        let logger = Logger::builder("app.builder")
            .level(LogLevel::Debug)
            .appender(MemoryAppender::new("memory"))
            .field(Field::string("service", "api"))
            .build();

        assert_eq!(logger.name(), "app.builder");
        assert!(logger.is_enabled(LogLevel::Debug));
        assert_eq!(logger.appenders()[0].name(), "memory");
        assert_eq!(logger.fields()[0].name(), "service");
    }

    #[test]
    #[should_panic(expected = "invalid logger name format")]
    fn test_invalid_name_panics() {
        let _ = Logger::new("Invalid Name", LogLevel::Info, Vec::new());
    }
}
