//! Registry of externally provided appenders
//!
//! Appenders that are not described by configuration (custom sinks, test doubles) are
//! registered by name and picked up by every handler built afterwards. A process-wide instance
//! is available through [`AppenderRegistry::global`]; it is created on first use and never torn
//! down. Handlers can also be given a private registry.

use super::appender::Appender;
use super::error::{report_appender_error, LoggerError, Result};
use super::name::is_appender_name_valid;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

static GLOBAL_REGISTRY: LazyLock<AppenderRegistry> = LazyLock::new(AppenderRegistry::new);

#[derive(Default)]
pub struct AppenderRegistry {
    appenders: Mutex<HashMap<String, Arc<dyn Appender>>>,
}

impl AppenderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry consulted by [`Handler::with_config`](super::handler::Handler::with_config).
    pub fn global() -> &'static AppenderRegistry {
        &GLOBAL_REGISTRY
    }

    /// Registers an appender under its own name.
    ///
    /// A previous appender with the same name is closed and replaced.
    ///
    /// # Errors
    ///
    /// Returns `InvalidName` if the appender name does not match the name grammar.
    pub fn register(&self, appender: Arc<dyn Appender>) -> Result<()> {
        let name = appender.name().to_string();
        if !is_appender_name_valid(&name) {
            return Err(LoggerError::invalid_name("appender", name));
        }

        let previous = self.appenders.lock().insert(name.clone(), appender.clone());
        if let Some(previous) = previous {
            if !Arc::ptr_eq(&previous, &appender) {
                if let Err(err) = previous.close() {
                    report_appender_error(&name, &err);
                }
            }
        }
        Ok(())
    }

    /// Registers appenders in order, stopping at the first invalid name.
    pub fn register_all(&self, appenders: impl IntoIterator<Item = Arc<dyn Appender>>) -> Result<()> {
        appenders
            .into_iter()
            .try_for_each(|appender| self.register(appender))
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Appender>> {
        self.appenders.lock().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.appenders.lock().contains_key(name)
    }

    /// Copy of the current name to appender map.
    pub fn snapshot(&self) -> HashMap<String, Arc<dyn Appender>> {
        self.appenders.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.appenders.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.appenders.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log_entry::LogEntry;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingAppender {
        name: String,
        closed: AtomicUsize,
    }

    impl CountingAppender {
        fn new(name: &str) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                closed: AtomicUsize::new(0),
            })
        }
    }

    impl Appender for CountingAppender {
        fn name(&self) -> &str {
            &self.name
        }

        fn write(&self, _: &LogEntry) {}

        fn close(&self) -> Result<()> {
            self.closed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_register_and_get() {
        let registry = AppenderRegistry::new();
        assert!(registry.is_empty());

        registry.register(CountingAppender::new("audit-log")).unwrap();
        assert!(registry.contains("audit-log"));
        assert_eq!(registry.get("audit-log").unwrap().name(), "audit-log");
        assert!(registry.get("other").is_none());
        assert_eq!(registry.snapshot().len(), 1);
    }

    #[test]
    fn test_invalid_name_is_rejected() {
        let registry = AppenderRegistry::new();
        let err = registry.register(CountingAppender::new("Audit")).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidName { kind: "appender", .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_replacement_closes_previous() {
        let registry = AppenderRegistry::new();
        let first = CountingAppender::new("audit-log");
        let second = CountingAppender::new("audit-log");

        registry.register(first.clone()).unwrap();
        registry.register(first.clone()).unwrap();
        assert_eq!(first.closed.load(Ordering::SeqCst), 0);

        registry.register(second.clone()).unwrap();
        assert_eq!(first.closed.load(Ordering::SeqCst), 1);
        assert_eq!(second.closed.load(Ordering::SeqCst), 0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_all_stops_at_invalid_name() {
        let registry = AppenderRegistry::new();
        let appenders = ["first-log", "B", "third-log"]
            .map(|name| CountingAppender::new(name) as Arc<dyn Appender>);
        assert!(registry.register_all(appenders).is_err());
        assert!(registry.contains("first-log"));
        assert!(!registry.contains("third-log"));
    }
}
