//! Log entry structure
//!
//! Entries are recycled through a process-wide pool: [`LogEntry::acquire`] hands out a scoped
//! guard that returns the entry to the pool when dropped, so an entry can never be read after
//! it was released.

use super::field::Field;
use super::log_level::LogLevel;
use super::pool::{Pool, Pooled, Recycle};
use chrono::Utc;
use std::sync::LazyLock;

/// Initial field capacity of a fresh entry.
const INITIAL_FIELDS: usize = 64;

/// Entries whose field list grew beyond this capacity are dropped instead of pooled.
const MAX_POOLED_FIELDS: usize = 1024;

/// Maximum number of idle entries kept around.
const POOL_SIZE: usize = 64;

static ENTRY_POOL: LazyLock<Pool<LogEntry>> =
    LazyLock::new(|| Pool::new(POOL_SIZE, LogEntry::empty));

/// Pooled entry handle.
pub type PooledEntry = Pooled<'static, LogEntry>;

/// One log event: logger name, capture time, level, message and deduplicated fields.
#[derive(Debug, Clone)]
pub struct LogEntry {
    name: String,
    unix: i64,
    level: LogLevel,
    message: String,
    fields: Vec<Field>,
}

impl LogEntry {
    fn empty() -> Self {
        Self {
            name: String::new(),
            unix: 0,
            level: LogLevel::Unknown,
            message: String::new(),
            fields: Vec::with_capacity(INITIAL_FIELDS),
        }
    }

    /// Borrows an entry from the pool and stamps it with the current time (second resolution).
    pub fn acquire(name: &str, level: LogLevel, message: &str) -> PooledEntry {
        let mut entry = ENTRY_POOL.acquire();
        entry.name.push_str(name);
        entry.message.push_str(message);
        entry.level = level;
        entry.unix = Utc::now().timestamp();
        entry
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Capture time in seconds since the Unix epoch.
    pub fn unix(&self) -> i64 {
        self.unix
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Appends fields in order.
    ///
    /// A field whose name is already present replaces the earlier value at the earlier
    /// position: first-seen order is kept, last value wins.
    pub fn merge_fields(&mut self, fields: impl IntoIterator<Item = Field>) {
        for field in fields {
            match self.fields.iter_mut().find(|f| f.name() == field.name()) {
                Some(existing) => *existing = field,
                None => self.fields.push(field),
            }
        }
    }
}

impl Recycle for LogEntry {
    fn reset(&mut self) {
        self.name.clear();
        self.message.clear();
        self.fields.clear();
        self.level = LogLevel::Unknown;
        self.unix = 0;
    }

    fn is_reusable(&self) -> bool {
        self.fields.capacity() <= MAX_POOLED_FIELDS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::tests::render;

    fn names(entry: &LogEntry) -> Vec<&str> {
        entry.fields().iter().map(Field::name).collect()
    }

    #[test]
    fn test_acquire_stamps_entry() {
        let before = Utc::now().timestamp();
        let entry = LogEntry::acquire("app.users", LogLevel::Warn, "disk almost full");
        let after = Utc::now().timestamp();

        assert_eq!(entry.name(), "app.users");
        assert_eq!(entry.level(), LogLevel::Warn);
        assert_eq!(entry.message(), "disk almost full");
        assert!(entry.fields().is_empty());
        assert!(entry.unix() >= before && entry.unix() <= after);
    }

    #[test]
    fn test_merge_keeps_first_position_and_last_value() {
        let mut entry = LogEntry::acquire("merge", LogLevel::Info, "minerals");
        entry.merge_fields([Field::int("silver", 1), Field::int("chrome", 2)]);
        entry.merge_fields([
            Field::int("iron", 3),
            Field::int("silver", 4),
            Field::int("iron", 5),
            Field::int("quartz", 6),
        ]);

        assert_eq!(names(&entry), ["silver", "chrome", "iron", "quartz"]);
        let rendered: Vec<String> = entry.fields().iter().map(render).collect();
        assert_eq!(
            rendered,
            [r#""silver":4"#, r#""chrome":2"#, r#""iron":5"#, r#""quartz":6"#]
        );
    }

    #[test]
    fn test_merge_compares_lowercased_names() {
        let mut entry = LogEntry::acquire("merge", LogLevel::Info, "case");
        entry.merge_fields([Field::string("User", "a"), Field::string("user", "b")]);
        assert_eq!(entry.fields().len(), 1);
        assert_eq!(render(&entry.fields()[0]), r#""user":"b""#);
    }

    #[test]
    fn test_released_entry_is_reset() {
        let mut entry = LogEntry::empty();
        entry.name.push_str("old");
        entry.merge_fields([Field::bool("stale", true)]);
        entry.reset();

        assert!(entry.name().is_empty());
        assert!(entry.fields().is_empty());
        assert!(entry.fields.capacity() >= INITIAL_FIELDS);
    }

    #[test]
    fn test_oversized_entry_is_not_reusable() {
        let mut entry = LogEntry::empty();
        assert!(entry.is_reusable());
        entry.fields.reserve(MAX_POOLED_FIELDS * 2);
        assert!(!entry.is_reusable());
    }
}
