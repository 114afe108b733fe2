//! File appender with size-based rotation
//!
//! The appender keeps an append-mode handle and a running byte count seeded from the file size
//! on open. When writing the next record would reach `max_bytes`, the active file is moved aside
//! and a fresh one is opened at the same path. A `max_bytes` of zero disables rotation.

use crate::core::error::{report_appender_error, LoggerError, Result};
use crate::core::{Appender, LogEntry};
use crate::encoder::{write_entry, JsonEncoder};
use parking_lot::Mutex;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// What happens to the active file on rotation.
///
/// # Examples
///
/// ```
/// use rust_hierarchical_logger::appenders::RotationStrategy;
///
/// assert_eq!(RotationStrategy::default(), RotationStrategy::Rename);
/// assert_eq!(RotationStrategy::from_backup(true), RotationStrategy::Backup);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationStrategy {
    /// Move the active file to `<path>-`, replacing the previous one.
    #[default]
    Rename,
    /// Move the active file to `<path>.<N>`, where N is one above the highest existing suffix.
    Backup,
}

impl RotationStrategy {
    #[must_use]
    pub fn from_backup(backup: bool) -> Self {
        if backup {
            RotationStrategy::Backup
        } else {
            RotationStrategy::Rename
        }
    }
}

struct FileState {
    file: Option<File>,
    size: u64,
}

/// Appends JSON lines to a file, rotating it once it grows past a threshold.
///
/// # Examples
///
/// ```no_run
/// use rust_hierarchical_logger::appenders::{FileAppender, RotationStrategy};
///
/// let appender = FileAppender::new("file-log", "/var/log/app/app.log")
///     .unwrap()
///     .with_max_bytes(10 * 1024 * 1024)
///     .with_strategy(RotationStrategy::Backup);
/// ```
pub struct FileAppender {
    name: String,
    path: PathBuf,
    strategy: RotationStrategy,
    max_bytes: u64,
    state: Mutex<FileState>,
}

impl FileAppender {
    /// Opens (or creates) the file at `path`, creating missing parent directories.
    ///
    /// # Errors
    ///
    /// Returns error if the path is empty or the file cannot be opened.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(LoggerError::file_appender("", "path is empty"));
        }

        let mut state = FileState {
            file: None,
            size: 0,
        };
        open(&path, &mut state)?;

        Ok(Self {
            name: name.into(),
            path,
            strategy: RotationStrategy::default(),
            max_bytes: 0,
            state: Mutex::new(state),
        })
    }

    /// Rotates once the file would reach `max_bytes`; zero means unbounded.
    #[must_use]
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: RotationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    pub fn strategy(&self) -> RotationStrategy {
        self.strategy
    }

    fn append(&self, state: &mut FileState, bytes: &[u8]) -> Result<()> {
        // A failed rotation leaves the handle closed; retry from scratch.
        if state.file.is_none() {
            open(&self.path, state)?;
        }

        if self.should_rotate(state.size, bytes.len() as u64) {
            self.rotate(state)?;
        }

        let file = state.file.as_mut().ok_or_else(|| {
            LoggerError::file_appender(self.path.display().to_string(), "file is not open")
        })?;
        file.write_all(bytes).map_err(|e| {
            LoggerError::io_operation(
                "writing log file",
                format!("cannot append to '{}'", self.path.display()),
                e,
            )
        })?;
        state.size += bytes.len() as u64;
        Ok(())
    }

    fn should_rotate(&self, size: u64, incoming: u64) -> bool {
        self.max_bytes > 0 && size > 0 && size + incoming >= self.max_bytes
    }

    fn rotate(&self, state: &mut FileState) -> Result<()> {
        close(state).map_err(|e| {
            LoggerError::file_rotation(
                self.path.display().to_string(),
                format!("Failed to flush before rotation: {}", e),
            )
        })?;

        let target = match self.strategy {
            RotationStrategy::Rename => suffixed(&self.path, "-"),
            RotationStrategy::Backup => {
                let next = highest_backup_index(&self.path)? + 1;
                suffixed(&self.path, &format!(".{}", next))
            }
        };

        fs::rename(&self.path, &target).map_err(|e| {
            LoggerError::file_rotation(
                self.path.display().to_string(),
                format!("Failed to move log file to '{}': {}", target.display(), e),
            )
        })?;

        open(&self.path, state)
    }
}

impl Appender for FileAppender {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&self, entry: &LogEntry) {
        let mut encoder = JsonEncoder::acquire();
        let bytes = write_entry(entry, &mut *encoder);

        let mut state = self.state.lock();
        if let Err(err) = self.append(&mut state, bytes) {
            report_appender_error(&self.name, &err);
        }
    }

    fn close(&self) -> Result<()> {
        close(&mut self.state.lock())
    }
}

fn open(path: &Path, state: &mut FileState) -> Result<()> {
    if state.file.is_some() {
        return Ok(());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            LoggerError::io_operation(
                "create log directory",
                format!("Failed to create directory '{}'", parent.display()),
                e,
            )
        })?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            LoggerError::file_appender(path.display().to_string(), format!("Failed to open: {}", e))
        })?;

    let metadata = file.metadata().map_err(|e| {
        LoggerError::file_appender(
            path.display().to_string(),
            format!("Cannot access file metadata: {}", e),
        )
    })?;

    state.size = metadata.len();
    state.file = Some(file);
    Ok(())
}

fn close(state: &mut FileState) -> Result<()> {
    state.size = 0;
    if let Some(mut file) = state.file.take() {
        file.flush()?;
    }
    Ok(())
}

fn suffixed(path: &Path, suffix: &str) -> PathBuf {
    let mut raw: OsString = path.as_os_str().to_owned();
    raw.push(suffix);
    PathBuf::from(raw)
}

/// Highest `N` among existing `<path>.<N>` siblings, or zero.
fn highest_backup_index(path: &Path) -> Result<u64> {
    let prefix = match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => format!("{}.", name),
        None => return Ok(0),
    };
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut highest = 0;
    for item in fs::read_dir(directory)? {
        let item = item?;
        let index = item
            .file_name()
            .to_str()
            .and_then(|name| name.strip_prefix(prefix.as_str()))
            .and_then(|suffix| suffix.parse::<u64>().ok());
        if let Some(index) = index {
            highest = highest.max(index);
        }
    }
    Ok(highest)
}
