//! Handler configuration
//!
//! The configuration describes a root logger, a set of named appenders and dotted child
//! loggers. Every type derives serde, so any loader can produce it; [`Config::from_json_str`]
//! covers JSON. A configuration is validated eagerly before a handler is built.
//!
//! # Examples
//!
//! ```
//! use rust_hierarchical_logger::core::config::{Config, ConfigAppender, ConfigLogger};
//!
//! let config = Config::new()
//!     .with_appender("stdout", ConfigAppender::console())
//!     .with_appender("db-log", ConfigAppender::file("/var/log/app/db.log").with_max_bytes(1 << 20))
//!     .with_root(ConfigLogger::new("info").with_appenders(["stdout"]))
//!     .with_logger("repositories", ConfigLogger::new("debug").with_appenders(["db-log"]));
//! assert_eq!(config.loggers.len(), 1);
//! ```

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use super::name::{is_appender_name_valid, is_logger_name_valid};
use super::registry::AppenderRegistry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name under which the root logger is reported in errors and records.
pub const ROOT_LOGGER_NAME: &str = "root";

/// Kind of sink an appender entry describes. Required in every appender entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppenderKind {
    Console,
    File,
}

/// One appender entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigAppender {
    #[serde(rename = "type")]
    pub kind: AppenderKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, alias = "maxbytes", skip_serializing_if = "Option::is_none")]
    pub max_bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup: Option<bool>,
}

impl ConfigAppender {
    fn of_kind(kind: AppenderKind) -> Self {
        Self {
            kind,
            path: None,
            max_bytes: None,
            backup: None,
        }
    }

    /// A console appender writing to standard output.
    pub fn console() -> Self {
        Self::of_kind(AppenderKind::Console)
    }

    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::of_kind(AppenderKind::File)
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = Some(max_bytes);
        self
    }

    /// Keep numbered backups on rotation instead of a single renamed file.
    #[must_use = "builder methods return a new value"]
    pub fn with_backup(mut self, backup: bool) -> Self {
        self.backup = Some(backup);
        self
    }

    /// Checks the options allowed for this kind.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` when a console appender sets file options or a file
    /// appender has no path.
    pub fn validate(&self, name: &str) -> Result<()> {
        let component = format!("appender {}", name);
        match self.kind {
            AppenderKind::Console => {
                if self.path.is_some() {
                    return Err(LoggerError::config(component, "path is not allowed for console"));
                }
                if self.max_bytes.is_some() {
                    return Err(LoggerError::config(
                        component,
                        "maxBytes is not allowed for console",
                    ));
                }
                if self.backup.is_some() {
                    return Err(LoggerError::config(component, "backup is not allowed for console"));
                }
            }
            AppenderKind::File => {
                if self.path.as_deref().map_or(true, str::is_empty) {
                    return Err(LoggerError::config(component, "path is required for file"));
                }
            }
        }
        Ok(())
    }
}

/// One logger node: level, local appenders and additivity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigLogger {
    pub level: String,
    pub appenders: Vec<String>,
    pub additive: bool,
}

impl ConfigLogger {
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Self::default()
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_appenders<I, S>(mut self, appenders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.appenders.extend(appenders.into_iter().map(Into::into));
        self
    }

    /// Also send records to the nearest configured ancestor's appenders.
    #[must_use = "builder methods return a new value"]
    pub fn additive(mut self, additive: bool) -> Self {
        self.additive = additive;
        self
    }

    /// Parses the level string.
    ///
    /// # Errors
    ///
    /// Returns `UnknownLevel` naming `logger` when the string is not a level.
    pub fn parse_level(&self, logger: &str) -> Result<LogLevel> {
        self.level
            .parse()
            .map_err(|_| LoggerError::unknown_level(logger, self.level.as_str()))
    }
}

/// Complete handler configuration.
///
/// The root node's `additive` flag is ignored: the root never inherits. Sections missing
/// from deserialized input are empty; [`Config::default`] is the stdout fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub root: ConfigLogger,
    #[serde(default)]
    pub appenders: BTreeMap<String, ConfigAppender>,
    #[serde(default)]
    pub loggers: BTreeMap<String, ConfigLogger>,
}

impl Default for Config {
    /// Root logger at `info` writing to a `stdout` console appender.
    fn default() -> Self {
        Self::new()
            .with_appender("stdout", ConfigAppender::console())
            .with_root(ConfigLogger::new("info").with_appenders(["stdout"]))
    }
}

impl Config {
    /// An empty configuration; the root logger still needs a level and an appender.
    pub fn new() -> Self {
        Self {
            root: ConfigLogger::default(),
            appenders: BTreeMap::new(),
            loggers: BTreeMap::new(),
        }
    }

    /// Deserializes a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns `JsonError` for malformed input or an unknown appender type.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_root(mut self, root: ConfigLogger) -> Self {
        self.root = root;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_appender(mut self, name: impl Into<String>, appender: ConfigAppender) -> Self {
        self.appenders.insert(name.into(), appender);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_logger(mut self, name: impl Into<String>, logger: ConfigLogger) -> Self {
        self.loggers.insert(name.into(), logger);
        self
    }

    /// Whether `name` is defined locally or in the registry.
    pub fn is_appender_defined(&self, name: &str, registry: &AppenderRegistry) -> bool {
        self.appenders.contains_key(name) || registry.contains(name)
    }

    /// Validates appenders, then the root logger, then every child logger.
    ///
    /// # Errors
    ///
    /// Returns the first problem found; nothing is built from an invalid configuration.
    pub fn validate(&self, registry: &AppenderRegistry) -> Result<()> {
        for (name, appender) in &self.appenders {
            if !is_appender_name_valid(name) {
                return Err(LoggerError::invalid_name("appender", name.as_str()));
            }
            appender.validate(name)?;
        }

        self.root.parse_level(ROOT_LOGGER_NAME)?;
        if self.root.appenders.is_empty() {
            return Err(LoggerError::config(
                "root logger",
                "at least one appender is required",
            ));
        }
        self.check_appenders(ROOT_LOGGER_NAME, &self.root, registry)?;

        for (name, logger) in &self.loggers {
            if !is_logger_name_valid(name) {
                return Err(LoggerError::invalid_name("logger", name.as_str()));
            }
            logger.parse_level(name)?;
            self.check_appenders(name, logger, registry)?;
        }

        Ok(())
    }

    fn check_appenders(
        &self,
        logger_name: &str,
        logger: &ConfigLogger,
        registry: &AppenderRegistry,
    ) -> Result<()> {
        match logger
            .appenders
            .iter()
            .find(|name| !self.is_appender_defined(name, registry))
        {
            Some(missing) => Err(LoggerError::unknown_appender(logger_name, missing.as_str())),
            None => Ok(()),
        }
    }
}
