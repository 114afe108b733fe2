//! Hierarchical logger resolution
//!
//! A [`Handler`] turns a configuration into a set of resolved loggers and hands out a logger
//! for any dotted name. Configured names resolve directly; other names borrow the level and
//! appenders of their nearest resolved ancestor (or the root) and are cached on first use.
//!
//! Resolution of a configured child logger:
//! - its own appenders are always used;
//! - the resolved appenders of its nearest configured ancestor (or the root) are added when
//!   the logger is `additive`, or when it lists no appender and is not disabled.
//!
//! # Examples
//!
//! ```
//! use rust_hierarchical_logger::core::config::{Config, ConfigAppender, ConfigLogger};
//! use rust_hierarchical_logger::prelude::*;
//!
//! let config = Config::new()
//!     .with_appender("stdout", ConfigAppender::console())
//!     .with_root(ConfigLogger::new("warning").with_appenders(["stdout"]))
//!     .with_logger("repositories", ConfigLogger::new("debug"));
//! let handler = Handler::new(&config, &AppenderRegistry::new()).unwrap();
//!
//! let logger = handler.logger("repositories.users");
//! assert_eq!(logger.name(), "repositories.users");
//! assert_eq!(logger.level(), LogLevel::Debug);
//! assert_eq!(logger.appenders()[0].name(), "stdout");
//! ```

use super::appender::Appender;
use super::config::{Config, ConfigLogger, ROOT_LOGGER_NAME};
use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use super::logger::Logger;
use super::name::{ancestors, is_logger_name_valid};
use super::registry::AppenderRegistry;
use crate::appenders::new_appender;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Cache key of the root logger.
const ROOT_KEY: &str = "";

pub struct Handler {
    appenders: BTreeMap<String, Arc<dyn Appender>>,
    loggers: DashMap<String, Logger>,
}

impl Handler {
    /// Validates the configuration and resolves every configured logger.
    ///
    /// Appenders found in `registry` are available alongside configured ones; a configured
    /// appender wins over a registered one with the same name.
    ///
    /// # Errors
    ///
    /// Returns the first configuration problem, or an appender creation failure.
    pub fn new(config: &Config, registry: &AppenderRegistry) -> Result<Self> {
        config.validate(registry)?;

        let mut appenders: BTreeMap<String, Arc<dyn Appender>> =
            registry.snapshot().into_iter().collect();
        for (name, appender_config) in &config.appenders {
            let appender = new_appender(name, appender_config)?;
            appenders.insert(name.clone(), appender);
        }

        let handler = Self {
            appenders,
            loggers: DashMap::new(),
        };

        let root_level = config.root.parse_level(ROOT_LOGGER_NAME)?;
        let mut root_appenders = Vec::new();
        handler.collect_appenders(ROOT_LOGGER_NAME, &config.root, &mut root_appenders)?;
        handler.loggers.insert(
            ROOT_KEY.to_string(),
            Logger::new(ROOT_LOGGER_NAME, root_level, root_appenders),
        );

        // Shallower names first, so every configured ancestor is resolved before its children.
        let mut nodes: Vec<(&String, &ConfigLogger)> = config.loggers.iter().collect();
        nodes.sort_by_key(|(name, _)| name.matches('.').count());

        for (name, node) in nodes {
            let level = node.parse_level(name)?;
            let mut resolved = Vec::new();
            handler.collect_appenders(name, node, &mut resolved)?;

            if node.additive || (level != LogLevel::NoLevel && resolved.is_empty()) {
                let parent = handler.nearest_configured_ancestor(name);
                for appender in parent.appenders() {
                    if !resolved.iter().any(|a| a.name() == appender.name()) {
                        resolved.push(Arc::clone(appender));
                    }
                }
            }

            handler
                .loggers
                .insert(name.clone(), Logger::new(name, level, resolved));
        }

        Ok(handler)
    }

    /// Builds a handler using the process-wide registry.
    pub fn with_config(config: &Config) -> Result<Self> {
        Self::new(config, AppenderRegistry::global())
    }

    /// Returns the logger for `name`, resolving and caching it on first use.
    ///
    /// # Panics
    ///
    /// Panics if `name` does not match the logger name grammar.
    pub fn logger(&self, name: &str) -> Logger {
        if !is_logger_name_valid(name) {
            panic!("invalid logger name format: {}", name);
        }

        if let Some(logger) = self.loggers.get(name) {
            return logger.value().clone();
        }

        let source = ancestors(name)
            .find_map(|ancestor| self.loggers.get(ancestor).map(|l| l.value().clone()))
            .unwrap_or_else(|| self.root());

        // Concurrent callers may race here; the first insert wins.
        self.loggers
            .entry(name.to_string())
            .or_insert_with(|| source.with_name(name))
            .value()
            .clone()
    }

    /// The root logger.
    ///
    /// # Panics
    ///
    /// Panics if the root logger is missing, which a successfully built handler rules out.
    pub fn root(&self) -> Logger {
        match self.loggers.get(ROOT_KEY) {
            Some(root) => root.value().clone(),
            None => panic!("root logger must be defined"),
        }
    }

    pub fn appender(&self, name: &str) -> Option<Arc<dyn Appender>> {
        self.appenders.get(name).cloned()
    }

    /// Closes every appender and reports the first failure.
    pub fn close(&self) -> Result<()> {
        let mut first_error = None;
        for (name, appender) in &self.appenders {
            if let Err(err) = appender.close() {
                if first_error.is_none() {
                    first_error = Some(LoggerError::other(format!(
                        "cannot close appender {}: {}",
                        name, err
                    )));
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// The resolved logger of the nearest configured ancestor, or the root.
    ///
    /// Only valid while building, when the cache holds nothing but configured loggers.
    fn nearest_configured_ancestor(&self, name: &str) -> Logger {
        ancestors(name)
            .find_map(|ancestor| self.loggers.get(ancestor).map(|l| l.value().clone()))
            .unwrap_or_else(|| self.root())
    }

    /// Appends the appenders listed by `node`, skipping names already present.
    fn collect_appenders(
        &self,
        logger_name: &str,
        node: &ConfigLogger,
        resolved: &mut Vec<Arc<dyn Appender>>,
    ) -> Result<()> {
        for appender_name in &node.appenders {
            let appender = self
                .appenders
                .get(appender_name)
                .ok_or_else(|| LoggerError::unknown_appender(logger_name, appender_name.as_str()))?;
            if !resolved.iter().any(|a| a.name() == appender.name()) {
                resolved.push(Arc::clone(appender));
            }
        }
        Ok(())
    }
}
