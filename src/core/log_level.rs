//! Log level definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a log entry.
///
/// Levels are ordered by verbosity: `Error < Warn < Info < Debug`. `NoLevel` marks a disabled
/// logger and `Unknown` an unsupported one; neither lets anything through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum LogLevel {
    #[default]
    Unknown = 0,
    NoLevel = 1,
    Error = 2,
    Warn = 3,
    Info = 4,
    Debug = 5,
}

impl LogLevel {
    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warning",
            LogLevel::Error => "error",
            LogLevel::NoLevel => "never",
            LogLevel::Unknown => "unknown",
        }
    }

    /// Returns true if a logger configured at `self` lets an entry at `level` through.
    ///
    /// A disabled or unknown logger never emits, and neither can an entry carrying one of
    /// those two levels.
    #[inline]
    pub fn enables(self, level: LogLevel) -> bool {
        if self <= LogLevel::NoLevel || level <= LogLevel::NoLevel {
            return false;
        }
        level <= self
    }

    /// Returns true if the given string is accepted by the parser.
    pub fn is_valid_name(s: &str) -> bool {
        s.parse::<LogLevel>().is_ok()
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    /// Parsing is case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(LogLevel::Error),
            "warning" | "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" | "verbose" => Ok(LogLevel::Debug),
            "never" | "no" | "none" | "disable" | "disabled" => Ok(LogLevel::NoLevel),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}
