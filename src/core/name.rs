//! Name grammar shared by loggers and appenders
//!
//! A valid name starts with a lowercase letter, ends with a lowercase letter or a digit, and
//! may contain dots, underscores, hyphens and digits in between. Names are at least three
//! characters long.

use regex::Regex;
use std::sync::LazyLock;

static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z]+[a-z._0-9-]+[a-z0-9]$").expect("name pattern is a valid regex")
});

/// Checks a dotted logger name such as `repositories.users`.
pub fn is_logger_name_valid(name: &str) -> bool {
    NAME_PATTERN.is_match(name)
}

/// Checks an appender name such as `file-log`.
pub fn is_appender_name_valid(name: &str) -> bool {
    NAME_PATTERN.is_match(name)
}

/// Yields every proper ancestor of a dotted name, nearest first.
///
/// `"a.b.c"` yields `"a.b"` then `"a"`. The root (empty name) is not yielded.
pub(crate) fn ancestors(name: &str) -> impl Iterator<Item = &str> {
    let mut current = name;
    std::iter::from_fn(move || {
        let cut = current.rfind('.')?;
        current = &current[..cut];
        Some(current)
    })
}
