//! Timestamp and duration formatting utilities
//!
//! Timestamps are rendered as RFC 3339 with up to nanosecond precision, trailing zeros of the
//! fractional part trimmed (`2019-04-20T09:53:13Z`, `2019-04-20T09:53:13.5+02:00`). Durations
//! are rendered in a compact unit-suffixed form (`230ms`, `2.523ms`, `1h2m3.5s`).

use chrono::{DateTime, FixedOffset, TimeZone, Timelike, Utc};
use std::fmt::Write as _;
use std::time::Duration;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Formats a timestamp as RFC 3339 with trimmed nanoseconds.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use rust_hierarchical_logger::core::timestamp::format_rfc3339_nanos;
///
/// let time = Utc.timestamp_opt(1_555_753_993, 0).unwrap();
/// assert_eq!(format_rfc3339_nanos(&time), "2019-04-20T09:53:13Z");
/// ```
#[must_use]
pub fn format_rfc3339_nanos<Tz: TimeZone>(datetime: &DateTime<Tz>) -> String {
    let fixed: DateTime<FixedOffset> = datetime.fixed_offset();
    let mut out = String::with_capacity(36);
    let _ = write!(out, "{}", fixed.format("%Y-%m-%dT%H:%M:%S"));

    let nanos = fixed.nanosecond() % 1_000_000_000;
    if nanos > 0 {
        let digits = format!("{:09}", nanos);
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }

    let offset = fixed.offset().local_minus_utc();
    if offset == 0 {
        out.push('Z');
    } else {
        let sign = if offset < 0 { '-' } else { '+' };
        let minutes = offset.unsigned_abs() / 60;
        let _ = write!(out, "{}{:02}:{:02}", sign, minutes / 60, minutes % 60);
    }
    out
}

/// Formats a unix timestamp in seconds as an RFC 3339 UTC timestamp.
///
/// Out-of-range values fall back to the epoch.
#[must_use]
pub fn format_unix(seconds: i64) -> String {
    let datetime = Utc
        .timestamp_opt(seconds, 0)
        .single()
        .unwrap_or_default();
    format_rfc3339_nanos(&datetime)
}

/// Formats a duration using the largest fitting units.
///
/// # Examples
///
/// ```
/// use rust_hierarchical_logger::core::timestamp::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(format_duration(Duration::from_millis(230)), "230ms");
/// assert_eq!(format_duration(Duration::from_micros(2523)), "2.523ms");
/// assert_eq!(format_duration(Duration::from_secs(3723)), "1h2m3s");
/// ```
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();

    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < 1_000 {
        return format!("{}ns", nanos);
    }
    if nanos < 1_000_000 {
        return format!("{}{}µs", nanos / 1_000, fraction(nanos % 1_000, 3));
    }
    if nanos < NANOS_PER_SEC {
        return format!("{}{}ms", nanos / 1_000_000, fraction(nanos % 1_000_000, 6));
    }

    let frac = fraction(nanos % NANOS_PER_SEC, 9);
    let total = nanos / NANOS_PER_SEC;
    let (hours, minutes, seconds) = (total / 3600, (total / 60) % 60, total % 60);

    if hours > 0 {
        format!("{}h{}m{}{}s", hours, minutes, seconds, frac)
    } else if minutes > 0 {
        format!("{}m{}{}s", minutes, seconds, frac)
    } else {
        format!("{}{}s", seconds, frac)
    }
}

/// Renders `value` as a `width`-digit decimal fraction without trailing zeros.
fn fraction(value: u128, width: usize) -> String {
    if value == 0 {
        return String::new();
    }
    let digits = format!("{:0width$}", value, width = width);
    format!(".{}", digits.trim_end_matches('0'))
}
