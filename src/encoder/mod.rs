//! Encoding contracts for structured log records
//!
//! An [`ObjectEncoder`] receives keyed values, an [`ArrayEncoder`] receives bare values, and an
//! [`Encoder`] is both plus access to the rendered buffer. Nested objects and arrays are written
//! by calling back into a marshaler with the same encoder, so no intermediate tree is built.
//!
//! Encoders are not shared across threads: each emission acquires one, uses it, and drops it.

pub mod json;

use crate::core::log_entry::LogEntry;
use crate::core::timestamp::format_unix;
use chrono::{DateTime, FixedOffset};
use std::sync::Arc;
use std::time::Duration;

pub use json::JsonEncoder;

/// Key of the logger name in every record.
pub const LOGGER_KEY: &str = "logger";
/// Key of the RFC 3339 timestamp in every record.
pub const TIME_KEY: &str = "time";
/// Key of the level in every record.
pub const LEVEL_KEY: &str = "level";
/// Key of the message in every record.
pub const MESSAGE_KEY: &str = "message";

/// Defines how an object registers its properties.
///
/// Any `Fn(&mut dyn ObjectEncoder)` closure is an `ObjectMarshaler`.
pub trait ObjectMarshaler: Send + Sync {
    fn encode(&self, encoder: &mut dyn ObjectEncoder);
}

/// Defines how an array registers its elements.
///
/// Any `Fn(&mut dyn ArrayEncoder)` closure is an `ArrayMarshaler`.
pub trait ArrayMarshaler: Send + Sync {
    fn encode(&self, encoder: &mut dyn ArrayEncoder);
}

impl<F> ObjectMarshaler for F
where
    F: Fn(&mut dyn ObjectEncoder) + Send + Sync,
{
    fn encode(&self, encoder: &mut dyn ObjectEncoder) {
        self(encoder)
    }
}

impl<F> ArrayMarshaler for F
where
    F: Fn(&mut dyn ArrayEncoder) + Send + Sync,
{
    fn encode(&self, encoder: &mut dyn ArrayEncoder) {
        self(encoder)
    }
}

/// Strongly-typed sink for bare values (array elements).
pub trait ArrayEncoder {
    fn append_array(&mut self, value: &dyn ArrayMarshaler);
    fn append_object(&mut self, value: &dyn ObjectMarshaler);
    fn append_i64(&mut self, value: i64);
    fn append_u64(&mut self, value: u64);
    fn append_f32(&mut self, value: f32);
    fn append_f64(&mut self, value: f64);
    fn append_str(&mut self, value: &str);
    /// Appends raw bytes as a string; invalid UTF-8 is replaced, never rejected.
    fn append_byte_str(&mut self, value: &[u8]);
    fn append_bool(&mut self, value: bool);
    fn append_time(&mut self, value: &DateTime<FixedOffset>);
    fn append_duration(&mut self, value: Duration);
    fn append_binary(&mut self, value: &[u8]);
    fn append_null(&mut self);

    fn append_i8(&mut self, value: i8) {
        self.append_i64(i64::from(value));
    }

    fn append_i16(&mut self, value: i16) {
        self.append_i64(i64::from(value));
    }

    fn append_i32(&mut self, value: i32) {
        self.append_i64(i64::from(value));
    }

    fn append_isize(&mut self, value: isize) {
        self.append_i64(value as i64);
    }

    fn append_u8(&mut self, value: u8) {
        self.append_u64(u64::from(value));
    }

    fn append_u16(&mut self, value: u16) {
        self.append_u64(u64::from(value));
    }

    fn append_u32(&mut self, value: u32) {
        self.append_u64(u64::from(value));
    }

    fn append_usize(&mut self, value: usize) {
        self.append_u64(value as u64);
    }
}

/// Strongly-typed sink for keyed values (object properties).
///
/// Slice forms are provided on top of [`ObjectEncoder::add_array`].
pub trait ObjectEncoder {
    fn add_array(&mut self, key: &str, value: &dyn ArrayMarshaler);
    fn add_object(&mut self, key: &str, value: &dyn ObjectMarshaler);
    fn add_i64(&mut self, key: &str, value: i64);
    fn add_u64(&mut self, key: &str, value: u64);
    fn add_f32(&mut self, key: &str, value: f32);
    fn add_f64(&mut self, key: &str, value: f64);
    fn add_str(&mut self, key: &str, value: &str);
    fn add_byte_str(&mut self, key: &str, value: &[u8]);
    fn add_bool(&mut self, key: &str, value: bool);
    fn add_time(&mut self, key: &str, value: &DateTime<FixedOffset>);
    fn add_duration(&mut self, key: &str, value: Duration);
    fn add_binary(&mut self, key: &str, value: &[u8]);
    fn add_null(&mut self, key: &str);

    fn add_i8(&mut self, key: &str, value: i8) {
        self.add_i64(key, i64::from(value));
    }

    fn add_i16(&mut self, key: &str, value: i16) {
        self.add_i64(key, i64::from(value));
    }

    fn add_i32(&mut self, key: &str, value: i32) {
        self.add_i64(key, i64::from(value));
    }

    fn add_isize(&mut self, key: &str, value: isize) {
        self.add_i64(key, value as i64);
    }

    fn add_u8(&mut self, key: &str, value: u8) {
        self.add_u64(key, u64::from(value));
    }

    fn add_u16(&mut self, key: &str, value: u16) {
        self.add_u64(key, u64::from(value));
    }

    fn add_u32(&mut self, key: &str, value: u32) {
        self.add_u64(key, u64::from(value));
    }

    fn add_usize(&mut self, key: &str, value: usize) {
        self.add_u64(key, value as u64);
    }

    fn add_objects(&mut self, key: &str, values: &[Arc<dyn ObjectMarshaler>]) {
        self.add_array(key, &|encoder: &mut dyn ArrayEncoder| {
            for value in values {
                encoder.append_object(value.as_ref());
            }
        });
    }

    fn add_i64s(&mut self, key: &str, values: &[i64]) {
        self.add_array(key, &|encoder: &mut dyn ArrayEncoder| {
            for value in values {
                encoder.append_i64(*value);
            }
        });
    }

    fn add_i32s(&mut self, key: &str, values: &[i32]) {
        self.add_array(key, &|encoder: &mut dyn ArrayEncoder| {
            for value in values {
                encoder.append_i32(*value);
            }
        });
    }

    fn add_u64s(&mut self, key: &str, values: &[u64]) {
        self.add_array(key, &|encoder: &mut dyn ArrayEncoder| {
            for value in values {
                encoder.append_u64(*value);
            }
        });
    }

    fn add_u32s(&mut self, key: &str, values: &[u32]) {
        self.add_array(key, &|encoder: &mut dyn ArrayEncoder| {
            for value in values {
                encoder.append_u32(*value);
            }
        });
    }

    fn add_f32s(&mut self, key: &str, values: &[f32]) {
        self.add_array(key, &|encoder: &mut dyn ArrayEncoder| {
            for value in values {
                encoder.append_f32(*value);
            }
        });
    }

    fn add_f64s(&mut self, key: &str, values: &[f64]) {
        self.add_array(key, &|encoder: &mut dyn ArrayEncoder| {
            for value in values {
                encoder.append_f64(*value);
            }
        });
    }

    fn add_strings(&mut self, key: &str, values: &[String]) {
        self.add_array(key, &|encoder: &mut dyn ArrayEncoder| {
            for value in values {
                encoder.append_str(value);
            }
        });
    }

    fn add_bools(&mut self, key: &str, values: &[bool]) {
        self.add_array(key, &|encoder: &mut dyn ArrayEncoder| {
            for value in values {
                encoder.append_bool(*value);
            }
        });
    }

    fn add_times(&mut self, key: &str, values: &[DateTime<FixedOffset>]) {
        self.add_array(key, &|encoder: &mut dyn ArrayEncoder| {
            for value in values {
                encoder.append_time(value);
            }
        });
    }

    fn add_durations(&mut self, key: &str, values: &[Duration]) {
        self.add_array(key, &|encoder: &mut dyn ArrayEncoder| {
            for value in values {
                encoder.append_duration(*value);
            }
        });
    }
}

/// A complete encoder: keyed and bare values, plus the rendered buffer.
pub trait Encoder: ObjectEncoder + ArrayEncoder {
    /// Content rendered so far.
    fn bytes(&self) -> &[u8];

    /// Renders one complete object followed by a line break and returns the buffer.
    ///
    /// `handler` adds the object properties.
    fn encode(&mut self, handler: &dyn Fn(&mut dyn ObjectEncoder)) -> &[u8];
}

/// Renders a log entry as one JSON-lines record.
///
/// Key order is fixed: logger name, time, level, message, then every field in entry order.
pub fn write_entry<'a>(entry: &LogEntry, encoder: &'a mut dyn Encoder) -> &'a [u8] {
    let time = format_unix(entry.unix());
    encoder.encode(&|object: &mut dyn ObjectEncoder| {
        object.add_str(LOGGER_KEY, entry.name());
        object.add_str(TIME_KEY, &time);
        object.add_str(LEVEL_KEY, entry.level().to_str());
        object.add_str(MESSAGE_KEY, entry.message());
        for field in entry.fields() {
            field.write(object);
        }
    })
}
